use crate::core::fields::{FieldCatalog, RenameMap};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_ECB_BASE_URL: &str = "https://data-api.ecb.europa.eu";

pub const DEFAULT_COUNTRIES: [&str; 32] = [
    "USD", "JPY", "BGN", "CZK", "DKK", "GBP", "HUF", "PLN", "RON", "SEK", "CHF", "ISK", "NOK",
    "HRK", "RUB", "TRY", "AUD", "BRL", "CAD", "CNY", "HKD", "IDR", "ILS", "INR", "KRW", "MXN",
    "MYR", "NZD", "PHP", "SGD", "THB", "ZAR",
];

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnalysisConfig {
    /// Lower bound of the query window; `None` means unbounded.
    pub start_date: Option<NaiveDate>,
    /// Upper bound of the query window; `None` means today.
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_countries")]
    pub countries: Vec<String>,
}

fn default_countries() -> Vec<String> {
    DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            start_date: None,
            end_date: None,
            countries: default_countries(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FilesConfig {
    pub raw_data: PathBuf,
    pub preprocess_data: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            raw_data: PathBuf::from("data").join("raw"),
            preprocess_data: PathBuf::from("data").join("preprocess"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EcbProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub ecb: Option<EcbProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            ecb: Some(EcbProviderConfig {
                base_url: DEFAULT_ECB_BASE_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Persist intermediate and final tables to disk.
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub fields: FieldCatalog,
    #[serde(default)]
    pub rename: RenameMap,
}

impl AppConfig {
    /// Loads the config at the default location, or built-in defaults when
    /// no file has been set up yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("eu", "ecbfx", "ecbfx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn ecb_base_url(&self) -> &str {
        self.providers
            .ecb
            .as_ref()
            .map_or(DEFAULT_ECB_BASE_URL, |p| &p.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fields::EXR;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
debug: true
analysis:
  start_date: 2023-05-01
  end_date: 2023-05-31
  countries: ["USD", "JPY"]
files:
  raw_data: "/tmp/raw"
  preprocess_data: "/tmp/preprocess"
providers:
  ecb:
    base_url: "http://example.com/ecb"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert!(config.debug);
        assert_eq!(
            config.analysis.start_date,
            NaiveDate::from_ymd_opt(2023, 5, 1)
        );
        assert_eq!(
            config.analysis.end_date,
            NaiveDate::from_ymd_opt(2023, 5, 31)
        );
        assert_eq!(config.analysis.countries, vec!["USD", "JPY"]);
        assert_eq!(config.files.preprocess_data, PathBuf::from("/tmp/preprocess"));
        assert_eq!(config.ecb_base_url(), "http://example.com/ecb");

        // Catalogue and rename map fall back to the built-in EXR tables
        assert_eq!(config.fields, FieldCatalog::default());
        assert_eq!(
            config.rename.output_name(EXR, "TIME_PERIOD"),
            "REPORT_DATE"
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert!(!config.debug);
        assert!(config.analysis.start_date.is_none());
        assert!(config.analysis.end_date.is_none());
        assert_eq!(config.analysis.countries.len(), 32);
        assert_eq!(config.analysis.countries[0], "USD");
        assert_eq!(config.ecb_base_url(), DEFAULT_ECB_BASE_URL);
    }

    #[test]
    fn test_custom_fields_and_rename() {
        let yaml_str = r#"
fields:
  EXR:
    - name: "CURRENCY*"
      predictive: true
    - name: "FREQ"
rename:
  EXR:
    CURRENCY: ORIGIN_CURRENCY
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        let names = config
            .fields
            .select_field_names(EXR, &["CURRENCY", "CURRENCY_DENOM", "FREQ"])
            .unwrap();
        assert_eq!(names, vec!["CURRENCY", "CURRENCY_DENOM"]);
        assert_eq!(
            config.rename.output_name(EXR, "CURRENCY_DENOM"),
            "CURRENCY_DENOM"
        );
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/nonexistent/ecbfx/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
