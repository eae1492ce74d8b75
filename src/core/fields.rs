//! Source field catalogue and column rename rules

use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// The ECB exchange-rate dataflow.
pub const EXR: &str = "EXR";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("Unknown field category: {0}")]
    UnknownCategory(String),
    #[error("Invalid field pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// One column of a source feed. `name` may be a shell-style wildcard.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(default)]
    pub predictive: bool,
}

impl FieldDescriptor {
    pub fn new(name: &str, predictive: bool) -> Self {
        FieldDescriptor {
            name: name.to_string(),
            predictive,
        }
    }

    fn pattern(&self) -> Result<Pattern, FieldError> {
        Pattern::new(&self.name).map_err(|e| FieldError::InvalidPattern {
            pattern: self.name.clone(),
            reason: e.msg.to_string(),
        })
    }
}

/// Field descriptors keyed by category.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct FieldCatalog(BTreeMap<String, Vec<FieldDescriptor>>);

impl FieldCatalog {
    pub fn new(categories: BTreeMap<String, Vec<FieldDescriptor>>) -> Self {
        FieldCatalog(categories)
    }

    pub fn descriptors(&self, category: &str) -> Result<&[FieldDescriptor], FieldError> {
        self.0
            .get(category)
            .map(Vec::as_slice)
            .ok_or_else(|| FieldError::UnknownCategory(category.to_string()))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Predictive descriptors of `category` matched against `available`.
    ///
    /// Each predictive pattern selects every available name it matches, in
    /// `available` order, with the concrete name substituted. An empty
    /// `available` returns the predictive descriptors unfiltered.
    pub fn select_fields<S: AsRef<str>>(
        &self,
        category: &str,
        available: &[S],
    ) -> Result<Vec<FieldDescriptor>, FieldError> {
        let mut selected: Vec<FieldDescriptor> = Vec::new();

        for descriptor in self.descriptors(category)?.iter().filter(|d| d.predictive) {
            if available.is_empty() {
                if !selected.contains(descriptor) {
                    selected.push(descriptor.clone());
                }
                continue;
            }

            let pattern = descriptor.pattern()?;
            for name in available.iter().map(AsRef::as_ref) {
                if !pattern.matches(name) {
                    continue;
                }
                let matched = FieldDescriptor {
                    name: name.to_string(),
                    ..descriptor.clone()
                };
                if !selected.contains(&matched) {
                    selected.push(matched);
                }
            }
        }

        Ok(selected)
    }

    /// Predictive descriptor names of `category` that match nothing in
    /// `available`.
    pub fn unmatched_fields<S: AsRef<str>>(
        &self,
        category: &str,
        available: &[S],
    ) -> Result<Vec<String>, FieldError> {
        let mut unmatched = Vec::new();
        for descriptor in self.descriptors(category)?.iter().filter(|d| d.predictive) {
            let pattern = descriptor.pattern()?;
            if !available.iter().any(|name| pattern.matches(name.as_ref())) {
                unmatched.push(descriptor.name.clone());
            }
        }
        Ok(unmatched)
    }

    pub fn select_field_names<S: AsRef<str>>(
        &self,
        category: &str,
        available: &[S],
    ) -> Result<Vec<String>, FieldError> {
        Ok(self
            .select_fields(category, available)?
            .into_iter()
            .map(|d| d.name)
            .collect())
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        let exr = [
            ("KEY", false),
            ("FREQ", false),
            ("CURRENCY", true),
            ("CURRENCY_DENOM", true),
            ("EXR_TYPE", false),
            ("EXR_SUFFIX", false),
            ("TIME_PERIOD", true),
            ("OBS_VALUE", true),
            ("OBS_STATUS", false),
            ("OBS_CONF", false),
            ("OBS_PRE_BREAK", false),
            ("OBS_COM", false),
            ("TIME_FORMAT", false),
            ("BREAKS", false),
            ("COLLECTION", false),
            ("COMPILING_ORG", false),
            ("DISS_ORG", false),
            ("DOM_SER_IDS", false),
            ("PUBL_ECB", false),
            ("PUBL_MU", false),
            ("PUBL_PUBLIC", false),
            ("UNIT_INDEX_BASE", false),
            ("COMPILATION", false),
            ("COVERAGE", false),
            ("DECIMALS", false),
            ("NAT_TITLE", false),
            ("SOURCE_AGENCY", false),
            ("SOURCE_PUB", false),
            ("TITLE", false),
            ("TITLE_COMPL", false),
            ("UNIT", false),
            ("UNIT_MULT", false),
        ]
        .into_iter()
        .map(|(name, predictive)| FieldDescriptor::new(name, predictive))
        .collect();

        FieldCatalog(BTreeMap::from([(EXR.to_string(), exr)]))
    }
}

/// Source column → output column, keyed by category.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct RenameMap(BTreeMap<String, BTreeMap<String, String>>);

impl RenameMap {
    pub fn new(categories: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        RenameMap(categories)
    }

    /// Rename pairs for `category`; empty when none are configured.
    pub fn for_category(&self, category: &str) -> BTreeMap<String, String> {
        self.0.get(category).cloned().unwrap_or_default()
    }

    pub fn output_name<'a>(&'a self, category: &str, source: &'a str) -> &'a str {
        self.0
            .get(category)
            .and_then(|m| m.get(source))
            .map_or(source, String::as_str)
    }
}

impl Default for RenameMap {
    fn default() -> Self {
        let exr = [
            ("CURRENCY", "ORIGIN_CURRENCY"),
            ("CURRENCY_DENOM", "TARGET_CURRENCY"),
            ("OBS_VALUE", "EXCHANGE_RATE"),
            ("TIME_PERIOD", "REPORT_DATE"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        RenameMap(BTreeMap::from([(EXR.to_string(), exr)]))
    }
}
