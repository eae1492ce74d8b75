use super::ui;
use crate::core::ReportPeriod;
use crate::core::config::AppConfig;
use crate::pipeline::{self, RunReport};
use crate::providers::ecb::EcbProvider;
use crate::{FetchOptions, OutputFormat, export};
use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use comfy_table::Cell;

/// Folds command line overrides into the loaded config.
pub fn apply_overrides(mut config: AppConfig, options: &FetchOptions) -> AppConfig {
    if options.start.is_some() {
        config.analysis.start_date = options.start;
    }
    if options.end.is_some() {
        config.analysis.end_date = options.end;
    }
    if !options.countries.is_empty() {
        config.analysis.countries = options
            .countries
            .iter()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .collect();
    }
    config.debug |= options.debug;
    config
}

pub fn report_period(config: &AppConfig, today: NaiveDate) -> Result<ReportPeriod> {
    let end = config.analysis.end_date.unwrap_or(today);
    if let Some(start) = config.analysis.start_date {
        if start > end {
            bail!("Start date {start} is after end date {end}");
        }
    }
    Ok(ReportPeriod::new(config.analysis.start_date, end))
}

pub fn render_table(report: &RunReport) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(report.table.columns().map(ui::header_cell));

    for rate in report.table.rows() {
        table.add_row(vec![
            ui::number_cell(rate.id.to_string()),
            Cell::new(&rate.source),
            Cell::new(&rate.origin_currency),
            Cell::new(&rate.target_currency),
            ui::number_cell(format!("{:.4}", rate.exchange_rate)),
            Cell::new(rate.report_date),
            Cell::new(rate.modified_date),
        ]);
    }

    let mut output = format!(
        "{}\n\n{}",
        ui::style_text("ECB euro reference rates", ui::StyleType::Title),
        table
    );

    if !report.failures.is_empty() {
        output.push_str(&format!(
            "\n\n{}\n",
            ui::style_text("Failed countries:", ui::StyleType::TotalLabel)
        ));
        for failure in &report.failures {
            output.push_str(&format!(
                "  {} {}\n",
                failure.country,
                ui::style_text(&failure.error.to_string(), ui::StyleType::Error)
            ));
        }
    }

    if let Some(path) = &report.output_path {
        output.push_str(&format!(
            "\n{}\n",
            ui::style_text(
                &format!("Saved to {}", path.display()),
                ui::StyleType::Subtle
            )
        ));
    }

    output
}

pub async fn run(config: AppConfig, options: &FetchOptions) -> Result<()> {
    let config = apply_overrides(config, options);
    let period = report_period(&config, Local::now().date_naive())?;
    let provider = EcbProvider::new(config.ecb_base_url())?;

    let report = pipeline::run(&config, &provider, &period, &config.analysis.countries).await?;

    match options.format {
        OutputFormat::Table => println!("{}", render_table(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report.table)?),
        OutputFormat::Csv => print!("{}", export::rate_table_csv(&report.table)?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let options = FetchOptions {
            start: Some(date(2023, 5, 1)),
            end: Some(date(2023, 5, 31)),
            countries: vec!["usd".to_string(), " gbp ".to_string()],
            debug: true,
            format: OutputFormat::Table,
        };
        let config = apply_overrides(AppConfig::default(), &options);

        assert_eq!(config.analysis.start_date, Some(date(2023, 5, 1)));
        assert_eq!(config.analysis.end_date, Some(date(2023, 5, 31)));
        assert_eq!(config.analysis.countries, vec!["USD", "GBP"]);
        assert!(config.debug);
    }

    #[test]
    fn test_empty_overrides_keep_config() {
        let mut base = AppConfig::default();
        base.debug = true;
        base.analysis.end_date = Some(date(2023, 5, 31));

        let config = apply_overrides(base, &FetchOptions::default());
        assert!(config.debug);
        assert_eq!(config.analysis.end_date, Some(date(2023, 5, 31)));
        assert_eq!(config.analysis.countries.len(), 32);
    }

    #[test]
    fn test_report_period_defaults_end_to_today() -> Result<()> {
        let period = report_period(&AppConfig::default(), date(2024, 1, 2))?;
        assert_eq!(period, ReportPeriod::new(None, date(2024, 1, 2)));
        Ok(())
    }

    #[test]
    fn test_report_period_rejects_inverted_window() {
        let mut config = AppConfig::default();
        config.analysis.start_date = Some(date(2023, 6, 1));
        config.analysis.end_date = Some(date(2023, 5, 31));

        let result = report_period(&config, date(2024, 1, 2));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("is after end date"));
    }
}
