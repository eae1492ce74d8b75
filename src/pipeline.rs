//! Fetch-and-normalize run over a list of currencies.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::core::config::AppConfig;
use crate::core::fields::EXR;
use crate::core::table::{MODIFIED_DATE, SOURCE};
use crate::core::{
    CurrencySeriesProvider, ExchangeRate, FetchError, Frame, RateTable, ReportPeriod,
};
use crate::export;

/// Column holding the observation date in ECB responses.
pub const TIME_PERIOD: &str = "TIME_PERIOD";
pub const OBS_VALUE: &str = "OBS_VALUE";
pub const SOURCE_LABEL: &str = "ECB";

#[derive(Debug)]
pub struct CountryFailure {
    pub country: String,
    pub error: FetchError,
}

#[derive(Debug)]
pub struct RunReport {
    pub table: RateTable,
    pub failures: Vec<CountryFailure>,
    /// Set when the table was persisted in debug mode.
    pub output_path: Option<PathBuf>,
}

impl RunReport {
    pub fn failed_countries(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.country.as_str()).collect()
    }
}

/// Runs the pipeline stamping rows with today's local date.
pub async fn run<S: AsRef<str>>(
    config: &AppConfig,
    provider: &dyn CurrencySeriesProvider,
    period: &ReportPeriod,
    countries: &[S],
) -> Result<RunReport> {
    run_at(config, provider, period, countries, Local::now().date_naive()).await
}

/// Fetches each country in order, keeps its latest observation date and
/// assembles the canonical table. Per-country failures are collected in the
/// report; a table missing an output column is an error.
pub async fn run_at<S: AsRef<str>>(
    config: &AppConfig,
    provider: &dyn CurrencySeriesProvider,
    period: &ReportPeriod,
    countries: &[S],
    modified_date: NaiveDate,
) -> Result<RunReport> {
    let mut rates = Vec::new();
    let mut failures = Vec::new();
    let mut parsed_any = false;

    for country in countries.iter().map(AsRef::as_ref) {
        info!(country, "Fetching data for country");
        match fetch_country(config, provider, country, period, modified_date).await {
            Ok(country_rates) => {
                info!(country, rows = country_rates.len(), "Fetched latest observations");
                parsed_any = true;
                rates.extend(country_rates);
            }
            Err(FetchError::Schema(e)) => return Err(e.into()),
            Err(error) => {
                warn!(country, %error, "Failed to fetch data for country");
                failures.push(CountryFailure {
                    country: country.to_string(),
                    error,
                });
            }
        }
    }

    if !parsed_any {
        RateTable::check_columns(&configured_columns(config)?)?;
    }
    let table = RateTable::from_rates(rates);

    let output_path = if config.debug {
        Some(export::write_rate_table(
            &table,
            &config.files.preprocess_data,
            period,
        )?)
    } else {
        None
    };

    info!(
        rows = table.len(),
        failed = failures.len(),
        "Exchange rate run complete"
    );
    Ok(RunReport {
        table,
        failures,
        output_path,
    })
}

/// Output columns a successful country would carry, from the catalogue and
/// rename map alone.
fn configured_columns(config: &AppConfig) -> Result<Vec<String>, FetchError> {
    let mut columns: Vec<String> = config
        .fields
        .select_field_names::<&str>(EXR, &[])?
        .iter()
        .map(|name| config.rename.output_name(EXR, name).to_string())
        .collect();
    columns.push(MODIFIED_DATE.to_string());
    columns.push(SOURCE.to_string());
    Ok(columns)
}

async fn fetch_country(
    config: &AppConfig,
    provider: &dyn CurrencySeriesProvider,
    country: &str,
    period: &ReportPeriod,
    modified_date: NaiveDate,
) -> Result<Vec<ExchangeRate>, FetchError> {
    let body = provider.fetch_series(country, period).await?;

    if config.debug {
        if let Err(e) = export::write_raw_series(&config.files.raw_data, country, period, &body) {
            warn!(country, error = %e, "Failed to keep raw series");
        }
    }

    let mut frame = latest_observations(config, &body, modified_date)?;
    frame.rename(&config.rename.for_category(EXR));
    RateTable::check_columns(frame.columns())?;
    Ok(RateTable::parse_rates(&frame)?)
}

/// Parses one response and reduces it to the predictive columns of the rows
/// on its most recent date. Every predictive field must be present, every
/// kept cell filled and every observation value numeric.
pub fn latest_observations(
    config: &AppConfig,
    body: &str,
    modified_date: NaiveDate,
) -> Result<Frame, FetchError> {
    let mut frame = Frame::from_csv(body)?;

    if let Some(field) = config
        .fields
        .unmatched_fields(EXR, frame.columns())?
        .into_iter()
        .next()
    {
        return Err(FetchError::MissingColumn(field));
    }

    let dates = frame
        .column_values(TIME_PERIOD)
        .ok_or_else(|| FetchError::MissingColumn(TIME_PERIOD.to_string()))?
        .map(|value| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| FetchError::InvalidDate {
                column: TIME_PERIOD.to_string(),
                value: value.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let latest = dates.iter().max().copied().ok_or(FetchError::NoObservations)?;

    let mut is_latest = dates.into_iter().map(|d| d == latest);
    frame.retain(|_| is_latest.next().unwrap_or(false));

    let names = config.fields.select_field_names(EXR, frame.columns())?;
    let mut frame = frame.select(&names).map_err(FetchError::MissingColumn)?;

    let blank = frame
        .rows()
        .iter()
        .find_map(|row| row.iter().position(|v| v.is_empty()));
    if let Some(idx) = blank {
        return Err(FetchError::IncompleteRow {
            column: frame.columns()[idx].clone(),
        });
    }

    if let Some(mut values) = frame.column_values(OBS_VALUE) {
        if let Some(value) = values.find(|v| v.parse::<f64>().is_err()) {
            return Err(FetchError::InvalidNumber {
                column: OBS_VALUE.to_string(),
                value: value.to_string(),
            });
        }
    }

    let stamp = modified_date.format("%Y-%m-%d").to_string();
    frame.push_constant_column(MODIFIED_DATE, &stamp);
    frame.push_constant_column(SOURCE, SOURCE_LABEL);
    Ok(frame)
}
