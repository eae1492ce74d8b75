//! Currency series abstractions

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// Query window for a series request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub start: Option<NaiveDate>,
    pub end: NaiveDate,
}

impl ReportPeriod {
    pub fn new(start: Option<NaiveDate>, end: NaiveDate) -> Self {
        ReportPeriod { start, end }
    }

    pub fn start_param(&self) -> Option<String> {
        self.start.map(|d| d.format("%Y-%m-%d").to_string())
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

/// Why a single currency could not contribute rows to a run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Invalid series URL: {0}")]
    InvalidUrl(String),
    #[error("Series not available (HTTP {status})")]
    Unavailable { status: u16 },
    #[error("HTTP error: {status}")]
    Http { status: u16 },
    #[error("Failed to parse CSV response: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing column in response: {0}")]
    MissingColumn(String),
    #[error("Invalid date '{value}' in column {column}")]
    InvalidDate { column: String, value: String },
    #[error("Empty value in column {column}")]
    IncompleteRow { column: String },
    #[error("Invalid number '{value}' in column {column}")]
    InvalidNumber { column: String, value: String },
    #[error("No observations in response")]
    NoObservations,
    #[error("Field selection failed: {0}")]
    Fields(#[from] crate::core::fields::FieldError),
    /// The configured rename left out an output column. Not a country
    /// failure: the pipeline aborts the run with it.
    #[error(transparent)]
    Schema(#[from] crate::core::table::SchemaError),
}

#[async_trait]
pub trait CurrencySeriesProvider: Send + Sync {
    /// Returns the raw CSV body of the daily series for `currency`.
    async fn fetch_series(&self, currency: &str, period: &ReportPeriod)
    -> Result<String, FetchError>;
}
