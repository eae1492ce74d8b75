//! The normalised exchange-rate table and its column contract

use crate::core::frame::Frame;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ID: &str = "ID";
pub const SOURCE: &str = "SOURCE";
pub const ORIGIN_CURRENCY: &str = "ORIGIN_CURRENCY";
pub const TARGET_CURRENCY: &str = "TARGET_CURRENCY";
pub const EXCHANGE_RATE: &str = "EXCHANGE_RATE";
pub const REPORT_DATE: &str = "REPORT_DATE";
pub const MODIFIED_DATE: &str = "MODIFIED_DATE";

/// Output columns in output order.
pub const COLUMNS: [&str; 7] = [
    ID,
    SOURCE,
    ORIGIN_CURRENCY,
    TARGET_CURRENCY,
    EXCHANGE_RATE,
    REPORT_DATE,
    MODIFIED_DATE,
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Columns in table are not as expected, missing: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ExchangeRate {
    /// Assigned when rows are collected into a [`RateTable`].
    #[serde(default)]
    pub id: u64,
    pub source: String,
    pub origin_currency: String,
    pub target_currency: String,
    pub exchange_rate: f64,
    pub report_date: NaiveDate,
    pub modified_date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RateTable {
    rows: Vec<ExchangeRate>,
}

impl RateTable {
    /// Collects rates in order, numbering them from 1.
    pub fn from_rates(rates: Vec<ExchangeRate>) -> Self {
        let rows = rates
            .into_iter()
            .zip(1..)
            .map(|(rate, id)| ExchangeRate { id, ..rate })
            .collect();
        RateTable { rows }
    }

    /// Fails with every output column `columns` lacks. `ID` is not required,
    /// the table numbers its own rows.
    pub fn check_columns<S: AsRef<str>>(columns: &[S]) -> Result<(), SchemaError> {
        let missing: Vec<String> = COLUMNS
            .iter()
            .filter(|&&c| c != ID && !columns.iter().any(|have| have.as_ref() == c))
            .map(|c| c.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::MissingColumns(missing))
        }
    }

    /// Converts the rows of an already checked frame, ignoring extra columns.
    pub fn parse_rates(frame: &Frame) -> Result<Vec<ExchangeRate>, csv::Error> {
        frame.deserialize_rows()
    }

    pub fn columns(&self) -> [&'static str; 7] {
        COLUMNS
    }

    pub fn rows(&self) -> &[ExchangeRate] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
