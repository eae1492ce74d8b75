//! CSV persistence for run output.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::table::COLUMNS;
use crate::core::{RateTable, ReportPeriod};

pub fn rate_table_file_name(period: &ReportPeriod) -> String {
    format!("ecb_exchange_rate_{}.csv", period.end_param())
}

/// Serialize the table as CSV. The header row is written even when the
/// table is empty.
pub fn rate_table_csv(table: &RateTable) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);

    wtr.write_record(COLUMNS)?;
    for row in table.rows() {
        wtr.serialize(row)?;
    }

    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Write the table to `dir/ecb_exchange_rate_<end>.csv`, creating `dir`.
pub fn write_rate_table(table: &RateTable, dir: &Path, period: &ReportPeriod) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let path = dir.join(rate_table_file_name(period));
    fs::write(&path, rate_table_csv(table)?)
        .with_context(|| format!("Failed to write rate table to {}", path.display()))?;

    debug!(rows = table.len(), "Wrote rate table to {}", path.display());
    Ok(path)
}

/// Keep the untouched response body for one currency.
pub fn write_raw_series(
    dir: &Path,
    currency: &str,
    period: &ReportPeriod,
    body: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let path = dir.join(format!("ecb_exr_{}_{}.csv", currency, period.end_param()));
    fs::write(&path, body)
        .with_context(|| format!("Failed to write raw series to {}", path.display()))?;

    debug!("Wrote raw {} series to {}", currency, path.display());
    Ok(path)
}
