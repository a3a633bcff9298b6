//! CSV reader for the facts file.
//!
//! Reads the date and orders columns by header name, ignoring any other
//! columns. Rows are returned in file order; sorting happens during
//! alignment.

use crate::error::InputError;
use crate::models::RawRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Column names to read from the facts file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Header of the date column.
    pub date_column: String,
    /// Header of the orders column.
    pub orders_column: String,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            date_column: "date".to_string(),
            orders_column: "orders".to_string(),
        }
    }
}

impl From<&crate::config::InputConfig> for ReadOptions {
    fn from(config: &crate::config::InputConfig) -> Self {
        Self {
            date_column: config.date_column.clone(),
            orders_column: config.orders_column.clone(),
        }
    }
}

/// Read all records from a CSV file on disk.
pub fn read_records(path: &Path, options: &ReadOptions) -> Result<Vec<RawRecord>, InputError> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    collect_records(reader, options, path)
}

/// Parse records from any CSV byte stream.
#[cfg(test)]
pub fn parse_records<R: Read>(input: R, options: &ReadOptions) -> Result<Vec<RawRecord>, InputError> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    collect_records(reader, options, Path::new("<stream>"))
}

fn collect_records<R: Read>(
    mut reader: csv::Reader<R>,
    options: &ReadOptions,
    path: &Path,
) -> Result<Vec<RawRecord>, InputError> {
    let read_error = |source| InputError::Read {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(read_error)?.clone();

    let date_idx = column_index(&headers, &options.date_column)
        .ok_or_else(|| InputError::MissingColumn(options.date_column.clone()))?;
    let orders_idx = column_index(&headers, &options.orders_column)
        .ok_or_else(|| InputError::MissingColumn(options.orders_column.clone()))?;

    let mut records = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let record = result.map_err(read_error)?;

        let date_cell = record.get(date_idx).unwrap_or("");
        let date = parse_date(date_cell).ok_or_else(|| InputError::InvalidDate {
            line,
            value: date_cell.to_string(),
        })?;

        let orders_cell = record.get(orders_idx).unwrap_or("");
        let orders = parse_orders(orders_cell).ok_or_else(|| InputError::InvalidOrders {
            line,
            value: orders_cell.to_string(),
        })?;

        records.push(RawRecord::new(date, orders));
    }

    debug!("Parsed {} records from {}", records.len(), path.display());
    Ok(records)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

/// Parse a date cell.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, RFC 3339 and `YYYY-MM-DD HH:MM:SS`;
/// datetimes are truncated to their calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}

/// Parse an orders cell.
///
/// Empty and NaN cells are missing values (`Some(None)`); anything that is
/// not a finite number yields `None`.
fn parse_orders(s: &str) -> Option<Option<f64>> {
    if s.is_empty() {
        return Some(None);
    }
    match s.parse::<f64>() {
        Ok(value) if value.is_nan() => Some(None),
        Ok(value) if value.is_finite() => Some(Some(value)),
        _ => None,
    }
}
