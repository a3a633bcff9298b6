//! Error types for the forecast pipeline.
//!
//! Each stage owns one error enum: reading and aligning input
//! ([`InputError`]), running the forecast loop ([`ForecastError`]) and
//! writing the reports ([`FilesystemError`]). `main` composes them with
//! `anyhow` for the final diagnostic.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading facts or building the weekly series.
#[derive(Error, Debug)]
pub enum InputError {
    /// The input file could not be opened or decoded as CSV.
    #[error("failed to read input {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required header is absent.
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    /// A date cell could not be parsed.
    #[error("line {line}: cannot parse date '{value}'")]
    InvalidDate { line: usize, value: String },

    /// An orders cell is present but not a finite number.
    #[error("line {line}: cannot parse orders value '{value}'")]
    InvalidOrders { line: usize, value: String },

    /// No rows at all.
    #[error("empty input data")]
    EmptySeries,

    /// The date range does not contain a single Monday.
    #[error("no Monday between {start} and {end}")]
    NoWeeklyBoundary { start: NaiveDate, end: NaiveDate },

    /// Every aligned week is missing its orders value.
    #[error("no orders value available to seed forward fill")]
    NoUsableOrders,

    /// Observations are not exactly one week apart.
    #[error("weekly series must be spaced 7 days apart: {previous} -> {next}")]
    IrregularSpacing { previous: NaiveDate, next: NaiveDate },
}

/// Errors raised by the forecast loop and summary projection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// The loop needs at least one history row.
    #[error("forecast requires at least one week of history")]
    InsufficientHistory,

    /// Horizon of zero, or a summary requested from an empty forecast.
    #[error("forecast horizon must be at least 1")]
    InvalidHorizon,
}

/// Errors raised while writing the summary reports.
#[derive(Error, Debug)]
pub enum FilesystemError {
    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The summary could not be encoded.
    #[error("failed to encode summary: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for FilesystemError {
    fn from(err: serde_json::Error) -> Self {
        FilesystemError::Encode(err.to_string())
    }
}

impl From<csv::Error> for FilesystemError {
    fn from(err: csv::Error) -> Self {
        FilesystemError::Encode(err.to_string())
    }
}
