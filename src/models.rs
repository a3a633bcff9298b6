//! Data models for the weekly forecast.
//!
//! This module contains the typed records that flow through the pipeline:
//! raw input rows, the aligned weekly series, forecast points and the
//! published summary.

use crate::error::InputError;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Labels describing the two signals blended by the forecast.
///
/// Same week last year (if any), and the trailing four-week mean.
pub const TOP_DRIVERS: [&str; 2] = ["前年同週（あれば）", "直近4週平均"];

/// A single row read from the facts file, before alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Calendar date of the row.
    pub date: NaiveDate,
    /// Order count; `None` when the cell was empty or NaN.
    pub orders: Option<f64>,
}

impl RawRecord {
    pub fn new(date: NaiveDate, orders: Option<f64>) -> Self {
        Self { date, orders }
    }
}

/// One week of history, real or synthetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Week boundary (a Monday once aligned).
    pub date: NaiveDate,
    /// Order value for the week.
    pub orders: f64,
    /// ISO 8601 week number of `date` (1-53).
    pub week_of_year: u32,
}

impl Observation {
    /// Creates an observation tagged with the ISO week of `date`.
    pub fn new(date: NaiveDate, orders: f64) -> Self {
        Self {
            date,
            orders,
            week_of_year: date.iso_week().week(),
        }
    }
}

/// Gap-free weekly history.
///
/// Observations are strictly increasing by date at a fixed seven-day
/// stride, and the series is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySeries {
    observations: Vec<Observation>,
}

impl WeeklySeries {
    /// Builds a series, rejecting empty input and irregular spacing.
    pub fn new(observations: Vec<Observation>) -> Result<Self, InputError> {
        if observations.is_empty() {
            return Err(InputError::EmptySeries);
        }

        for pair in observations.windows(2) {
            if pair[1].date - pair[0].date != Duration::days(7) {
                return Err(InputError::IrregularSpacing {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }

        Ok(Self { observations })
    }

    /// Number of weeks in the series.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }
}

/// One forecast step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    /// Future Monday this estimate belongs to.
    pub date: NaiveDate,
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// The published forecast record.
///
/// Field order is the column order of both report files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Run timestamp (ISO 8601, UTC).
    pub run_id: String,
    /// Forecast week label, `YYYY-Www` with Sunday-based week numbers.
    pub period: String,
    pub orders_forecast: i64,
    pub orders_low: i64,
    pub orders_high: i64,
    /// Fixed description of the blended signals.
    pub top_drivers: Vec<String>,
    /// Same value as `run_id`.
    pub updated_at: String,
    /// Reserved for provenance; always empty.
    pub source_url: String,
}

impl Summary {
    /// Field names in serialization order.
    pub const COLUMNS: [&'static str; 8] = [
        "run_id",
        "period",
        "orders_forecast",
        "orders_low",
        "orders_high",
        "top_drivers",
        "updated_at",
        "source_url",
    ];
}
