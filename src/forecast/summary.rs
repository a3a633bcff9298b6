//! Projection of the final forecast point into the published summary.

use crate::error::ForecastError;
use crate::models::{ForecastPoint, Summary, TOP_DRIVERS};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Build the summary record from the last point of `points`.
///
/// `now` is captured once by the caller and used for both `run_id` and
/// `updated_at`.
pub fn summarize(points: &[ForecastPoint], now: DateTime<Utc>) -> Result<Summary, ForecastError> {
    let last = points.last().ok_or(ForecastError::InvalidHorizon)?;
    let timestamp = format_timestamp(now);

    Ok(Summary {
        run_id: timestamp.clone(),
        period: period_label(last.date),
        orders_forecast: round_half_even(last.point_estimate),
        orders_low: round_half_even(last.lower_bound),
        orders_high: round_half_even(last.upper_bound),
        top_drivers: TOP_DRIVERS.iter().map(|s| s.to_string()).collect(),
        updated_at: timestamp,
        source_url: String::new(),
    })
}

/// `YYYY-Www` using Sunday-based week numbers (`%U`, 00-53).
///
/// This is not the ISO week used for seasonal matching; the two can differ
/// around the turn of the year.
pub fn period_label(date: NaiveDate) -> String {
    date.format("%Y-W%U").to_string()
}

/// ISO 8601 with microseconds and an explicit `+00:00` offset.
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Nearest integer, ties to even.
fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}
