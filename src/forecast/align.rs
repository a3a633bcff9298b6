//! Weekly alignment and forward fill.
//!
//! Resamples arbitrary-frequency facts onto a Monday grid spanning the
//! input's date range, carrying the last known orders value forward into
//! weeks without an exact match.

use crate::error::InputError;
use crate::models::{Observation, RawRecord, WeeklySeries};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Align raw records onto Monday week boundaries.
///
/// The grid starts at the first Monday on or after the earliest date and
/// ends at the last Monday on or before the latest date. Only records dated
/// exactly on a boundary contribute values. When a date repeats, the last
/// record in input order wins.
pub fn align_weekly(records: &[RawRecord]) -> Result<WeeklySeries, InputError> {
    if records.is_empty() {
        return Err(InputError::EmptySeries);
    }

    let mut by_date: BTreeMap<NaiveDate, Option<f64>> = BTreeMap::new();
    for record in records {
        if by_date.insert(record.date, record.orders).is_some() {
            debug!("Duplicate date {}, keeping the later row", record.date);
        }
    }

    let (start, end) = match (by_date.keys().next(), by_date.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(InputError::EmptySeries),
    };

    let grid_start = next_monday(start);
    if grid_start > end {
        return Err(InputError::NoWeeklyBoundary { start, end });
    }

    let mut observations = Vec::new();
    let mut last_known: Option<f64> = None;
    let mut leading_gaps = 0usize;

    let mut boundary = grid_start;
    while boundary <= end {
        if let Some(Some(value)) = by_date.get(&boundary) {
            last_known = Some(*value);
        }

        match last_known {
            Some(value) => observations.push(Observation::new(boundary, value)),
            None => leading_gaps += 1,
        }

        boundary += Duration::days(7);
    }

    if observations.is_empty() {
        return Err(InputError::NoUsableOrders);
    }

    if leading_gaps > 0 {
        warn!(
            "Dropped {} leading week(s) with no orders value before {}",
            leading_gaps, observations[0].date
        );
    }

    WeeklySeries::new(observations)
}

/// First Monday on or after `date`.
fn next_monday(date: NaiveDate) -> NaiveDate {
    let offset = (7 - date.weekday().num_days_from_monday()) % 7;
    date + Duration::days(offset as i64)
}
