//! Sequential blend forecaster.
//!
//! Each step blends a seasonal signal (the value 52 same-week matches back)
//! with the trailing four-week mean, then appends its own estimate to a
//! working copy of the history so later steps see it as data.

use crate::error::ForecastError;
use crate::models::{ForecastPoint, Observation, WeeklySeries};
use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

/// Number of weeks forecast per run.
pub const HORIZON: usize = 8;

/// Trailing window for the short-term mean.
pub const MA_WINDOW: usize = 4;

/// Same-week matches to look back for the seasonal signal.
pub const SEASONAL_LAG: usize = 52;

/// Blend weights for the seasonal signal and the moving average.
pub const SEASONAL_WEIGHT: f64 = 0.6;
pub const MA_WEIGHT: f64 = 0.4;

/// Band half-width as a fraction of the estimate.
pub const BAND_RATIO: f64 = 0.15;

/// Minimum band half-width.
pub const BAND_FLOOR: f64 = 1.0;

/// Forecast `horizon` weeks past the end of `series`.
///
/// Returns one point per Monday strictly after the last observation. The
/// input series is left untouched; synthetic history lives only for the
/// duration of the call.
pub fn forecast(series: &WeeklySeries, horizon: usize) -> Result<Vec<ForecastPoint>, ForecastError> {
    if horizon == 0 {
        return Err(ForecastError::InvalidHorizon);
    }

    let mut history: Vec<Observation> = series.observations().to_vec();
    let mut target = match history.last() {
        Some(last) => next_week(last.date),
        None => return Err(ForecastError::InsufficientHistory),
    };

    let mut points = Vec::with_capacity(horizon);

    for step in 0..horizon {
        let ma4 = moving_average(&history, MA_WINDOW).ok_or(ForecastError::InsufficientHistory)?;
        let target_week = target.iso_week().week();
        let seasonal = seasonal_value(&history, target_week, SEASONAL_LAG).unwrap_or(ma4);

        let yhat = blend(seasonal, ma4);
        let band = band_half_width(yhat);

        let point = ForecastPoint {
            date: target,
            point_estimate: yhat,
            lower_bound: yhat - band,
            upper_bound: yhat + band,
        };

        debug!(
            "Step {}: {} (W{:02}) ma4={:.3} seasonal={:.3} yhat={:.3} band=±{:.3}",
            step + 1,
            target,
            target_week,
            ma4,
            seasonal,
            yhat,
            band
        );

        points.push(point);
        history.push(Observation::new(target, yhat));
        target = next_week(target);
    }

    Ok(points)
}

/// Mean of the last `window` values, or of all values when fewer exist.
fn moving_average(history: &[Observation], window: usize) -> Option<f64> {
    if history.is_empty() || window == 0 {
        return None;
    }
    let take = window.min(history.len());
    let tail = &history[history.len() - take..];
    Some(tail.iter().map(|o| o.orders).sum::<f64>() / take as f64)
}

/// Value of the `lag`-th most recent row tagged with `week`, if that many exist.
fn seasonal_value(history: &[Observation], week: u32, lag: usize) -> Option<f64> {
    if lag == 0 {
        return None;
    }
    history
        .iter()
        .rev()
        .filter(|o| o.week_of_year == week)
        .nth(lag - 1)
        .map(|o| o.orders)
}

fn blend(seasonal: f64, ma4: f64) -> f64 {
    SEASONAL_WEIGHT * seasonal + MA_WEIGHT * ma4
}

/// Symmetric half-width; lower bounds are not clamped at zero.
fn band_half_width(yhat: f64) -> f64 {
    (BAND_RATIO * yhat).max(BAND_FLOOR)
}

fn next_week(date: NaiveDate) -> NaiveDate {
    date + Duration::days(7)
}
