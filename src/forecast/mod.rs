//! Forecasting pipeline.
//!
//! Weekly alignment, the sequential blend forecaster, and projection of
//! the final step into the published summary.

pub mod align;
pub mod engine;
pub mod summary;

pub use align::align_weekly;
pub use engine::{forecast, HORIZON};
pub use summary::summarize;
