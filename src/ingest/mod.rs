//! Input ingestion.
//!
//! This module reads the raw facts file into typed records.

pub mod reader;

pub use reader::{read_records, ReadOptions};
