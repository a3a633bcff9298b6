//! Report output.

pub mod generator;

pub use generator::{generate_console_line, write_reports, OutputPaths};
