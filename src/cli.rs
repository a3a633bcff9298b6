//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Weekcast - weekly order forecast
///
/// Reads weekly order facts, forecasts eight weeks ahead by blending the
/// same week last year with the trailing four-week mean, and writes the
/// final week's estimate and band as JSON and CSV.
///
/// Every flag is optional; with none, reads ./facts.csv and writes
/// ./reports/forecast_summary.{json,csv}.
///
/// Examples:
///   weekcast
///   weekcast --input data/orders.csv --output-dir out
///   weekcast --orders-column qty --dry-run
///   weekcast --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Facts CSV to read [default: facts.csv]
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Directory for the report files [default: reports]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .weekcast.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Header of the date column [default: date]
    #[arg(long, value_name = "NAME")]
    pub date_column: Option<String>,

    /// Header of the orders column [default: orders]
    #[arg(long, value_name = "NAME")]
    pub orders_column: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Forecast and print the summary without writing report files
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .weekcast.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        for (flag, value) in [
            ("--date-column", &self.date_column),
            ("--orders-column", &self.orders_column),
        ] {
            if let Some(name) = value {
                if name.trim().is_empty() {
                    return Err(format!("{} must not be empty", flag));
                }
            }
        }

        if let (Some(date), Some(orders)) = (&self.date_column, &self.orders_column) {
            if date.eq_ignore_ascii_case(orders) {
                return Err("Date and orders columns must differ".to_string());
            }
        }

        if let Some(ref dir) = self.output_dir {
            if dir.as_os_str().is_empty() {
                return Err("Output directory must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
