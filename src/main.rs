//! Weekcast - weekly order forecast
//!
//! A batch job that reads historical weekly order facts, forecasts eight
//! weeks ahead, and writes the final week's estimate with its uncertainty
//! band to JSON and CSV reports.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Invalid arguments, unusable input, or failure writing reports

mod cli;
mod config;
mod error;
mod forecast;
mod ingest;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use cli::Args;
use config::Config;
use models::Summary;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("Weekcast v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args) {
        error!("Forecast failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .weekcast.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            config::DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::DEFAULT_CONFIG_FILE))?;

    eprintln!("Created {} with default settings.", config::DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr; stdout carries only the summary line.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: a tracing subscriber was already installed");
    }
}

/// Run the complete forecast job.
fn run(args: &Args) -> Result<()> {
    let mut config = load_config(args)?;
    config.merge_with_args(args);
    config.validate()?;

    // Captured once; shared by run_id and updated_at.
    let now = Utc::now();
    let summary = build_summary(&config, now)?;

    if args.dry_run {
        info!("Dry run: no report files written");
    } else {
        let paths = report::OutputPaths::from(&config.output);
        let written = report::write_reports(&summary, &paths)
            .context("Failed to write forecast reports")?;
        debug!(
            "Reports: {} and {}",
            written.json.display(),
            written.csv.display()
        );
    }

    println!("{}", report::generate_console_line(&summary)?);
    Ok(())
}

/// Read, align and forecast, returning the published summary.
fn build_summary(config: &Config, now: DateTime<Utc>) -> Result<Summary> {
    let options = ingest::ReadOptions::from(&config.input);
    let records = ingest::read_records(&config.input.path, &options)
        .with_context(|| format!("Failed to load facts from {}", config.input.path.display()))?;
    info!(
        "Read {} rows from {}",
        records.len(),
        config.input.path.display()
    );

    let series = forecast::align_weekly(&records).context("Failed to align weekly series")?;
    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        info!(
            "Aligned {} weeks from {} to {}",
            series.len(),
            first.date,
            last.date
        );
    }

    let points = forecast::forecast(&series, forecast::HORIZON)?;
    let summary = forecast::summarize(&points, now)?;
    info!(
        "Forecast for {}: {} [{}, {}]",
        summary.period, summary.orders_forecast, summary.orders_low, summary.orders_high
    );

    Ok(summary)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", config::DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;
    use chrono::TimeZone;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join(name)
    }

    fn config_for(input: PathBuf) -> Config {
        let mut config = Config::default();
        config.input.path = input;
        config
    }

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 20, 6, 0, 0).unwrap()
    }

    #[test]
    fn test_constant_fixture_end_to_end() {
        let summary = build_summary(&config_for(fixture("facts.csv")), fixed_clock()).unwrap();

        assert_eq!(summary.period, "2024-W15");
        assert_eq!(summary.orders_forecast, 100);
        assert_eq!(summary.orders_low, 85);
        assert_eq!(summary.orders_high, 115);
        assert_eq!(summary.run_id, "2024-02-20T06:00:00.000000+00:00");
        assert_eq!(summary.updated_at, summary.run_id);
    }

    #[test]
    fn test_small_values_use_band_floor() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("facts.csv");
        let mut content = String::from("date,orders\n");
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for week in 0..12 {
            content.push_str(&format!("{},2\n", start + chrono::Duration::weeks(week)));
        }
        std::fs::write(&input, content).unwrap();

        let summary = build_summary(&config_for(input), fixed_clock()).unwrap();
        assert_eq!(summary.orders_forecast, 2);
        assert_eq!(summary.orders_low, 1);
        assert_eq!(summary.orders_high, 3);
    }

    #[test]
    fn test_same_input_and_clock_give_same_summary() {
        let config = config_for(fixture("facts.csv"));
        let a = build_summary(&config, fixed_clock()).unwrap();
        let b = build_summary(&config, fixed_clock()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_input_is_an_input_error() {
        let err = build_summary(&config_for(PathBuf::from("/nonexistent/facts.csv")), fixed_clock())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::Read { .. })
        ));
    }

    #[test]
    fn test_header_only_input_is_empty() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("facts.csv");
        std::fs::write(&input, "date,orders\n").unwrap();

        let err = build_summary(&config_for(input), fixed_clock()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::EmptySeries)
        ));
    }

    #[test]
    fn test_reports_written_for_fixture() {
        let temp = TempDir::new().unwrap();
        let mut config = config_for(fixture("facts.csv"));
        config.output.dir = temp.path().join("reports");

        let summary = build_summary(&config, fixed_clock()).unwrap();
        let written =
            report::write_reports(&summary, &report::OutputPaths::from(&config.output)).unwrap();

        let json = std::fs::read_to_string(written.json).unwrap();
        let parsed: Vec<Summary> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![summary]);
    }
}
