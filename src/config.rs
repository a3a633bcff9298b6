//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.weekcast.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".weekcast.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Input settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Facts file settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the facts CSV.
    #[serde(default = "default_input_path")]
    pub path: PathBuf,

    /// Header of the date column.
    #[serde(default = "default_date_column")]
    pub date_column: String,

    /// Header of the orders column.
    #[serde(default = "default_orders_column")]
    pub orders_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
            date_column: default_date_column(),
            orders_column: default_orders_column(),
        }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("facts.csv")
}

fn default_date_column() -> String {
    "date".to_string()
}

fn default_orders_column() -> String {
    "orders".to_string()
}

/// Report output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Reports directory.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// JSON report file name.
    #[serde(default = "default_json_file")]
    pub json_file: String,

    /// CSV report file name.
    #[serde(default = "default_csv_file")]
    pub csv_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            json_file: default_json_file(),
            csv_file: default_csv_file(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_json_file() -> String {
    "forecast_summary.json".to_string()
}

fn default_csv_file() -> String {
    "forecast_summary.csv".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only flags given on the command line override file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref input) = args.input {
            self.input.path = input.clone();
        }
        if let Some(ref column) = args.date_column {
            self.input.date_column = column.clone();
        }
        if let Some(ref column) = args.orders_column {
            self.input.orders_column = column.clone();
        }
        if let Some(ref dir) = args.output_dir {
            self.output.dir = dir.clone();
        }
    }

    /// Check settings that CLI validation cannot see.
    pub fn validate(&self) -> Result<()> {
        if self.input.date_column.trim().is_empty() || self.input.orders_column.trim().is_empty() {
            anyhow::bail!("Column names must not be empty");
        }
        if self.input.date_column.eq_ignore_ascii_case(&self.input.orders_column) {
            anyhow::bail!("Date and orders columns must differ");
        }
        if self.output.json_file.is_empty() || self.output.csv_file.is_empty() {
            anyhow::bail!("Report file names must not be empty");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.path, PathBuf::from("facts.csv"));
        assert_eq!(config.input.date_column, "date");
        assert_eq!(config.output.dir, PathBuf::from("reports"));
        assert_eq!(config.output.json_file, "forecast_summary.json");
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[input]
path = "data/orders.csv"
orders_column = "qty"

[output]
dir = "out"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.path, PathBuf::from("data/orders.csv"));
        assert_eq!(config.input.date_column, "date");
        assert_eq!(config.input.orders_column, "qty");
        assert_eq!(config.output.dir, PathBuf::from("out"));
        assert_eq!(config.output.csv_file, "forecast_summary.csv");
    }

    #[test]
    fn test_merge_only_overrides_given_flags() {
        let mut config: Config = toml::from_str("[input]\npath = \"from_file.csv\"\n").unwrap();

        let args = Args::parse_from(["weekcast", "--output-dir", "cli_reports"]);
        config.merge_with_args(&args);
        assert_eq!(config.input.path, PathBuf::from("from_file.csv"));
        assert_eq!(config.output.dir, PathBuf::from("cli_reports"));

        let args = Args::parse_from(["weekcast", "--input", "cli.csv"]);
        config.merge_with_args(&args);
        assert_eq!(config.input.path, PathBuf::from("cli.csv"));
    }

    #[test]
    fn test_validate_rejects_same_columns() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.input.orders_column = "DATE".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[output]"));

        let round: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(round, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[output]\njson_file = \"x.json\"\n").unwrap();

        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config.output.json_file, "x.json");

        std::fs::write(temp.path(), "[output\n").unwrap();
        assert!(Config::load(temp.path()).is_err());
    }
}
