//! Summary report generation.
//!
//! This module renders the forecast summary as JSON and CSV and writes
//! both files into the reports directory.

use crate::error::FilesystemError;
use crate::models::Summary;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Locations of the two report files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Reports directory, created if missing.
    pub dir: PathBuf,
    /// JSON file name inside `dir`.
    pub json_file: String,
    /// CSV file name inside `dir`.
    pub csv_file: String,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("reports"),
            json_file: "forecast_summary.json".to_string(),
            csv_file: "forecast_summary.csv".to_string(),
        }
    }
}

impl From<&crate::config::OutputConfig> for OutputPaths {
    fn from(config: &crate::config::OutputConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            json_file: config.json_file.clone(),
            csv_file: config.csv_file.clone(),
        }
    }
}

impl OutputPaths {
    pub fn json_path(&self) -> PathBuf {
        self.dir.join(&self.json_file)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.dir.join(&self.csv_file)
    }
}

/// Paths actually written by [`write_reports`].
#[derive(Debug, Clone)]
pub struct WrittenReports {
    pub json: PathBuf,
    pub csv: PathBuf,
}

/// Generate the JSON report: an array holding the single summary record.
pub fn generate_json_report(summary: &Summary) -> Result<String, FilesystemError> {
    serde_json::to_string(std::slice::from_ref(summary)).map_err(Into::into)
}

/// Generate the console line: the bare summary object.
pub fn generate_console_line(summary: &Summary) -> Result<String, FilesystemError> {
    serde_json::to_string(summary).map_err(Into::into)
}

/// Generate the CSV report: header plus one data row.
///
/// `top_drivers` is stored as a JSON array in its cell.
pub fn generate_csv_report(summary: &Summary) -> Result<String, FilesystemError> {
    let drivers = serde_json::to_string(&summary.top_drivers)?;
    let forecast = summary.orders_forecast.to_string();
    let low = summary.orders_low.to_string();
    let high = summary.orders_high.to_string();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(Summary::COLUMNS)?;
    writer.write_record([
        summary.run_id.as_str(),
        summary.period.as_str(),
        forecast.as_str(),
        low.as_str(),
        high.as_str(),
        drivers.as_str(),
        summary.updated_at.as_str(),
        summary.source_url.as_str(),
    ])?;

    let bytes = writer
        .into_inner()
        .map_err(|e| FilesystemError::Encode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| FilesystemError::Encode(e.to_string()))
}

/// Create the reports directory and write both report files.
pub fn write_reports(summary: &Summary, paths: &OutputPaths) -> Result<WrittenReports, FilesystemError> {
    std::fs::create_dir_all(&paths.dir).map_err(|source| FilesystemError::CreateDir {
        path: paths.dir.clone(),
        source,
    })?;
    debug!("Reports directory ready: {}", paths.dir.display());

    let json = paths.json_path();
    write_file(&json, &generate_json_report(summary)?)?;
    info!("Wrote {}", json.display());

    let csv = paths.csv_path();
    write_file(&csv, &generate_csv_report(summary)?)?;
    info!("Wrote {}", csv.display());

    Ok(WrittenReports { json, csv })
}

fn write_file(path: &Path, content: &str) -> Result<(), FilesystemError> {
    std::fs::write(path, content).map_err(|source| FilesystemError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TOP_DRIVERS;
    use tempfile::TempDir;

    fn create_test_summary() -> Summary {
        Summary {
            run_id: "2024-03-01T09:30:00.000000+00:00".to_string(),
            period: "2024-W15".to_string(),
            orders_forecast: 100,
            orders_low: 85,
            orders_high: 115,
            top_drivers: TOP_DRIVERS.iter().map(|s| s.to_string()).collect(),
            updated_at: "2024-03-01T09:30:00.000000+00:00".to_string(),
            source_url: String::new(),
        }
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_summary()).unwrap();

        assert!(json.starts_with("[{"));
        assert!(json.ends_with("}]"));
        assert!(json.contains("\"orders_forecast\":100"));
        // Non-ASCII stays unescaped.
        assert!(json.contains("直近4週平均"));
        assert!(!json.contains("\\u"));

        let parsed: Vec<Summary> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![create_test_summary()]);
    }

    #[test]
    fn test_generate_console_line() {
        let line = generate_console_line(&create_test_summary()).unwrap();
        assert!(line.starts_with("{\"run_id\""));
        assert!(!line.contains('\n'));
        assert!(line.contains("前年同週（あれば）"));
    }

    #[test]
    fn test_generate_csv_report() {
        let csv = generate_csv_report(&create_test_summary()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "run_id,period,orders_forecast,orders_low,orders_high,top_drivers,updated_at,source_url"
        );

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[1], "2024-W15");
        assert_eq!(&row[2], "100");
        assert_eq!(&row[5], "[\"前年同週（あれば）\",\"直近4週平均\"]");
        assert_eq!(&row[7], "");
    }

    #[test]
    fn test_write_reports_creates_directory() {
        let temp = TempDir::new().unwrap();
        let paths = OutputPaths {
            dir: temp.path().join("nested").join("reports"),
            ..OutputPaths::default()
        };

        let written = write_reports(&create_test_summary(), &paths).unwrap();

        assert!(written.json.ends_with("forecast_summary.json"));
        assert!(written.csv.ends_with("forecast_summary.csv"));
        let json = std::fs::read_to_string(&written.json).unwrap();
        assert!(json.contains("2024-W15"));
        let csv = std::fs::read_to_string(&written.csv).unwrap();
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn test_write_reports_fails_when_dir_is_a_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("reports");
        std::fs::write(&blocker, "not a directory").unwrap();

        let paths = OutputPaths {
            dir: blocker,
            ..OutputPaths::default()
        };
        let err = write_reports(&create_test_summary(), &paths).unwrap_err();
        assert!(matches!(err, FilesystemError::CreateDir { .. }));
    }
}
