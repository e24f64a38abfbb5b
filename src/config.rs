//! Configuration for the lag tracker.

use crate::articles::ArticlesOptions;
use crate::report::ReportFormat;
use crate::source::{LabelRules, SourceOptions};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main configuration for the lag tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Header of the timestamp column in lag exports
    pub timestamp_column: String,

    /// Header of the lag column; the second column is used when unset
    pub lag_column: Option<String>,

    /// IANA zone that offset-aware timestamps are converted into
    pub timezone: Option<String>,

    /// Rules for deriving source labels from file names
    pub label: LabelRules,

    /// Lag report output settings
    pub report: ReportConfig,

    /// Article comparison settings
    pub articles: ArticlesOptions,

    /// Default directory for generated reports
    pub export_path: PathBuf,

    /// Path for storing run statistics
    pub data_path: PathBuf,
}

/// Lag report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Worksheet name of the xlsx report
    pub sheet_name: String,
    /// Format used when neither the CLI nor the output path decides
    pub default_format: ReportFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Lag Tracker".to_string(),
            default_format: ReportFormat::Xlsx,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lag-tracker");

        Self {
            timestamp_column: "Time".to_string(),
            lag_column: None,
            timezone: None,
            label: LabelRules::default(),
            report: ReportConfig::default(),
            articles: ArticlesOptions::default(),
            export_path: data_dir.join("exports"),
            data_path: data_dir,
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lag-tracker")
            .join("config.json")
    }

    /// Path of the persisted statistics of the last run.
    pub fn stats_path(&self) -> PathBuf {
        self.data_path.join("last_run.json")
    }

    /// Ensure all required directories exist.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.export_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        std::fs::create_dir_all(&self.data_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Write this configuration to `path` unless a file is already there,
    /// and create the export and data directories.
    ///
    /// Returns whether a file was written.
    pub fn init_at(&self, path: &Path) -> Result<bool, ConfigError> {
        self.ensure_directories()?;
        if path.exists() {
            return Ok(false);
        }
        self.save_to(path)?;
        tracing::info!(path = %path.display(), "wrote default configuration");
        Ok(true)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parsed_timezone()?;
        if self.articles.header_scan_rows == 0 {
            return Err(ConfigError::InvalidValue(
                "articles.header_scan_rows must be at least 1".to_string(),
            ));
        }
        if self.timestamp_column.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "timestamp_column must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured timezone, if any.
    pub fn parsed_timezone(&self) -> Result<Option<Tz>, ConfigError> {
        self.timezone
            .as_deref()
            .map(|name| {
                name.trim()
                    .parse::<Tz>()
                    .map_err(|_| ConfigError::InvalidTimezone(name.to_string()))
            })
            .transpose()
    }

    /// Options for reading lag exports.
    pub fn source_options(&self) -> Result<SourceOptions, ConfigError> {
        Ok(SourceOptions {
            timestamp_column: self.timestamp_column.clone(),
            lag_column: self.lag_column.clone(),
            timezone: self.parsed_timezone()?,
            label: self.label.clone(),
        })
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Serialize error: {0}")]
    SerializeError(String),
    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timestamp_column, "Time");
        assert!(config.lag_column.is_none());
        assert_eq!(config.report.sheet_name, "Lag Tracker");
        assert_eq!(config.report.default_format, ReportFormat::Xlsx);
        assert_eq!(config.articles.header_scan_rows, 5);
        assert_eq!(config.label.split_marker, "-data");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_file() {
        let config: Config =
            serde_json::from_str(r#"{"timezone": "Europe/Berlin", "report": {"default_format": "csv"}}"#)
                .unwrap();
        assert_eq!(config.timestamp_column, "Time");
        assert_eq!(config.report.sheet_name, "Lag Tracker");
        assert_eq!(config.report.default_format, ReportFormat::Csv);
        assert_eq!(
            config.parsed_timezone().unwrap(),
            Some(chrono_tz::Europe::Berlin)
        );
    }

    #[test]
    fn test_invalid_values() {
        let config = Config {
            timezone: Some("Mars/Olympus".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTimezone(_))
        ));

        let mut config = Config::default();
        config.articles.header_scan_rows = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join("lag-tracker-config-test")
            .join("config.json");
        let config = Config {
            lag_column: Some("lag".to_string()),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.lag_column.as_deref(), Some("lag"));

        let options = loaded.source_options().unwrap();
        assert_eq!(options.lag_column.as_deref(), Some("lag"));
        assert!(options.timezone.is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_init_writes_once() {
        let dir = std::env::temp_dir().join("lag-tracker-config-init-test");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("config.json");
        let config = Config {
            export_path: dir.join("exports"),
            data_path: dir.join("data"),
            ..Config::default()
        };

        assert!(config.init_at(&path).unwrap());
        assert!(dir.join("exports").is_dir());
        assert!(dir.join("data").is_dir());

        let edited = Config {
            lag_column: Some("edited".to_string()),
            ..config.clone()
        };
        edited.save_to(&path).unwrap();
        assert!(!config.init_at(&path).unwrap());
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.lag_column.as_deref(), Some("edited"));
        assert_eq!(loaded.export_path, dir.join("exports"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("lag-tracker-no-such-config.json");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.timestamp_column, "Time");
    }
}
