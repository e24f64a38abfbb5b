//! Lag Tracker - lag window reports from Grafana exports.
//!
//! This library turns Grafana CSV exports of a lag metric (for example
//! consumer lag) into one summary row per source and day: when the longest
//! backlog episode around the day's peak started and ended, how long it
//! lasted, and how high the lag got.
//!
//! It also contains a small article comparison tool that lists values from
//! one spreadsheet column that are missing from another.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Lag Tracker                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │   Source    │──▶│  Windowing  │──▶│   Report    │       │
//! │  │ (CSV parse) │   │ (per day)   │   │ (xlsx/csv)  │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │         │                 │                                 │
//! │         ▼                 ▼                                 │
//! │  ┌───────────────────────────────┐   ┌─────────────┐       │
//! │  │         Run Statistics        │   │  Articles   │       │
//! │  └───────────────────────────────┘   └─────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use lag_tracker::source::{parse_samples, SourceOptions};
//! use lag_tracker::core::extract_lag_windows;
//!
//! let csv = "Time,lag\n\
//!            2024-03-05 08:00:00,0\n\
//!            2024-03-05 08:05:00,5\n\
//!            2024-03-05 08:10:00,9\n\
//!            2024-03-05 08:15:00,0\n";
//!
//! let parsed = parse_samples(csv.as_bytes(), &SourceOptions::default()).unwrap();
//! let summaries = extract_lag_windows("Orders", parsed.samples);
//!
//! assert_eq!(summaries.len(), 1);
//! assert_eq!(summaries[0].peak_lag, 9);
//! assert_eq!(summaries[0].duration_minutes(), 5.0);
//! ```

pub mod articles;
pub mod config;
pub mod core;
pub mod report;
pub mod source;
pub mod stats;

// Re-export key types at crate root for convenience
pub use articles::{compare_workbook, ArticleComparison, ArticlesError, ArticlesOptions, Sheet};
pub use config::{Config, ConfigError};
pub use self::core::{extract_lag_windows, DaySummary, LagWindowExtractor};
pub use report::{write_report, ReportError, ReportFormat};
pub use source::{read_source, LoadedSource, Sample, SourceError, SourceOptions};
pub use stats::RunStats;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_set() {
        assert!(!VERSION.is_empty());
    }
}
