//! Spreadsheet rows for lag summaries.

use crate::core::summary::{format_duration, DaySummary};
use serde::Serialize;

/// Column headers of the lag report, in order.
pub const REPORT_HEADERS: [&str; 8] = [
    "Day",
    "Franchise",
    "Start Time",
    "End Time",
    "Duration",
    "Max Lag",
    "Max Lag Timestamp",
    "Duration (minutes)",
];

const TIME_FORMAT: &str = "%H:%M:%S";

/// One report row, already rendered for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Day")]
    pub day: String,
    #[serde(rename = "Franchise")]
    pub franchise: String,
    #[serde(rename = "Start Time")]
    pub start_time: String,
    #[serde(rename = "End Time")]
    pub end_time: String,
    #[serde(rename = "Duration")]
    pub duration: String,
    #[serde(rename = "Max Lag")]
    pub max_lag: i64,
    #[serde(rename = "Max Lag Timestamp")]
    pub max_lag_timestamp: String,
    #[serde(rename = "Duration (minutes)")]
    pub duration_minutes: f64,
}

impl From<&DaySummary> for ReportRow {
    fn from(summary: &DaySummary) -> Self {
        Self {
            day: summary.day.format("%Y-%m-%d").to_string(),
            franchise: summary.source_label.clone(),
            start_time: summary.window_start.format(TIME_FORMAT).to_string(),
            end_time: summary.window_end.format(TIME_FORMAT).to_string(),
            duration: format_duration(summary.duration),
            max_lag: summary.peak_lag,
            max_lag_timestamp: summary.peak_timestamp.format(TIME_FORMAT).to_string(),
            duration_minutes: summary.duration_minutes(),
        }
    }
}

/// Render summaries as report rows, preserving order.
pub fn report_rows(summaries: &[DaySummary]) -> Vec<ReportRow> {
    summaries.iter().map(ReportRow::from).collect()
}
