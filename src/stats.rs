//! Run statistics.
//!
//! Tracks what a single command did (files, rows, coerced values, output)
//! so it can be shown at the end of a run and inspected later with
//! `lag-tracker status`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Counters for one command run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Command that produced these statistics
    pub command: String,
    /// Files read and processed successfully
    pub files_processed: u64,
    /// Files skipped because of an error
    pub files_failed: u64,
    /// Data rows read across all files
    pub rows_read: u64,
    /// Lag cells that could not be parsed and became 0
    pub lag_values_coerced: u64,
    /// Distinct (file, day) groups seen
    pub days_seen: u64,
    /// Day groups with no positive lag
    pub days_without_lag: u64,
    /// Summary rows emitted
    pub summaries_emitted: u64,
    /// Articles found missing from the reference column
    pub articles_missing: u64,
    /// Run start time
    pub started_at: DateTime<Utc>,
    /// Run end time, set by `finish`
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunStats {
    /// Start counting for a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            files_processed: 0,
            files_failed: 0,
            rows_read: 0,
            lag_values_coerced: 0,
            days_seen: 0,
            days_without_lag: 0,
            summaries_emitted: 0,
            articles_missing: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Record a lag export that was extracted successfully.
    pub fn record_lag_file(&mut self, rows: usize, coerced: usize, days: usize, summaries: usize) {
        self.files_processed += 1;
        self.rows_read += rows as u64;
        self.lag_values_coerced += coerced as u64;
        self.days_seen += days as u64;
        self.days_without_lag += days.saturating_sub(summaries) as u64;
        self.summaries_emitted += summaries as u64;
    }

    /// Record an article comparison that succeeded.
    pub fn record_article_file(&mut self, missing: usize) {
        self.files_processed += 1;
        self.articles_missing += missing as u64;
    }

    /// Record a file that was skipped.
    pub fn record_failure(&mut self) {
        self.files_failed += 1;
    }

    /// Mark the run as finished.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Seconds between start and finish (or now, if unfinished).
    pub fn duration_secs(&self) -> i64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_seconds()
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Run Statistics ({}):\n\
             - Files processed: {}\n\
             - Files skipped: {}",
            self.command, self.files_processed, self.files_failed
        );

        if self.rows_read > 0 || self.summaries_emitted > 0 {
            out.push_str(&format!(
                "\n\
                 - Rows read: {}\n\
                 - Lag values coerced to 0: {}\n\
                 - Days seen: {}\n\
                 - Days without lag: {}\n\
                 - Lag windows reported: {}",
                self.rows_read,
                self.lag_values_coerced,
                self.days_seen,
                self.days_without_lag,
                self.summaries_emitted
            ));
        }

        if self.articles_missing > 0 {
            out.push_str(&format!("\n- Articles missing: {}", self.articles_missing));
        }

        out.push_str(&format!("\n- Run duration: {} seconds", self.duration_secs()));
        out
    }

    /// Save stats to disk.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Load stats saved by a previous run, if any.
    pub fn load(path: &Path) -> Result<Option<Self>, std::io::Error> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let stats = serde_json::from_str(&content).map_err(std::io::Error::other)?;
        Ok(Some(stats))
    }
}
