//! Lag window extraction.
//!
//! Samples are grouped by calendar day. For each day the window is the run
//! of strictly positive lag samples that contains the first occurrence of
//! the day's peak, found by scanning outwards from the peak in both
//! directions.

use crate::core::summary::DaySummary;
use crate::source::types::Sample;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Extracts one lag window per day for a single source.
#[derive(Debug, Clone)]
pub struct LagWindowExtractor {
    /// Label stamped on every summary
    label: String,
}

impl LagWindowExtractor {
    /// Create an extractor for the given source label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Get the source label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Lazily produce summaries in ascending day order.
    ///
    /// Days whose peak lag is not positive produce nothing.
    pub fn extract(&self, samples: Vec<Sample>) -> impl Iterator<Item = DaySummary> + '_ {
        group_by_day(samples)
            .into_iter()
            .filter_map(move |(day, group)| extract_day(day, &self.label, group))
    }
}

/// Extract all summaries for one source.
pub fn extract_lag_windows(label: &str, samples: Vec<Sample>) -> Vec<DaySummary> {
    LagWindowExtractor::new(label).extract(samples).collect()
}

/// Group samples by calendar day, keeping input order within a day.
pub fn group_by_day(samples: Vec<Sample>) -> BTreeMap<NaiveDate, Vec<Sample>> {
    let mut days: BTreeMap<NaiveDate, Vec<Sample>> = BTreeMap::new();
    for sample in samples {
        days.entry(sample.day()).or_default().push(sample);
    }
    days
}

/// Extract the window for a single day's samples.
///
/// Samples are sorted by timestamp first; equal timestamps keep their
/// input order.
pub fn extract_day(day: NaiveDate, label: &str, mut samples: Vec<Sample>) -> Option<DaySummary> {
    samples.sort_by_key(|sample| sample.timestamp);

    let peak_lag = samples.iter().map(|sample| sample.lag).max()?;
    if peak_lag <= 0 {
        tracing::trace!(%day, label, "no lag on day");
        return None;
    }

    // First occurrence wins ties.
    let peak_index = samples.iter().position(|sample| sample.lag == peak_lag)?;

    let mut start_index = peak_index;
    while start_index > 0 && samples[start_index - 1].is_lagging() {
        start_index -= 1;
    }

    let mut end_index = peak_index;
    while end_index + 1 < samples.len() && samples[end_index + 1].is_lagging() {
        end_index += 1;
    }

    let start = samples[start_index].timestamp;
    let end = samples[end_index].timestamp;
    let peak = samples[peak_index].timestamp;

    tracing::trace!(%day, label, peak_lag, %start, %end, "lag window");

    Some(DaySummary {
        day,
        source_label: label.to_string(),
        window_start: start.time(),
        window_end: end.time(),
        duration: end - start,
        peak_lag,
        peak_timestamp: peak.time(),
    })
}
