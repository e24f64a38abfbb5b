//! Per-day lag window summaries.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// The lag window reported for one source on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Calendar date of the window
    pub day: NaiveDate,
    /// Label of the source file the samples came from
    pub source_label: String,
    /// Time of the first sample in the window
    pub window_start: NaiveTime,
    /// Time of the last sample in the window
    pub window_end: NaiveTime,
    /// Time between first and last sample of the window
    #[serde(rename = "duration_ms", with = "duration_ms")]
    pub duration: Duration,
    /// Highest lag seen on the day
    pub peak_lag: i64,
    /// Time of the first sample with the highest lag
    pub peak_timestamp: NaiveTime,
}

impl DaySummary {
    /// Window duration in (fractional) minutes.
    pub fn duration_minutes(&self) -> f64 {
        self.duration.num_milliseconds() as f64 / 60_000.0
    }
}

/// Format a duration as `HH:MM:SS`, dropping sub-second precision.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!(
        "{sign}{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Serde support for Duration as whole milliseconds.
mod duration_ms {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.num_milliseconds().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = i64::deserialize(deserializer)?;
        Ok(Duration::milliseconds(millis))
    }
}
