//! Sample type and the cell parsers that produce it.
//!
//! Grafana exports are loose about cell contents, so lag values are parsed
//! leniently while timestamps are parsed strictly.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A single lag reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Wall-clock time of the reading
    pub timestamp: NaiveDateTime,
    /// Lag value at that time
    pub lag: i64,
}

impl Sample {
    pub fn new(timestamp: NaiveDateTime, lag: i64) -> Self {
        Self { timestamp, lag }
    }

    /// Calendar date the sample belongs to.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Whether the sample is part of a backlog episode.
    pub fn is_lagging(&self) -> bool {
        self.lag > 0
    }
}

/// Timestamp layouts that carry a UTC offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Timestamp layouts without offset, taken as local wall time.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

/// Parse a timestamp cell into local wall-clock time.
///
/// Offset-aware values keep their own wall time unless `zone` is given, in
/// which case they are converted into it. Epoch values (10-digit seconds or
/// 13-digit milliseconds) are UTC unless `zone` is given.
pub fn parse_timestamp(raw: &str, zone: Option<Tz>) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(utc) = parse_epoch(raw) {
        return Some(wall_clock(utc, zone));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(wall_clock(dt, zone));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(wall_clock(dt, zone));
        }
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

fn parse_epoch(raw: &str) -> Option<DateTime<Utc>> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: i64 = raw.parse().ok()?;
    match raw.len() {
        10 => DateTime::from_timestamp(value, 0),
        13 => DateTime::from_timestamp_millis(value),
        _ => None,
    }
}

fn wall_clock<T: TimeZone>(dt: DateTime<T>, zone: Option<Tz>) -> NaiveDateTime {
    match zone {
        Some(tz) => dt.with_timezone(&tz).naive_local(),
        None => dt.naive_local(),
    }
}

/// Parse a lag cell.
///
/// Integers are taken as-is, finite decimals are truncated toward zero.
/// Anything else (blank cells, `NaN`, text, decimals outside the `i64`
/// range) yields `None`; callers coerce that to 0.
pub fn parse_lag(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            let value = value.trunc();
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
            (i64::MIN as f64..i64::MAX as f64)
                .contains(&value)
                .then_some(value as i64)
        }
        _ => None,
    }
}
