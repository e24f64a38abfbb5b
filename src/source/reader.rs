//! Reading lag samples from CSV exports.

use super::label::{label_for_path, LabelRules};
use super::types::{parse_lag, parse_timestamp, Sample};
use super::SourceError;
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// How to interpret the columns of an export.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Header of the timestamp column (case-insensitive); first column if absent
    pub timestamp_column: String,
    /// Header of the lag column; second column when `None`
    pub lag_column: Option<String>,
    /// Zone that offset-aware and epoch timestamps are converted into
    pub timezone: Option<Tz>,
    /// File name to source label rules
    pub label: LabelRules,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            timestamp_column: "Time".to_string(),
            lag_column: None,
            timezone: None,
            label: LabelRules::default(),
        }
    }
}

/// Samples parsed from one table.
#[derive(Debug, Clone, Default)]
pub struct ParsedSamples {
    pub samples: Vec<Sample>,
    /// Number of data rows read
    pub rows_read: usize,
    /// Number of lag cells that could not be parsed and became 0
    pub coerced_lag_values: usize,
}

/// One export file, read and labelled.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub label: String,
    pub path: PathBuf,
    pub samples: Vec<Sample>,
    pub rows_read: usize,
    pub coerced_lag_values: usize,
}

impl LoadedSource {
    /// Number of distinct calendar days in the file.
    pub fn day_count(&self) -> usize {
        self.samples
            .iter()
            .map(Sample::day)
            .collect::<BTreeSet<NaiveDate>>()
            .len()
    }
}

/// Read one export file from disk.
pub fn read_source(path: &Path, options: &SourceOptions) -> Result<LoadedSource, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parse_samples(file, options)?;
    let label = label_for_path(path, &options.label);

    tracing::debug!(
        path = %path.display(),
        label = %label,
        rows = parsed.rows_read,
        coerced = parsed.coerced_lag_values,
        "read lag export"
    );

    Ok(LoadedSource {
        label,
        path: path.to_path_buf(),
        samples: parsed.samples,
        rows_read: parsed.rows_read,
        coerced_lag_values: parsed.coerced_lag_values,
    })
}

/// Parse samples from CSV data with a header row.
///
/// A timestamp that cannot be parsed fails the whole table; a lag value that
/// cannot be parsed becomes 0.
pub fn parse_samples<R: Read>(reader: R, options: &SourceOptions) -> Result<ParsedSamples, SourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let (time_index, lag_index) = resolve_columns(&headers, options)?;

    let mut parsed = ParsedSamples::default();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = index + 1;

        let raw_time = record.get(time_index).unwrap_or("");
        let timestamp =
            parse_timestamp(raw_time, options.timezone).ok_or_else(|| SourceError::Timestamp {
                row,
                value: raw_time.to_string(),
            })?;

        let raw_lag = record.get(lag_index).unwrap_or("");
        let lag = match parse_lag(raw_lag) {
            Some(lag) => lag,
            None => {
                tracing::trace!(row, value = raw_lag, "lag value coerced to 0");
                parsed.coerced_lag_values += 1;
                0
            }
        };

        parsed.samples.push(Sample::new(timestamp, lag));
        parsed.rows_read += 1;
    }

    Ok(parsed)
}

fn resolve_columns(
    headers: &csv::StringRecord,
    options: &SourceOptions,
) -> Result<(usize, usize), SourceError> {
    if headers.len() < 2 {
        return Err(SourceError::MissingColumn(
            "expected a timestamp column and a lag column".to_string(),
        ));
    }

    let find = |name: &str| {
        headers
            .iter()
            .position(|header| clean_header(header).eq_ignore_ascii_case(name.trim()))
    };

    let time_index = find(&options.timestamp_column).unwrap_or(0);

    let lag_index = match &options.lag_column {
        Some(name) => find(name).ok_or_else(|| SourceError::MissingColumn(name.clone()))?,
        None if time_index == 1 => 0,
        None => 1,
    };

    Ok((time_index, lag_index))
}

fn clean_header(header: &str) -> &str {
    header.trim_start_matches('\u{feff}').trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grafana_export() {
        let data = "\"Time\",\"orders-consumer\"\n\
                    2024-03-05 08:00:00,0\n\
                    2024-03-05 08:05:00,5\n\
                    2024-03-05 08:10:00,\n\
                    2024-03-05 08:15:00,abc\n";

        let parsed = parse_samples(data.as_bytes(), &SourceOptions::default()).unwrap();
        assert_eq!(parsed.rows_read, 4);
        assert_eq!(parsed.coerced_lag_values, 2);
        let lags: Vec<i64> = parsed.samples.iter().map(|s| s.lag).collect();
        assert_eq!(lags, vec![0, 5, 0, 0]);
    }

    #[test]
    fn test_huge_lag_coerced_not_clamped() {
        let data = "Time,lag\n2024-03-05 08:00:00,3\n2024-03-05 08:05:00,1e30\n";
        let parsed = parse_samples(data.as_bytes(), &SourceOptions::default()).unwrap();
        assert_eq!(parsed.coerced_lag_values, 1);
        let lags: Vec<i64> = parsed.samples.iter().map(|s| s.lag).collect();
        assert_eq!(lags, vec![3, 0]);
    }

    #[test]
    fn test_bad_timestamp_is_fatal() {
        let data = "Time,lag\n2024-03-05 08:00:00,1\nnot a time,2\n";
        let err = parse_samples(data.as_bytes(), &SourceOptions::default()).unwrap_err();
        match err {
            SourceError::Timestamp { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "not a time");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_time_column_located_by_header() {
        let data = "\u{feff}series,time\n3,2024-03-05 08:00:00\n";
        let parsed = parse_samples(data.as_bytes(), &SourceOptions::default()).unwrap();
        assert_eq!(parsed.samples.len(), 1);
        assert_eq!(parsed.samples[0].lag, 3);
    }

    #[test]
    fn test_named_lag_column() {
        let data = "Time,other,lag\n2024-03-05 08:00:00,99,4\n";
        let options = SourceOptions {
            lag_column: Some("lag".to_string()),
            ..SourceOptions::default()
        };
        let parsed = parse_samples(data.as_bytes(), &options).unwrap();
        assert_eq!(parsed.samples[0].lag, 4);

        let options = SourceOptions {
            lag_column: Some("missing".to_string()),
            ..SourceOptions::default()
        };
        assert!(matches!(
            parse_samples(data.as_bytes(), &options),
            Err(SourceError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_single_column_rejected() {
        let data = "Time\n2024-03-05 08:00:00\n";
        assert!(matches!(
            parse_samples(data.as_bytes(), &SourceOptions::default()),
            Err(SourceError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_day_count() {
        let data = "Time,lag\n2024-03-05 08:00:00,1\n2024-03-05 09:00:00,1\n2024-03-06 08:00:00,0\n";
        let parsed = parse_samples(data.as_bytes(), &SourceOptions::default()).unwrap();
        let source = LoadedSource {
            label: "x".to_string(),
            path: PathBuf::from("x.csv"),
            samples: parsed.samples,
            rows_read: parsed.rows_read,
            coerced_lag_values: parsed.coerced_lag_values,
        };
        assert_eq!(source.day_count(), 2);
    }
}
