//! Report output in spreadsheet and JSON formats.

use super::rows::{report_rows, REPORT_HEADERS};
use super::ReportError;
use crate::core::summary::DaySummary;
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Output format of the lag report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Xlsx,
    Csv,
    Json,
    Jsonl,
}

impl ReportFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
            ReportFormat::Jsonl => "jsonl",
        }
    }

    /// Guess the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(ReportFormat::Xlsx),
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            "jsonl" | "ndjson" => Ok(ReportFormat::Jsonl),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Render summaries into the bytes of a report file.
pub fn render_report(
    summaries: &[DaySummary],
    format: ReportFormat,
    sheet_name: &str,
) -> Result<Vec<u8>, ReportError> {
    if summaries.is_empty() {
        return Err(ReportError::Empty);
    }

    match format {
        ReportFormat::Xlsx => render_xlsx(summaries, sheet_name),
        ReportFormat::Csv => render_csv(summaries),
        ReportFormat::Json => Ok(serde_json::to_vec_pretty(summaries)?),
        ReportFormat::Jsonl => {
            let mut out = Vec::new();
            for summary in summaries {
                serde_json::to_writer(&mut out, summary)?;
                out.push(b'\n');
            }
            Ok(out)
        }
    }
}

/// Render summaries and write them to `path`, creating parent directories.
///
/// Returns the number of rows written.
pub fn write_report(
    path: &Path,
    summaries: &[DaySummary],
    format: ReportFormat,
    sheet_name: &str,
) -> Result<usize, ReportError> {
    let bytes = render_report(summaries, format, sheet_name)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;

    tracing::info!(path = %path.display(), rows = summaries.len(), %format, "wrote lag report");
    Ok(summaries.len())
}

fn render_csv(summaries: &[DaySummary]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in report_rows(summaries) {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))
}

fn render_xlsx(summaries: &[DaySummary], sheet_name: &str) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let minutes = Format::new().set_num_format("0.00");

    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name)?;

    for (col, title) in REPORT_HEADERS.iter().enumerate() {
        sheet.write_with_format(0, col as u16, *title, &header)?;
    }

    for (index, row) in report_rows(summaries).iter().enumerate() {
        let r = index as u32 + 1;
        sheet.write_string(r, 0, &row.day)?;
        sheet.write_string(r, 1, &row.franchise)?;
        sheet.write_string(r, 2, &row.start_time)?;
        sheet.write_string(r, 3, &row.end_time)?;
        sheet.write_string(r, 4, &row.duration)?;
        sheet.write_number(r, 5, row.max_lag as f64)?;
        sheet.write_string(r, 6, &row.max_lag_timestamp)?;
        sheet.write_number_with_format(r, 7, row.duration_minutes, &minutes)?;
    }

    sheet.set_column_width(0, 12)?;
    sheet.set_column_width(1, 24)?;
    sheet.set_column_width(6, 18)?;
    sheet.set_column_width(7, 18)?;
    sheet.set_freeze_panes(1, 0)?;

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveTime};
    use std::path::PathBuf;

    fn summaries() -> Vec<DaySummary> {
        vec![DaySummary {
            day: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            source_label: "Orders".to_string(),
            window_start: NaiveTime::from_hms_opt(8, 5, 0).unwrap(),
            window_end: NaiveTime::from_hms_opt(8, 15, 0).unwrap(),
            duration: Duration::minutes(10),
            peak_lag: 9,
            peak_timestamp: NaiveTime::from_hms_opt(8, 10, 0).unwrap(),
        }]
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("XLSX".parse::<ReportFormat>().unwrap(), ReportFormat::Xlsx);
        assert_eq!("csv".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
        assert_eq!("ndjson".parse::<ReportFormat>().unwrap(), ReportFormat::Jsonl);
        assert!("pdf".parse::<ReportFormat>().is_err());
        assert_eq!(
            ReportFormat::from_path(&PathBuf::from("out/report.json")),
            Some(ReportFormat::Json)
        );
        assert_eq!(ReportFormat::from_path(&PathBuf::from("report")), None);
    }

    #[test]
    fn test_csv_report() {
        let bytes = render_report(&summaries(), ReportFormat::Csv, "Lag Tracker").unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Day,Franchise,Start Time,End Time,Duration,Max Lag,Max Lag Timestamp,Duration (minutes)"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2024-03-05,Orders,08:05:00,08:15:00,00:10:00,9,08:10:00,10.0"
        );
    }

    #[test]
    fn test_jsonl_report() {
        let mut input = summaries();
        input.push(input[0].clone());
        let bytes = render_report(&input, ReportFormat::Jsonl, "Lag Tracker").unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 2);
        let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first["source_label"], "Orders");
    }

    #[test]
    fn test_xlsx_report_is_zip() {
        let bytes = render_report(&summaries(), ReportFormat::Xlsx, "Lag Tracker").unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_empty_report_refused() {
        assert!(matches!(
            render_report(&[], ReportFormat::Csv, "Lag Tracker"),
            Err(ReportError::Empty)
        ));
    }
}
