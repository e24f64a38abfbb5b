//! Output side: turning day summaries into report files.

pub mod rows;
pub mod writer;

use thiserror::Error;

// Re-export commonly used types
pub use rows::{report_rows, ReportRow, REPORT_HEADERS};
pub use writer::{render_report, write_report, ReportFormat};

/// Report rendering and writing errors.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Excel error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("Unknown report format: {0}")]
    UnknownFormat(String),
    #[error("No lag data found with non-zero values")]
    Empty,
}
