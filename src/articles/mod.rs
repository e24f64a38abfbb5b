//! Article comparison: values in one column that are missing from another.
//!
//! Workbooks (or CSV exports) are read as raw sheets, the header row is located by a marker
//! string, and the two article columns are compared as sets.

pub mod compare;
pub mod export;
pub mod sheet;

use std::path::PathBuf;
use thiserror::Error;

// Re-export commonly used types
pub use compare::{
    compare_sheet, compare_workbook, difference, find_header_row, ArticleComparison,
    ArticlesOptions,
};
pub use export::{render_comparison_csv, render_comparison_xlsx, write_output};
pub use sheet::Sheet;

/// Article comparison errors.
#[derive(Debug, Error)]
pub enum ArticlesError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot open workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("IO error writing output: {0}")]
    Write(#[source] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Excel error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("Could not find columns matching {left_key:?} and {right_key:?} in any sheet")]
    ColumnsNotFound { left_key: String, right_key: String },
}
