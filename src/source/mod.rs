//! Input side: reading Grafana lag exports into samples.
//!
//! Each file is parsed independently. Timestamp failures abort the file,
//! lag failures are coerced to 0.

pub mod label;
pub mod reader;
pub mod types;

use std::path::PathBuf;
use thiserror::Error;

// Re-export commonly used types
pub use label::{label_for_path, source_label, LabelRules};
pub use reader::{parse_samples, read_source, LoadedSource, ParsedSamples, SourceOptions};
pub use types::{parse_lag, parse_timestamp, Sample};

/// Errors that abort processing of a single source file.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Unparsable timestamp {value:?} in data row {row}")]
    Timestamp { row: usize, value: String },
}
