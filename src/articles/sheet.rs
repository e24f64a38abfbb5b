//! Raw tables of string cells.

use super::ArticlesError;
use calamine::{open_workbook_auto, Data, Reader};
use std::io::Read;
use std::path::Path;

/// A named table of raw cells with no header interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Parse a sheet from CSV data; every line, including the first, is a row.
    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self, ArticlesError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self::new(name, rows))
    }

    /// Read a CSV file as a sheet named after the file stem.
    pub fn from_path(path: &Path) -> Result<Self, ArticlesError> {
        let file = std::fs::File::open(path).map_err(|source| ArticlesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Sheet1".to_string());
        Self::from_reader(name, file)
    }

    /// Load every sheet of a workbook, in workbook order.
    ///
    /// `.csv` files are read as a single sheet; anything else is opened as a
    /// spreadsheet (xlsx, xlsm, xls, ods).
    pub fn load_workbook(path: &Path) -> Result<Vec<Self>, ArticlesError> {
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            return Ok(vec![Self::from_path(path)?]);
        }

        let mut workbook = open_workbook_auto(path).map_err(|source| ArticlesError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;
        let sheets: Vec<Self> = workbook
            .worksheets()
            .into_iter()
            .map(|(name, range)| {
                let rows = range
                    .rows()
                    .map(|cells| cells.iter().map(cell_text).collect())
                    .collect();
                Self::new(name, rows)
            })
            .collect();

        tracing::debug!(path = %path.display(), sheets = sheets.len(), "loaded workbook");
        Ok(sheets)
    }

    /// Cell at `(row, col)`, empty when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map_or("", String::as_str)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Text of a spreadsheet cell; whole floats lose their `.0`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        other => other.to_string(),
    }
}
