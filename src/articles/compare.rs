//! Set difference between two article columns.
//!
//! The header row is sniffed from the first few rows of a sheet, the two
//! columns are matched by substring, and the result lists every value of
//! the left column that never appears in the right one.

use super::sheet::Sheet;
use super::ArticlesError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Cell contents treated as missing.
const MISSING_MARKERS: [&str; 4] = ["", "nan", "None", "NaN"];

/// Settings for locating and comparing the article columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticlesOptions {
    /// Text whose presence marks the header row
    pub header_marker: String,
    /// How many leading rows are searched for the header
    pub header_scan_rows: usize,
    /// Substring identifying the left (source) column
    pub left_key: String,
    /// Substring identifying the right (reference) column
    pub right_key: String,
    /// Name of the sheet holding the result
    pub result_sheet: String,
}

impl Default for ArticlesOptions {
    fn default() -> Self {
        Self {
            header_marker: "Articles in SAP".to_string(),
            header_scan_rows: 5,
            left_key: "SAP".to_string(),
            right_key: "GK".to_string(),
            result_sheet: "Not in GK".to_string(),
        }
    }
}

/// Outcome of comparing the article columns of one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleComparison {
    /// Sheet the columns were found in
    pub sheet_name: String,
    /// Zero-based index of the header row
    pub header_row: usize,
    /// Header of the left column
    pub left_column: String,
    /// Header of the right column
    pub right_column: String,
    /// Left values absent from the right column, first occurrence order
    pub missing: Vec<String>,
}

/// Index of the header row: the first of the leading rows containing the marker.
pub fn find_header_row(sheet: &Sheet, options: &ArticlesOptions) -> usize {
    sheet
        .rows
        .iter()
        .take(options.header_scan_rows)
        .position(|row| row.iter().any(|cell| cell.contains(options.header_marker.as_str())))
        .unwrap_or(0)
}

/// Locate the left and right columns in a header row.
fn find_columns(header: &[String], options: &ArticlesOptions) -> Option<(usize, usize)> {
    let find = |key: &str| header.iter().position(|cell| cell.trim().contains(key));
    Some((
        find(options.left_key.as_str())?,
        find(options.right_key.as_str())?,
    ))
}

/// Trimmed, non-missing values of one column below the header row.
fn column_values(sheet: &Sheet, header_row: usize, col: usize) -> Vec<&str> {
    (header_row + 1..sheet.len())
        .map(|row| sheet.cell(row, col).trim())
        .filter(|value| !MISSING_MARKERS.contains(value))
        .collect()
}

/// Values of `left` that do not occur in `right`, de-duplicated.
pub fn difference<'a>(left: &[&'a str], right: &[&str]) -> Vec<&'a str> {
    let reference: HashSet<&str> = right.iter().copied().collect();
    let mut seen = HashSet::new();
    left.iter()
        .copied()
        .filter(|value| !reference.contains(value) && seen.insert(*value))
        .collect()
}

/// Compare the article columns of a single sheet.
///
/// Returns `None` when the sheet does not contain both columns.
pub fn compare_sheet(sheet: &Sheet, options: &ArticlesOptions) -> Option<ArticleComparison> {
    let header_row = find_header_row(sheet, options);
    let header: Vec<String> = sheet
        .rows
        .get(header_row)?
        .iter()
        .map(|cell| cell.trim().to_string())
        .collect();
    let (left_col, right_col) = find_columns(&header, options)?;

    let left = column_values(sheet, header_row, left_col);
    let right = column_values(sheet, header_row, right_col);
    let missing = difference(&left, &right);

    tracing::debug!(
        sheet = %sheet.name,
        header_row,
        left = left.len(),
        right = right.len(),
        missing = missing.len(),
        "compared article columns"
    );

    Some(ArticleComparison {
        sheet_name: sheet.name.clone(),
        header_row,
        left_column: header[left_col].clone(),
        right_column: header[right_col].clone(),
        missing: missing.into_iter().map(str::to_string).collect(),
    })
}

/// Compare the first sheet of a workbook that has both article columns.
pub fn compare_workbook(
    sheets: &[Sheet],
    options: &ArticlesOptions,
) -> Result<ArticleComparison, ArticlesError> {
    for sheet in sheets {
        match compare_sheet(sheet, options) {
            Some(comparison) => return Ok(comparison),
            None => tracing::debug!(sheet = %sheet.name, "article columns not found"),
        }
    }

    Err(ArticlesError::ColumnsNotFound {
        left_key: options.left_key.clone(),
        right_key: options.right_key.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(name: &str, rows: &[&[&str]]) -> Sheet {
        Sheet::new(
            name,
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_header_row_sniffed() {
        let s = sheet(
            "stock",
            &[
                &["Store comparison", ""],
                &["", ""],
                &[" Articles in SAP ", "Articles in GK"],
                &["100", "100"],
            ],
        );
        assert_eq!(find_header_row(&s, &ArticlesOptions::default()), 2);
    }

    #[test]
    fn test_header_row_defaults_to_first() {
        let s = sheet(
            "late",
            &[
                &["x"],
                &["x"],
                &["x"],
                &["x"],
                &["x"],
                &["Articles in SAP", "Articles in GK"],
            ],
        );
        assert_eq!(find_header_row(&s, &ArticlesOptions::default()), 0);
    }

    #[test]
    fn test_difference_keeps_first_occurrence_order() {
        let left = ["3", "1", "3", "2", "1"];
        let right = ["2"];
        assert_eq!(difference(&left, &right), vec!["3", "1"]);
    }

    #[test]
    fn test_compare_sheet() {
        let s = sheet(
            "stock",
            &[
                &["Articles in SAP", "Articles in GK"],
                &[" 100 ", "100"],
                &["101", "nan"],
                &["nan", "102"],
                &["None", ""],
                &["103", "104"],
                &["101", ""],
                &["", ""],
            ],
        );

        let result = compare_sheet(&s, &ArticlesOptions::default()).unwrap();
        assert_eq!(result.sheet_name, "stock");
        assert_eq!(result.header_row, 0);
        assert_eq!(result.left_column, "Articles in SAP");
        assert_eq!(result.right_column, "Articles in GK");
        assert_eq!(result.missing, vec!["101", "103"]);
    }

    #[test]
    fn test_ragged_rows() {
        let s = sheet(
            "stock",
            &[&["Articles in SAP", "Articles in GK"], &["100"], &["101", "100"]],
        );
        let result = compare_sheet(&s, &ArticlesOptions::default()).unwrap();
        assert_eq!(result.missing, vec!["101"]);
    }

    #[test]
    fn test_workbook_uses_first_matching_sheet() {
        let cover = sheet("cover", &[&["Summary"], &["nothing here"]]);
        let data = sheet(
            "data",
            &[&["Articles in SAP", "Articles in GK"], &["7", "8"]],
        );

        let result = compare_workbook(&[cover, data], &ArticlesOptions::default()).unwrap();
        assert_eq!(result.sheet_name, "data");
        assert_eq!(result.missing, vec!["7"]);
    }

    #[test]
    fn test_workbook_without_columns() {
        let cover = sheet("cover", &[&["Articles in SAP", "Other"]]);
        let err = compare_workbook(&[cover], &ArticlesOptions::default()).unwrap_err();
        assert!(matches!(err, ArticlesError::ColumnsNotFound { .. }));
    }
}
