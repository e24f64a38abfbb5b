//! Writing article comparison results.

use super::compare::ArticleComparison;
use super::sheet::Sheet;
use super::ArticlesError;
use rust_xlsxwriter::{Format, Workbook};
use std::collections::HashSet;
use std::path::Path;

/// Longest worksheet name Excel accepts.
const MAX_SHEET_NAME: usize = 31;

/// Render the result sheet followed by the original sheets into an xlsx workbook.
///
/// Original sheets are re-emitted from the comparison's header row onwards.
pub fn render_comparison_xlsx(
    comparison: &ArticleComparison,
    sheets: &[Sheet],
    result_sheet: &str,
) -> Result<Vec<u8>, ArticlesError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let mut used_names = HashSet::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(unique_sheet_name(result_sheet, &mut used_names))?;
    sheet.write_with_format(0, 0, comparison.left_column.as_str(), &header)?;
    for (index, value) in comparison.missing.iter().enumerate() {
        sheet.write_string(index as u32 + 1, 0, value)?;
    }
    sheet.set_column_width(0, 24)?;

    for original in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(unique_sheet_name(&original.name, &mut used_names))?;

        let rows = original.rows.iter().skip(comparison.header_row);
        for (r, cells) in rows.enumerate() {
            for (c, cell) in cells.iter().enumerate() {
                if r == 0 {
                    sheet.write_with_format(r as u32, c as u16, cell.trim(), &header)?;
                } else {
                    sheet.write_string(r as u32, c as u16, cell)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Render the result as a single-column CSV.
pub fn render_comparison_csv(comparison: &ArticleComparison) -> Result<Vec<u8>, ArticlesError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([comparison.left_column.as_str()])?;
    for value in &comparison.missing {
        writer.write_record([value.as_str()])?;
    }
    writer
        .into_inner()
        .map_err(|e| ArticlesError::Write(e.into_error()))
}

/// Write bytes to `path`, creating parent directories.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), ArticlesError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(ArticlesError::Write)?;
        }
    }
    std::fs::write(path, bytes).map_err(ArticlesError::Write)
}

/// Make a valid worksheet name that has not been used yet.
fn unique_sheet_name(name: &str, used: &mut HashSet<String>) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim();
    let base: String = if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned.chars().take(MAX_SHEET_NAME).collect()
    };

    let mut candidate = base.clone();
    let mut counter = 2;
    while used.contains(&candidate.to_lowercase()) {
        let suffix = format!(" ({counter})");
        let keep = MAX_SHEET_NAME.saturating_sub(suffix.chars().count());
        candidate = format!("{}{suffix}", base.chars().take(keep).collect::<String>());
        counter += 1;
    }

    used.insert(candidate.to_lowercase());
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparison() -> ArticleComparison {
        ArticleComparison {
            sheet_name: "stock".to_string(),
            header_row: 0,
            left_column: "Articles in SAP".to_string(),
            right_column: "Articles in GK".to_string(),
            missing: vec!["101".to_string(), "103".to_string()],
        }
    }

    #[test]
    fn test_csv_output() {
        let bytes = render_comparison_csv(&comparison()).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "Articles in SAP\n101\n103\n");
    }

    #[test]
    fn test_xlsx_output() {
        let sheets = vec![Sheet::new(
            "stock",
            vec![vec!["Articles in SAP".to_string(), "Articles in GK".to_string()]],
        )];
        let bytes = render_comparison_xlsx(&comparison(), &sheets, "Not in GK").unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_unique_sheet_names() {
        let mut used = HashSet::new();
        assert_eq!(unique_sheet_name("Not in GK", &mut used), "Not in GK");
        assert_eq!(unique_sheet_name("not in gk", &mut used), "not in gk (2)");
        assert_eq!(unique_sheet_name("a/b:c", &mut used), "a_b_c");
        assert_eq!(unique_sheet_name("", &mut used), "Sheet");

        let long = "x".repeat(40);
        let first = unique_sheet_name(&long, &mut used);
        assert_eq!(first.chars().count(), 31);
        let second = unique_sheet_name(&long, &mut used);
        assert_eq!(second.chars().count(), 31);
        assert!(second.ends_with(" (2)"));
    }
}
