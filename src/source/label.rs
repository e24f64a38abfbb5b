//! Source labels derived from export file names.
//!
//! Grafana names exports like `Orders Consumer Lag-data-2024-03-05 10_00_00.csv`;
//! the label is the part that identifies the series (`Orders`).

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rules for turning a file name into a source label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelRules {
    /// Everything from the first occurrence of this marker on is dropped
    pub split_marker: String,
    /// Literal removed from what remains
    pub strip_literal: String,
}

impl Default for LabelRules {
    fn default() -> Self {
        Self {
            split_marker: "-data".to_string(),
            strip_literal: "Consumer Lag".to_string(),
        }
    }
}

/// Derive the source label for a file name.
pub fn source_label(file_name: &str, rules: &LabelRules) -> String {
    let head = if rules.split_marker.is_empty() {
        file_name
    } else {
        file_name
            .split_once(rules.split_marker.as_str())
            .map_or(file_name, |(head, _)| head)
    };

    let label = if rules.strip_literal.is_empty() {
        head.to_string()
    } else {
        head.replace(rules.strip_literal.as_str(), "")
    };

    let label = label.trim();
    if label.is_empty() {
        // Nothing left after stripping; fall back to the bare stem.
        Path::new(file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().trim().to_string())
            .unwrap_or_default()
    } else {
        label.to_string()
    }
}

/// Derive the source label for a path, using its file name.
pub fn label_for_path(path: &Path, rules: &LabelRules) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    source_label(&file_name, rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_grafana_export_name() {
        let rules = LabelRules::default();
        assert_eq!(
            source_label("Orders Consumer Lag-data-2024-03-05 10_00_00.csv", &rules),
            "Orders"
        );
        assert_eq!(
            source_label("Consumer Lag Payments-data.csv", &rules),
            "Payments"
        );
    }

    #[test]
    fn test_name_without_marker_keeps_extension() {
        let rules = LabelRules::default();
        assert_eq!(source_label("inventory.csv", &rules), "inventory.csv");
    }

    #[test]
    fn test_empty_label_falls_back_to_stem() {
        let rules = LabelRules::default();
        assert_eq!(source_label("Consumer Lag-data.csv", &rules), "Consumer Lag-data");
    }

    #[test]
    fn test_custom_rules() {
        let rules = LabelRules {
            split_marker: "_export".to_string(),
            strip_literal: String::new(),
        };
        assert_eq!(source_label(" billing_export_01.csv", &rules), "billing");
    }

    #[test]
    fn test_label_for_path() {
        let path = PathBuf::from("/tmp/exports/Search Consumer Lag-data-x.csv");
        assert_eq!(label_for_path(&path, &LabelRules::default()), "Search");
    }
}
