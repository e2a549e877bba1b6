//! Structural checks: can the input be read as the expected container?
//!
//! Every failure here is critical and the caller stops validating that input.

use std::path::Path;

use serde_json::Value;

use crate::errors::ExErrorKind;
use crate::validate::result::{ValidationIssue, ValidationResult};

/// Entry list or asset list found in a JSON container
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Container<'v> {
    Entries(&'v [Value]),
    Assets(&'v [Value]),
}

pub(crate) fn critical(result: &mut ValidationResult, kind: ExErrorKind, message: impl Into<String>) {
    result.add_error(ValidationIssue::new(kind, message), true);
}

/// File contents as UTF-8 text
pub fn read_text(path: &Path, result: &mut ValidationResult) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Some(text),
            Err(e) => {
                critical(
                    result,
                    ExErrorKind::Structural,
                    format!("{} is not valid UTF-8: {}", path.display(), e),
                );
                None
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            critical(
                result,
                ExErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            );
            None
        }
        Err(e) => {
            critical(
                result,
                ExErrorKind::Io,
                format!("Cannot read {}: {}", path.display(), e),
            );
            None
        }
    }
}

pub fn parse_json(text: &str, result: &mut ValidationResult) -> Option<Value> {
    match serde_json::from_str(text) {
        Ok(value) => {
            result.add_check(true);
            Some(value)
        }
        Err(e) => {
            critical(result, ExErrorKind::Structural, format!("Invalid JSON: {}", e));
            None
        }
    }
}

/// Locate the entry list of a difference-entry or change-list container
///
/// A bare array is an entry list. An object must carry an `entries` array,
/// or, when `allow_assets`, an `assets` array.
pub fn container<'v>(
    value: &'v Value,
    allow_assets: bool,
    result: &mut ValidationResult,
) -> Option<Container<'v>> {
    let found = match value {
        Value::Array(items) => Some(Container::Entries(items)),
        Value::Object(map) => match (map.get("entries"), map.get("assets")) {
            (Some(Value::Array(items)), _) => Some(Container::Entries(items)),
            (None, Some(Value::Array(items))) if allow_assets => Some(Container::Assets(items)),
            _ => None,
        },
        _ => None,
    };
    match found {
        Some(c) => {
            result.add_check(true);
            let (count, what) = match c {
                Container::Entries(items) => (items.len(), "entries"),
                Container::Assets(items) => (items.len(), "assets"),
            };
            result.add_info(format!("Found {} {}", count, what));
            Some(c)
        }
        None => {
            let expected = if allow_assets {
                "a list, or an object with an 'entries' or 'assets' list"
            } else {
                "a list, or an object with an 'entries' list"
            };
            critical(
                result,
                ExErrorKind::Structural,
                format!("Unknown structure: expected {}", expected),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::result::ValidationStatus;
    use serde_json::json;

    #[test]
    fn test_container_shapes() {
        let mut result = ValidationResult::new("t");
        let list = json!([{"asset_id": "a"}]);
        assert!(matches!(container(&list, false, &mut result), Some(Container::Entries(e)) if e.len() == 1));

        let assets = json!({"assets": []});
        assert!(matches!(container(&assets, true, &mut result), Some(Container::Assets(_))));
        assert_eq!(result.status(), ValidationStatus::Passed);

        assert!(container(&assets, false, &mut result).is_none());
        assert!(result.has_critical());
    }

    #[test]
    fn test_invalid_json_is_critical() {
        let mut result = ValidationResult::new("t");
        assert!(parse_json("{not json", &mut result).is_none());
        assert!(result.has_issue(ExErrorKind::Structural));
        assert_eq!(result.status(), ValidationStatus::Failed);
    }

    #[test]
    fn test_missing_file_is_critical() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut result = ValidationResult::new("t");
        assert!(read_text(&dir.path().join("nope.json"), &mut result).is_none());
        assert!(result.has_issue(ExErrorKind::NotFound));
    }
}
