//! Tabular export: one CSV row per field difference.

#![allow(clippy::result_large_err)]

use crate::document::model::ParsedDocument;
use crate::errors::{ExError, ExErrorKind, Result};

/// CSV column headers.
pub const CSV_HEADERS: &[&str] = &[
    "asset_id",
    "field_name",
    "source_value",
    "target_value",
    "kind",
    "note",
];

/// Render every entry of every document as CSV, header first
pub fn export_csv(docs: &[ParsedDocument]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADERS).map_err(csv_error)?;

    for doc in docs {
        let note = doc.note.as_deref().unwrap_or("");
        for entry in &doc.differences {
            wtr.write_record([
                doc.asset_id.as_str(),
                entry.field_name.as_str(),
                entry.source_value.as_str(),
                entry.target_value.as_str(),
                entry.kind().as_str(),
                note,
            ])
            .map_err(csv_error)?;
        }
    }

    let bytes = wtr.into_inner().map_err(|e| csv_error(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("export_csv")
            .with_message(e.to_string())
    })
}

fn csv_error(err: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("export_csv")
        .with_message(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::model::DocumentEntry;

    #[test]
    fn test_rows_and_quoting() {
        let docs = vec![ParsedDocument {
            asset_id: "A1".to_string(),
            note: Some("Asset exists only in source system".to_string()),
            differences: vec![DocumentEntry {
                field_name: "notes".to_string(),
                source_value: "rack 4, slot 2".to_string(),
                target_value: "null".to_string(),
            }],
            metadata: Default::default(),
        }];
        let csv = export_csv(&docs).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "asset_id,field_name,source_value,target_value,kind,note");
        assert_eq!(
            lines[1],
            "A1,notes,\"rack 4, slot 2\",null,missing_in_target,Asset exists only in source system"
        );
    }

    #[test]
    fn test_header_only_when_empty() {
        let csv = export_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
