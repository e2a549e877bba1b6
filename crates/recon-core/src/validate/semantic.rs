//! Cross-entry consistency checks.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use crate::document::ParsedDocument;
use crate::errors::ExErrorKind;
use crate::model::Record;
use crate::sort::natural_sort_key;
use crate::validate::result::{ValidationIssue, ValidationResult};

/// Operation conflicts per asset over `(asset_id, operation)` pairs
///
/// More than one operation on an asset that is deleted is a warning, a
/// repeated `delete` included; more than one `create` is an error.
pub fn check_operation_conflicts(
    operations: &[(String, Option<String>)],
    result: &mut ValidationResult,
) {
    let mut by_asset: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (asset_id, op) in operations {
        if let Some(op) = op {
            by_asset.entry(asset_id.as_str()).or_default().push(op.as_str());
        }
    }

    for (asset_id, ops) in by_asset {
        if ops.contains(&"delete") && ops.len() > 1 {
            result.add_warning(
                ValidationIssue::new(
                    ExErrorKind::Semantic,
                    format!("Asset {}: Has both delete and other operations", asset_id),
                )
                .for_asset(asset_id),
            );
        }
        let creates = ops.iter().filter(|op| **op == "create").count();
        result.add_check(creates <= 1);
        if creates > 1 {
            result.add_error(
                ValidationIssue::new(
                    ExErrorKind::Semantic,
                    format!("Asset {}: Multiple create operations", asset_id),
                )
                .for_asset(asset_id),
                false,
            );
        }
    }
}

/// Numbers compare by value, so `1` and `1.0` collide; anything else by its JSON text
fn sequence_key(sequence: &Value) -> String {
    if let Some(n) = sequence.as_i64() {
        return n.to_string();
    }
    if let Some(n) = sequence.as_u64() {
        return n.to_string();
    }
    match sequence.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            (f as i64).to_string()
        }
        Some(f) => f.to_string(),
        None => sequence.to_string(),
    }
}

/// Change-list sequence numbers must be unique
pub fn check_duplicate_sequences(entries: &[Value], result: &mut ValidationResult) {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut duplicates = 0usize;
    for (index, entry) in entries.iter().enumerate() {
        let Some(sequence) = entry.get("sequence").filter(|v| !v.is_null()) else {
            continue;
        };
        let key = sequence_key(sequence);
        if !seen.insert(key.clone()) {
            duplicates += 1;
            result.add_error(
                ValidationIssue::new(
                    ExErrorKind::Semantic,
                    format!("Entry {}: Duplicate sequence number {}", index, key),
                )
                .at_entry(index),
                false,
            );
        }
    }
    result.add_check(duplicates == 0);
}

/// Duplicate identifiers in a record set, reported in natural order
///
/// Returns the number of distinct ids that repeat.
pub fn check_duplicate_ids(records: &[Record], result: &mut ValidationResult) -> usize {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        if let Some(id) = record.asset_id().filter(|v| !v.is_null()) {
            *counts.entry(id.to_string()).or_default() += 1;
        }
    }

    let mut duplicates: Vec<&String> = counts
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(id, _)| id)
        .collect();
    duplicates.sort_by_key(|id| natural_sort_key(Some(id.as_str())));

    result.add_check(duplicates.is_empty());
    for id in &duplicates {
        result.add_error(
            ValidationIssue::new(
                ExErrorKind::Semantic,
                format!("Duplicate asset ID: {} ({} occurrences)", id, counts[*id]),
            )
            .for_asset(id.as_str()),
            false,
        );
    }
    if !duplicates.is_empty() {
        result.add_info(format!("Found {} duplicate asset IDs", duplicates.len()));
    }
    result.set_metadata("duplicate_asset_ids", duplicates.len());
    duplicates.len()
}

/// Copy summary counts into metadata and compare `total` with the entries
pub fn check_change_summary(
    summary: &Map<String, Value>,
    entry_count: usize,
    result: &mut ValidationResult,
) {
    for key in ["applied", "failed", "skipped", "total"] {
        if let Some(value) = summary.get(key) {
            result.set_metadata(key, value.clone());
        }
    }

    if let Some(total) = summary.get("total") {
        let matches = total.as_u64() == Some(entry_count as u64);
        result.add_check(matches);
        if !matches {
            result.add_warning(ValidationIssue::new(
                ExErrorKind::Semantic,
                format!(
                    "Summary total ({}) doesn't match entries count ({})",
                    total, entry_count
                ),
            ));
        }
    }
}

/// Consistency of a parsed difference document
pub fn check_document(doc: &ParsedDocument, result: &mut ValidationResult) {
    let asset_id = doc.asset_id.clone();

    if doc.asset_id.trim().is_empty() {
        result.add_error(
            ValidationIssue::new(ExErrorKind::Schema, "Document has a blank asset_id"),
            false,
        );
    }

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for (index, entry) in doc.differences.iter().enumerate() {
        if entry.field_name.trim().is_empty() {
            result.add_error(
                ValidationIssue::new(
                    ExErrorKind::Schema,
                    format!("Entry {}: Blank field_name", index),
                )
                .at_entry(index)
                .for_asset(asset_id.clone()),
                false,
            );
        } else if !seen.insert(entry.field_name.as_str()) {
            result.add_error(
                ValidationIssue::new(
                    ExErrorKind::Semantic,
                    format!("Entry {}: Duplicate field {}", index, entry.field_name),
                )
                .at_entry(index)
                .for_asset(asset_id.clone()),
                false,
            );
        }
    }

    if let Some(total) = doc.metadata_count("total_differences") {
        let matches = total == doc.differences.len();
        result.add_check(matches);
        if !matches {
            result.add_warning(
                ValidationIssue::new(
                    ExErrorKind::Semantic,
                    format!(
                        "Trailer total ({}) doesn't match parsed differences ({})",
                        total,
                        doc.differences.len()
                    ),
                )
                .for_asset(asset_id.clone()),
            );
        }
    }

    if doc.note.is_some() && doc.similarity_score().is_some() {
        result.add_warning(
            ValidationIssue::new(
                ExErrorKind::Semantic,
                "Single-system note alongside a similarity score",
            )
            .for_asset(asset_id),
        );
    }
}
