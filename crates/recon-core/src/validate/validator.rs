//! Validation entry points.
//!
//! Every method runs one pass and returns its finished [`ValidationResult`];
//! findings are collected, never returned as `Err`.

use std::path::Path;

use serde_json::Value;

use crate::config::ReconConfig;
use crate::document::parse_document;
use crate::errors::ExErrorKind;
use crate::logging_facility::Logger;
use crate::model::{records_from_json, Record};
use crate::validate::integrity::{check_cache_dir, verify_checksum};
use crate::validate::result::{ValidationIssue, ValidationResult};
use crate::validate::schema::{check_change_entry, check_diff_entry, check_record};
use crate::validate::semantic::{
    check_change_summary, check_document, check_duplicate_ids, check_duplicate_sequences,
    check_operation_conflicts,
};
use crate::validate::structural::{container, critical, parse_json, read_text, Container};
use crate::validate::sync::check_sync;
use crate::{log_op_end, log_op_start};

#[derive(Debug)]
pub struct Validator<'a> {
    config: ReconConfig,
    logger: &'a Logger,
}

impl<'a> Validator<'a> {
    pub fn new(config: &ReconConfig, logger: &'a Logger) -> Self {
        Self {
            config: config.clone(),
            logger,
        }
    }

    /// Run one pass under the logger and finish its result
    fn run(
        &self,
        op: &str,
        name: String,
        check: impl FnOnce(&mut ValidationResult),
    ) -> ValidationResult {
        self.logger.in_scope(|| {
            log_op_start!(op, path = %name);
            let start = std::time::Instant::now();

            let mut result = ValidationResult::new(name);
            check(&mut result);
            result.finish();

            log_op_end!(
                op,
                duration_ms = start.elapsed().as_millis() as u64,
                status = %result.status(),
                errors = result.errors.len() + result.critical_errors.len(),
                warnings = result.warnings.len()
            );
            result
        })
    }

    /// Validate `.diff-doc` text
    pub fn validate_document_text(&self, name: &str, text: &str) -> ValidationResult {
        self.run("validate_document", name.to_string(), |result| {
            document_checks(text, result)
        })
    }

    pub fn validate_document_file(&self, path: &Path) -> ValidationResult {
        self.run("validate_document", path.display().to_string(), |result| {
            if let Some(text) = read_text(path, result) {
                document_checks(&text, result);
            }
        })
    }

    /// Validate a difference-entry container, or an asset list
    pub fn validate_entries_value(&self, name: &str, value: &Value) -> ValidationResult {
        self.run("validate_entries", name.to_string(), |result| {
            entries_checks(value, result)
        })
    }

    pub fn validate_entries_file(&self, path: &Path) -> ValidationResult {
        self.run("validate_entries", path.display().to_string(), |result| {
            if let Some(value) = read_text(path, result).and_then(|t| parse_json(&t, result)) {
                entries_checks(&value, result);
            }
        })
    }

    /// Validate a change list: `{"entries": [...], "summary"?: {...}}` or a bare list
    pub fn validate_change_list_value(&self, name: &str, value: &Value) -> ValidationResult {
        self.run("validate_change_list", name.to_string(), |result| {
            change_list_checks(value, result)
        })
    }

    pub fn validate_change_list_file(&self, path: &Path) -> ValidationResult {
        self.run("validate_change_list", path.display().to_string(), |result| {
            if let Some(value) = read_text(path, result).and_then(|t| parse_json(&t, result)) {
                change_list_checks(&value, result);
            }
        })
    }

    pub fn validate_records(&self, name: &str, records: &[Record]) -> ValidationResult {
        self.run("validate_records", name.to_string(), |result| {
            record_checks(records, result)
        })
    }

    /// Validate a record file: an array of objects or an object keyed by asset id
    pub fn validate_records_file(&self, path: &Path) -> ValidationResult {
        self.run("validate_records", path.display().to_string(), |result| {
            let Some(value) = read_text(path, result).and_then(|t| parse_json(&t, result)) else {
                return;
            };
            match records_from_json(&value) {
                Ok(records) => record_checks(&records, result),
                Err(e) => critical(result, ExErrorKind::Structural, e.to_string()),
            }
        })
    }

    /// Field-level agreement between a source and a target record set
    pub fn validate_sync(&self, source: &[Record], target: &[Record]) -> ValidationResult {
        self.run("validate_sync", "Data Sync Validation".to_string(), |result| {
            check_sync(
                source,
                target,
                &self.config.validation,
                &self.config.normalize,
                result,
            )
        })
    }

    /// Compare a file's SHA-256 with `expected`
    pub fn validate_checksum(&self, path: &Path, expected: &str) -> ValidationResult {
        self.run("validate_checksum", path.display().to_string(), |result| {
            verify_checksum(path, expected, result)
        })
    }

    pub fn validate_cache_dir(&self, dir: &Path) -> ValidationResult {
        let max_age = self.config.validation.max_cache_age();
        self.run("validate_cache_dir", dir.display().to_string(), |result| {
            check_cache_dir(dir, max_age, result)
        })
    }
}

fn document_checks(text: &str, result: &mut ValidationResult) {
    match parse_document(text) {
        Ok(doc) => {
            result.add_check(true);
            result.add_info(format!("Found {} differences", doc.differences.len()));
            check_document(&doc, result);
        }
        Err(e) => critical(result, ExErrorKind::Structural, e.to_string()),
    }
}

fn entries_checks(value: &Value, result: &mut ValidationResult) {
    match container(value, true, result) {
        Some(Container::Entries(entries)) => {
            let operations: Vec<(String, Option<String>)> = entries
                .iter()
                .enumerate()
                .filter_map(|(index, entry)| check_diff_entry(index, entry, result))
                .collect();
            check_operation_conflicts(&operations, result);
        }
        Some(Container::Assets(assets)) => {
            let records = flat_records(assets, result);
            record_checks(&records, result);
        }
        None => {}
    }
}

fn change_list_checks(value: &Value, result: &mut ValidationResult) {
    let Some(Container::Entries(entries)) = container(value, false, result) else {
        return;
    };

    let mut operations = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        if check_change_entry(index, entry, result) {
            if let Some(op) = entry.get("operation").and_then(Value::as_str) {
                let id = entry
                    .as_object()
                    .and_then(crate::validate::schema::entry_asset_id)
                    .unwrap_or_default();
                operations.push((id, Some(op.to_string())));
            }
        }
    }
    check_duplicate_sequences(entries, result);
    check_operation_conflicts(&operations, result);

    if let Some(summary) = value.get("summary").and_then(Value::as_object) {
        check_change_summary(summary, entries.len(), result);
    }
}

fn record_checks(records: &[Record], result: &mut ValidationResult) {
    result.add_info(format!("Validating {} assets", records.len()));
    for (index, record) in records.iter().enumerate() {
        check_record(index, record, result);
    }
    check_duplicate_ids(records, result);
}

/// Asset objects that deserialize as flat records; others are schema errors
fn flat_records(assets: &[Value], result: &mut ValidationResult) -> Vec<Record> {
    let mut records = Vec::with_capacity(assets.len());
    for (index, asset) in assets.iter().enumerate() {
        match serde_json::from_value::<Record>(asset.clone()) {
            Ok(record) => records.push(record),
            Err(e) => result.add_error(
                ValidationIssue::new(
                    ExErrorKind::Schema,
                    format!("Asset {}: not a flat object: {}", index, e),
                )
                .at_entry(index),
                false,
            ),
        }
    }
    records
}
