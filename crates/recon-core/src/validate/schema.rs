//! Per-entry schema checks.
//!
//! Each function inspects one entry, records its findings and never stops
//! the caller from looking at the next entry.

use std::net::Ipv4Addr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use recon_core_types::schema::FIELD_ASSET_ID;
use serde_json::{Map, Value};

use crate::errors::ExErrorKind;
use crate::model::{FieldValue, Record};
use crate::validate::result::{ValidationIssue, ValidationResult};

/// Operations a difference entry may carry
pub const DIFF_OPERATIONS: &[&str] = &["add", "modify", "delete", "create"];
/// Statuses a change-list entry may carry
pub const CHANGE_STATUSES: &[&str] = &["applied", "failed", "skipped", "pending"];
/// Values of a record's `status` field that raise no warning
pub const RECORD_STATUSES: &[&str] = &["active", "inactive", "maintenance", "retired", "unknown"];
/// Fields a record is expected to carry
pub const EXPECTED_RECORD_FIELDS: &[&str] = &[
    "asset_id",
    "hostname",
    "ip_address",
    "serial_number",
    "model",
    "manufacturer",
    "location",
    "department",
    "status",
    "notes",
    "last_updated",
];
/// Longest serial number accepted without a warning
pub const MAX_SERIAL_LEN: usize = 100;
/// Unexpected fields are only listed when there are this many or fewer
const MAX_LISTED_UNEXPECTED: usize = 3;

fn issue(kind: ExErrorKind, index: usize, message: String) -> ValidationIssue {
    ValidationIssue::new(kind, message).at_entry(index)
}

/// Identifier text of a JSON entry's `asset_id`, if it has a usable one
pub fn entry_asset_id(entry: &Map<String, Value>) -> Option<String> {
    match entry.get(FIELD_ASSET_ID) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// Object view of entry `index`, or a schema error
fn as_object<'v>(
    index: usize,
    entry: &'v Value,
    result: &mut ValidationResult,
) -> Option<&'v Map<String, Value>> {
    let object = entry.as_object();
    if object.is_none() {
        result.add_error(
            issue(ExErrorKind::Schema, index, format!("Entry {}: not an object", index)),
            false,
        );
    }
    object
}

fn require_asset_id(
    index: usize,
    entry: &Map<String, Value>,
    result: &mut ValidationResult,
) -> Option<String> {
    let id = entry_asset_id(entry);
    if id.is_none() {
        result.add_error(
            issue(ExErrorKind::Schema, index, format!("Entry {}: Missing asset_id", index)),
            false,
        );
    }
    id
}

/// Schema of one difference entry; returns `(asset_id, operation)` for the
/// semantic pass when the entry has an identifier
pub fn check_diff_entry(
    index: usize,
    entry: &Value,
    result: &mut ValidationResult,
) -> Option<(String, Option<String>)> {
    let entry = as_object(index, entry, result)?;
    let asset_id = require_asset_id(index, entry, result)?;

    let operation = match entry.get("operation") {
        None => None,
        Some(Value::String(op)) if DIFF_OPERATIONS.contains(&op.as_str()) => Some(op.clone()),
        Some(other) => {
            let shown = other.as_str().map(str::to_string).unwrap_or_else(|| other.to_string());
            result.add_error(
                issue(
                    ExErrorKind::Schema,
                    index,
                    format!("Entry {}: Invalid operation '{}'", index, shown),
                )
                .for_asset(asset_id.clone()),
                false,
            );
            Some(shown)
        }
    };

    if operation.as_deref() == Some("modify")
        && (!entry.contains_key("old_value") || !entry.contains_key("new_value"))
    {
        result.add_warning(
            issue(
                ExErrorKind::ToleranceAmbiguity,
                index,
                format!("Entry {}: Modify operation missing old/new values", index),
            )
            .for_asset(asset_id.clone()),
        );
    }

    if matches!(entry.get("value"), Some(Value::Null)) {
        let field = entry
            .get("field")
            .and_then(Value::as_str)
            .unwrap_or("unknown field");
        result.add_warning(issue(
            ExErrorKind::Schema,
            index,
            format!("Entry {}: Null value for {}", index, field),
        ));
    }

    Some((asset_id, operation))
}

/// Schema of one change-list entry; returns whether it has an identifier
pub fn check_change_entry(index: usize, entry: &Value, result: &mut ValidationResult) -> bool {
    let Some(entry) = as_object(index, entry, result) else {
        return false;
    };
    let Some(asset_id) = require_asset_id(index, entry, result) else {
        return false;
    };

    if let Some(status) = entry.get("status") {
        match status.as_str() {
            Some(s) if CHANGE_STATUSES.contains(&s) => {}
            _ => {
                let shown = status.as_str().map(str::to_string).unwrap_or_else(|| status.to_string());
                result.add_error(
                    issue(
                        ExErrorKind::Schema,
                        index,
                        format!("Entry {}: Invalid status '{}'", index, shown),
                    )
                    .for_asset(asset_id.clone()),
                    false,
                );
            }
        }
        if status.as_str() == Some("failed") && !entry.contains_key("error") {
            result.add_warning(
                issue(
                    ExErrorKind::Schema,
                    index,
                    format!("Entry {}: Failed status without error message", index),
                )
                .for_asset(asset_id.clone()),
            );
        }
    }

    if let Some(timestamp) = entry.get("timestamp") {
        check_timestamp(timestamp, &format!("Entry {}", index), Some(index), result);
    }

    if let Some(command) = entry.get("command") {
        let valid = command.as_str().is_some_and(|c| !c.trim().is_empty());
        if !valid {
            result.add_error(
                issue(ExErrorKind::Schema, index, format!("Entry {}: Invalid command", index))
                    .for_asset(asset_id),
                false,
            );
        }
    }
    true
}

/// Accepts RFC 3339, naive date-times with `T` or space, and plain dates
pub fn is_iso_timestamp(text: &str) -> bool {
    let text = text.trim();
    DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M").is_ok()
        || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

pub fn check_timestamp(
    timestamp: &Value,
    context: &str,
    index: Option<usize>,
    result: &mut ValidationResult,
) {
    let valid = timestamp.as_str().is_some_and(is_iso_timestamp);
    result.add_check(valid);
    if !valid {
        let shown = timestamp.as_str().map(str::to_string).unwrap_or_else(|| timestamp.to_string());
        let mut problem = ValidationIssue::new(
            ExErrorKind::Schema,
            format!("{}: Invalid timestamp format: {}", context, shown),
        );
        problem.entry = index;
        result.add_error(problem, false);
    }
}

/// Field-level checks of one record; `asset_id` presence included
pub fn check_record(index: usize, record: &Record, result: &mut ValidationResult) {
    match record.asset_id() {
        None | Some(FieldValue::Null) => result.add_error(
            issue(
                ExErrorKind::Schema,
                index,
                format!("Asset {}: Missing required field 'asset_id'", index),
            ),
            false,
        ),
        Some(_) => {}
    }

    if let Some(ip) = record.get("ip_address").filter(|v| truthy(v)) {
        let valid = ip.as_text().is_some_and(|s| s.parse::<Ipv4Addr>().is_ok());
        if !valid {
            result.add_warning(issue(
                ExErrorKind::Schema,
                index,
                format!("Asset {}: Invalid IP address format: {}", index, ip),
            ));
        }
    }

    if let Some(serial) = record.get("serial_number").filter(|v| truthy(v)) {
        if serial.to_string().chars().count() > MAX_SERIAL_LEN {
            result.add_warning(issue(
                ExErrorKind::Schema,
                index,
                format!("Asset {}: Unusually long serial number", index),
            ));
        }
    }

    if let Some(status) = record.get("status").filter(|v| truthy(v)) {
        let lowered = status.to_string().to_lowercase();
        if !RECORD_STATUSES.contains(&lowered.as_str()) {
            result.add_warning(issue(
                ExErrorKind::Schema,
                index,
                format!("Asset {}: Unusual status value: {}", index, status),
            ));
        }
    }

    let unexpected: Vec<&str> = record
        .field_names()
        .filter(|name| !EXPECTED_RECORD_FIELDS.contains(name))
        .collect();
    if !unexpected.is_empty() && unexpected.len() <= MAX_LISTED_UNEXPECTED {
        result.add_info(format!(
            "Asset {}: Unexpected fields: {}",
            index,
            unexpected.join(", ")
        ));
    }
}

/// Null, empty text, `false` and zero count as "not set"
pub(crate) fn truthy(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => false,
        FieldValue::Bool(b) => *b,
        FieldValue::Int(i) => *i != 0,
        FieldValue::Float(x) => *x != 0.0,
        FieldValue::Text(s) => !s.is_empty(),
    }
}
