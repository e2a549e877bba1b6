use std::cmp::Ordering;

use serde_json::Value;

use crate::config::ReconConfig;
use crate::document::model::DifferenceDocument;
use crate::errors::ReconError;
use crate::logging_facility::Logger;
use crate::model::Record;
use crate::sort::fields::FieldPriority;
use crate::sort::natural::{key_for_field, key_for_json, natural_sort_key, SortKey};
use crate::{log_anomaly, log_op_end, log_op_start};

/// Timestamp assumed for change-list entries without one
const NO_TIMESTAMP: &str = "9999-99-99";
/// Sequence assumed for change-list entries without one
const NO_SEQUENCE: i64 = 999_999;

/// Sorted items, or the untouched input plus the reason it could not be sorted
#[derive(Debug, Clone, PartialEq)]
pub struct SortOutcome<T> {
    pub items: Vec<T>,
    pub anomaly: Option<ReconError>,
}

impl<T> SortOutcome<T> {
    pub fn is_sorted(&self) -> bool {
        self.anomaly.is_none()
    }
}

#[derive(Debug)]
pub struct Sorter<'a> {
    priority: FieldPriority,
    logger: &'a Logger,
}

impl<'a> Sorter<'a> {
    pub fn new(config: &ReconConfig, logger: &'a Logger) -> Self {
        Self {
            priority: FieldPriority::with_overrides(&config.sort.field_priority),
            logger,
        }
    }

    pub fn field_priority(&self) -> &FieldPriority {
        &self.priority
    }

    /// Order records by natural `asset_id`, then each record's fields by priority
    pub fn sort_records(&self, records: Vec<Record>) -> SortOutcome<Record> {
        let outcome = self.sort_by_keys("sort_records", records, |r| key_for_field(r.asset_id()));
        if outcome.anomaly.is_some() {
            return outcome;
        }
        SortOutcome {
            items: outcome
                .items
                .iter()
                .map(|r| self.priority.order_fields(r))
                .collect(),
            anomaly: None,
        }
    }

    /// Order JSON asset objects as `sort_records` does
    ///
    /// Non-object elements and nested values make the whole sort fail.
    pub fn sort_json_assets(&self, assets: Vec<Value>) -> SortOutcome<Value> {
        let mut records = Vec::with_capacity(assets.len());
        for (index, asset) in assets.iter().enumerate() {
            match serde_json::from_value::<Record>(asset.clone()) {
                Ok(record) => records.push(record),
                Err(e) => {
                    return self.refuse(
                        "sort_json_assets",
                        assets,
                        ReconError::UncomparableKey {
                            index,
                            reason: format!("not a flat asset object: {}", e),
                        },
                    )
                }
            }
        }
        let sorted = self.sort_records(records);
        if let Some(anomaly) = sorted.anomaly {
            return SortOutcome {
                items: assets,
                anomaly: Some(anomaly),
            };
        }
        let mut items = Vec::with_capacity(sorted.items.len());
        for record in &sorted.items {
            match serde_json::to_value(record) {
                Ok(value) => items.push(value),
                Err(e) => {
                    return SortOutcome {
                        items: assets,
                        anomaly: Some(e.into()),
                    }
                }
            }
        }
        SortOutcome {
            items,
            anomaly: None,
        }
    }

    /// Order documents by natural `asset_id`
    pub fn sort_documents(&self, mut docs: Vec<DifferenceDocument>) -> Vec<DifferenceDocument> {
        docs.sort_by_cached_key(|d| natural_sort_key(Some(&d.asset_id)));
        docs
    }

    /// Order difference entries by (asset id, operation, field name)
    ///
    /// Operations order `add < modify < delete < anything else`; an entry
    /// without an operation counts as `modify`.
    pub fn sort_diff_entries(&self, entries: Vec<Value>) -> SortOutcome<Value> {
        self.sort_by_keys("sort_diff_entries", entries, |entry| {
            let id = key_for_json(entry.get("asset_id"))?;
            let op = match entry.get("operation").map(|v| v.as_str()) {
                None => 2,
                Some(Some("add")) => 1,
                Some(Some("modify")) => 2,
                Some(Some("delete")) => 3,
                Some(_) => 99,
            };
            let field = match entry.get("field") {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.to_lowercase(),
                Some(other) => other.to_string().to_lowercase(),
            };
            Ok((id, op, field))
        })
    }

    /// Order change-list entries by (timestamp, asset id, sequence)
    pub fn sort_change_list(&self, entries: Vec<Value>) -> SortOutcome<Value> {
        self.sort_by_keys("sort_change_list", entries, |entry| {
            let timestamp = match entry.get("timestamp") {
                None | Some(Value::Null) => NO_TIMESTAMP.to_string(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => return Err(format!("timestamp {} is not a string", other)),
            };
            let id = key_for_json(entry.get("asset_id"))?;
            let sequence = match entry.get("sequence") {
                None | Some(Value::Null) => NO_SEQUENCE,
                Some(v) => v
                    .as_i64()
                    .ok_or_else(|| format!("sequence {} is not an integer", v))?,
            };
            Ok((timestamp, id, sequence))
        })
    }

    fn sort_by_keys<T, K, F>(&self, op: &str, items: Vec<T>, key_of: F) -> SortOutcome<T>
    where
        K: Ord,
        F: Fn(&T) -> Result<K, String>,
    {
        self.logger.in_scope(|| {
            log_op_start!(op, entry_count = items.len());
        });
        let start = std::time::Instant::now();

        let mut keys = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match key_of(item) {
                Ok(key) => keys.push(key),
                Err(reason) => {
                    return self.refuse(op, items, ReconError::UncomparableKey { index, reason })
                }
            }
        }

        let mut keyed: Vec<(K, T)> = keys.into_iter().zip(items).collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        let items: Vec<T> = keyed.into_iter().map(|(_, item)| item).collect();

        self.logger.in_scope(|| {
            log_op_end!(op, duration_ms = start.elapsed().as_millis() as u64);
        });
        SortOutcome {
            items,
            anomaly: None,
        }
    }

    fn refuse<T>(&self, op: &str, items: Vec<T>, anomaly: ReconError) -> SortOutcome<T> {
        self.logger.in_scope(|| {
            log_anomaly!(op, reason = %anomaly);
        });
        SortOutcome {
            items,
            anomaly: Some(anomaly),
        }
    }
}

/// True when records are in natural `asset_id` order with absent ids last
///
/// An uncomparable identifier makes the sequence unsorted.
pub fn validate_sort_order(items: &[Record]) -> bool {
    first_violation(items.iter().map(|r| key_for_field(r.asset_id()))).is_none()
}

/// `validate_sort_order` over JSON objects and an arbitrary key field
pub fn validate_json_sort_order(items: &[Value], key_field: &str) -> bool {
    first_violation(items.iter().map(|v| key_for_json(v.get(key_field)))).is_none()
}

/// Index of the first element out of order
fn first_violation(keys: impl Iterator<Item = Result<SortKey, String>>) -> Option<usize> {
    let mut previous: Option<SortKey> = None;
    for (index, key) in keys.enumerate() {
        let key = match key {
            Ok(key) => key,
            Err(_) => return Some(index),
        };
        if let Some(prev) = &previous {
            if prev.cmp(&key) == Ordering::Greater {
                return Some(index);
            }
        }
        previous = Some(key);
    }
    None
}
