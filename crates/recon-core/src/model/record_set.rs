//! Loading record sets from JSON.
//!
//! Accepted shapes: an array of flat objects, an object with an `assets`
//! array, or an object keyed by asset id whose values are flat objects.

use std::collections::BTreeMap;

use recon_core_types::schema::FIELD_ASSET_ID;
use serde_json::Value;

use crate::errors::ReconError;
use crate::model::{FieldValue, Record};

/// Records in document order
///
/// In the keyed shape a record without its own `asset_id` gets the key as
/// its first field.
pub fn records_from_json(value: &Value) -> Result<Vec<Record>, ReconError> {
    match value {
        Value::Array(items) => items.iter().enumerate().map(record_at).collect(),
        Value::Object(map) => match map.get("assets") {
            Some(Value::Array(items)) => items.iter().enumerate().map(record_at).collect(),
            Some(_) => Err(ReconError::InvalidRecord {
                reason: "'assets' must be an array".to_string(),
            }),
            None => map
                .iter()
                .enumerate()
                .map(|(index, (key, item))| {
                    let record = record_at((index, item))?;
                    if record.contains(FIELD_ASSET_ID) {
                        Ok(record)
                    } else {
                        let pairs = std::iter::once((FIELD_ASSET_ID.to_string(), FieldValue::text(key.clone())))
                            .chain(record.into_pairs());
                        Ok(Record::from_pairs(pairs))
                    }
                })
                .collect(),
        },
        _ => Err(ReconError::InvalidRecord {
            reason: "expected an array or object of records".to_string(),
        }),
    }
}

fn record_at((index, item): (usize, &Value)) -> Result<Record, ReconError> {
    serde_json::from_value(item.clone()).map_err(|e| ReconError::InvalidRecord {
        reason: format!("record {}: {}", index, e),
    })
}

/// Key records by their `asset_id`
///
/// # Errors
///
/// `InvalidRecord` for a record without a usable identifier or a repeated one.
pub fn key_by_asset_id(records: Vec<Record>) -> Result<BTreeMap<String, Record>, ReconError> {
    let mut keyed = BTreeMap::new();
    for (index, record) in records.into_iter().enumerate() {
        let id = match record.asset_id() {
            Some(FieldValue::Text(s)) if !s.trim().is_empty() => s.clone(),
            Some(FieldValue::Int(i)) => i.to_string(),
            _ => {
                return Err(ReconError::InvalidRecord {
                    reason: format!("record {} has no usable asset_id", index),
                })
            }
        };
        if keyed.contains_key(&id) {
            return Err(ReconError::InvalidRecord {
                reason: format!("duplicate asset_id {}", id),
            });
        }
        keyed.insert(id, record);
    }
    Ok(keyed)
}
