use std::collections::BTreeMap;

use recon_core::model::{key_by_asset_id, Record};

/// Record with the given `asset_id` and extra fields
#[allow(dead_code)]
pub fn record(asset_id: &str, fields: &[(&str, &str)]) -> Record {
    let mut record = Record::new().with("asset_id", asset_id);
    for (name, value) in fields {
        record.insert(*name, *value);
    }
    record
}

/// Record without an `asset_id` field, for keyed maps
#[allow(dead_code)]
pub fn bare(fields: &[(&str, &str)]) -> Record {
    Record::from_pairs(fields.iter().map(|(k, v)| (*k, *v)))
}

/// Key records by their `asset_id`
#[allow(dead_code)]
pub fn keyed(records: Vec<Record>) -> BTreeMap<String, Record> {
    key_by_asset_id(records).expect("test records have unique ids")
}

/// Map from explicit keys, for records that carry no `asset_id`
#[allow(dead_code)]
pub fn keyed_bare(entries: &[(&str, Record)]) -> BTreeMap<String, Record> {
    entries
        .iter()
        .map(|(id, record)| (id.to_string(), record.clone()))
        .collect()
}
