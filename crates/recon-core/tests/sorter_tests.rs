#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::record;
use proptest::prelude::*;
use recon_core::config::ReconConfig;
use recon_core::errors::ReconError;
use recon_core::logging_facility::Logger;
use recon_core::model::Record;
use recon_core::sort::{natural_sort_key, validate_json_sort_order, validate_sort_order, Sorter};
use serde_json::json;

fn ids(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.asset_id().map(|v| v.to_string()).unwrap_or_default())
        .collect()
}

#[test]
fn test_natural_order_of_numeric_suffixes() {
    assert!(natural_sort_key(Some("asset2")) < natural_sort_key(Some("asset10")));
    assert!(natural_sort_key(Some("asset10")) < natural_sort_key(Some("asset100")));
    assert!(natural_sort_key(Some("asset100")) < natural_sort_key(None));
}

#[test]
fn test_sorter_output_passes_order_check() {
    let logger = Logger::disabled();
    let sorter = Sorter::new(&ReconConfig::default(), &logger);
    let records = vec![
        record("asset100", &[]),
        Record::new().with("hostname", "orphan"),
        record("asset2", &[]),
        record("asset10", &[]),
    ];
    assert!(!validate_sort_order(&records));

    let outcome = sorter.sort_records(records);
    assert!(outcome.is_sorted());
    assert_eq!(ids(&outcome.items), vec!["asset2", "asset10", "asset100", ""]);
    assert!(validate_sort_order(&outcome.items));
}

#[test]
fn test_fields_follow_priority_table() {
    let logger = Logger::disabled();
    let sorter = Sorter::new(&ReconConfig::default(), &logger);
    let rec = Record::new()
        .with("notes", "n")
        .with("Zone", "z")
        .with("hostname", "h")
        .with("asset_id", "a1")
        .with("ip_address", "10.0.0.1")
        .with("alpha", "x");

    let outcome = sorter.sort_records(vec![rec]);
    let names: Vec<&str> = outcome.items[0].field_names().collect();
    assert_eq!(
        names,
        vec!["asset_id", "ip_address", "hostname", "alpha", "Zone", "notes"]
    );
}

#[test]
fn test_uncomparable_key_leaves_input_untouched() {
    let logger = Logger::disabled();
    let sorter = Sorter::new(&ReconConfig::default(), &logger);
    let records = vec![
        record("b", &[]),
        Record::new().with("asset_id", true),
        record("a", &[]),
    ];

    let outcome = sorter.sort_records(records.clone());
    assert_eq!(outcome.items, records);
    assert!(matches!(
        outcome.anomaly,
        Some(ReconError::UncomparableKey { index: 1, .. })
    ));
}

#[test]
fn test_change_list_ordering() {
    let logger = Logger::disabled();
    let sorter = Sorter::new(&ReconConfig::default(), &logger);
    let entries = vec![
        json!({"sequence": 3, "asset_id": "a10", "timestamp": "2026-01-02T00:00:00Z"}),
        json!({"sequence": 2, "asset_id": "a9"}),
        json!({"sequence": 1, "asset_id": "a10", "timestamp": "2026-01-01T00:00:00Z"}),
        json!({"sequence": 4, "asset_id": "a2", "timestamp": "2026-01-02T00:00:00Z"}),
    ];

    let outcome = sorter.sort_change_list(entries);
    let sequences: Vec<i64> = outcome
        .items
        .iter()
        .map(|e| e["sequence"].as_i64().unwrap())
        .collect();
    assert_eq!(sequences, vec![1, 4, 3, 2]);
}

#[test]
fn test_diff_entry_ordering() {
    let logger = Logger::disabled();
    let sorter = Sorter::new(&ReconConfig::default(), &logger);
    let entries = vec![
        json!({"asset_id": "a2", "operation": "delete", "field": "ip"}),
        json!({"asset_id": "a2", "operation": "add", "field": "os"}),
        json!({"asset_id": "a10", "operation": "add", "field": "ip"}),
        json!({"asset_id": "a2", "field": "Hostname"}),
    ];

    let outcome = sorter.sort_diff_entries(entries);
    assert!(outcome.is_sorted());
    assert!(validate_json_sort_order(&outcome.items, "asset_id"));
    let ops: Vec<&str> = outcome
        .items
        .iter()
        .map(|e| e.get("operation").and_then(|v| v.as_str()).unwrap_or("-"))
        .collect();
    assert_eq!(ops, vec!["add", "-", "delete", "add"]);
}

fn id_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        4 => "[a-c]{0,2}[0-9]{0,3}".prop_map(Some),
        1 => Just(None),
    ]
}

proptest! {
    #[test]
    fn prop_sorted_records_validate(ids in prop::collection::vec(id_strategy(), 0..30)) {
        let logger = Logger::disabled();
        let sorter = Sorter::new(&ReconConfig::default(), &logger);
        let records: Vec<Record> = ids
            .iter()
            .map(|id| match id {
                Some(id) => Record::new().with("asset_id", id.as_str()),
                None => Record::new(),
            })
            .collect();

        let outcome = sorter.sort_records(records);
        prop_assert!(outcome.is_sorted());
        prop_assert!(validate_sort_order(&outcome.items));
    }

    #[test]
    fn prop_sort_is_stable(ids in prop::collection::vec("[ab][0-9]", 0..30)) {
        let logger = Logger::disabled();
        let sorter = Sorter::new(&ReconConfig::default(), &logger);
        let records: Vec<Record> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| Record::new().with("asset_id", id.as_str()).with("seq", i as i64))
            .collect();

        let outcome = sorter.sort_records(records);
        for pair in outcome.items.windows(2) {
            if pair[0].asset_id() == pair[1].asset_id() {
                let (a, b) = (pair[0].get("seq").unwrap(), pair[1].get("seq").unwrap());
                prop_assert!(a.to_string().parse::<i64>().unwrap() < b.to_string().parse::<i64>().unwrap());
            }
        }
    }

    #[test]
    fn prop_sorting_is_idempotent(ids in prop::collection::vec(id_strategy(), 0..30)) {
        let logger = Logger::disabled();
        let sorter = Sorter::new(&ReconConfig::default(), &logger);
        let records: Vec<Record> = ids
            .iter()
            .flatten()
            .map(|id| Record::new().with("asset_id", id.as_str()))
            .collect();

        let once = sorter.sort_records(records).items;
        let twice = sorter.sort_records(once.clone()).items;
        prop_assert_eq!(once, twice);
    }
}
