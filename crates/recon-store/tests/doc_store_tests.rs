#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;
use std::fs;

use recon_core::compare::Comparator;
use recon_core::config::ReconConfig;
use recon_core::document::{DifferenceDocument, DocumentEntry, DocumentSummary};
use recon_core::errors::ExErrorKind;
use recon_core::logging_facility::Logger;
use recon_core::model::Record;
use recon_core::validate::{ValidationStatus, Validator};
use recon_store::checksum::read_checksum;
use recon_store::DocumentStore;
use tempfile::TempDir;

fn keyed(pairs: &[(&str, &str, &str)]) -> BTreeMap<String, Record> {
    pairs
        .iter()
        .map(|(id, field, value)| (id.to_string(), Record::new().with(*field, *value)))
        .collect()
}

fn doc(asset_id: &str) -> DifferenceDocument {
    DifferenceDocument {
        asset_id: asset_id.to_string(),
        generated_at: chrono::Utc::now(),
        note: None,
        differences: vec![DocumentEntry {
            field_name: "ip".to_string(),
            source_value: asset_id.to_string(),
            target_value: "null".to_string(),
        }],
        summary: DocumentSummary {
            missing_in_target: 1,
            ..DocumentSummary::default()
        },
        similarity_score: None,
    }
}

#[test]
fn test_compare_write_and_reload_in_natural_order() {
    let dir = TempDir::new().unwrap();
    let logger = Logger::disabled();
    let config = ReconConfig::default();

    let source = keyed(&[("a10", "ip", "1"), ("a2", "ip", "2"), ("a1", "ip", "3")]);
    let target = keyed(&[("a10", "ip", "9"), ("a2", "ip", "2"), ("a3", "os", "Linux")]);
    let run = Comparator::new(&config, &logger).compare(&source, &target);
    let docs = run.documents(&config.compare);

    let store = DocumentStore::new(dir.path().join("docs"), &logger);
    let written = store.write_all(&docs).unwrap();
    assert_eq!(written.len(), 3);

    let loaded = store.load_all().unwrap();
    let ids: Vec<&str> = loaded.iter().map(|d| d.asset_id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a3", "a10"]);
    assert_eq!(loaded[2].differences[0].source_value, "1");
    assert_eq!(loaded[2].differences[0].target_value, "9");
}

#[test]
fn test_written_documents_pass_integrity_check() {
    let dir = TempDir::new().unwrap();
    let logger = Logger::disabled();
    let config = ReconConfig::default();

    let run = Comparator::new(&config, &logger)
        .compare(&keyed(&[("web 01", "ip", "1")]), &BTreeMap::new());
    let store = DocumentStore::new(dir.path(), &logger);
    let paths = store.write_all(&run.documents(&config.compare)).unwrap();

    let name = paths[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("web_01-") && name.ends_with(".diff-doc"), "{}", name);
    let expected = read_checksum(&paths[0]).unwrap().unwrap();

    let validator = Validator::new(&config, &logger);
    assert_eq!(
        validator.validate_checksum(&paths[0], &expected).status(),
        ValidationStatus::Passed
    );
    assert_eq!(
        validator.validate_document_file(&paths[0]).status(),
        ValidationStatus::Passed
    );

    fs::write(&paths[0], "asset_id: tampered\n").unwrap();
    assert_eq!(
        validator.validate_checksum(&paths[0], &expected).status(),
        ValidationStatus::Failed
    );
}

#[test]
fn test_load_reports_path_of_bad_document() {
    let dir = TempDir::new().unwrap();
    let logger = Logger::disabled();
    fs::write(dir.path().join("bad.diff-doc"), "differences:\n").unwrap();

    let err = DocumentStore::new(dir.path(), &logger).load_all().unwrap_err();
    assert!(err.path().unwrap().ends_with("bad.diff-doc"));
}

#[test]
fn test_missing_directory_is_not_found() {
    let dir = TempDir::new().unwrap();
    let logger = Logger::disabled();
    let err = DocumentStore::new(dir.path().join("absent"), &logger)
        .list()
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_ids_that_sanitize_alike_keep_separate_documents() {
    let dir = TempDir::new().unwrap();
    let logger = Logger::disabled();
    let store = DocumentStore::new(dir.path(), &logger);

    let written = store
        .write_all(&[doc("rack 1"), doc("rack/1"), doc("rack_1")])
        .unwrap();
    assert_eq!(written.len(), 3);

    let loaded = store.load_all().unwrap();
    let mut ids: Vec<&str> = loaded.iter().map(|d| d.asset_id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["rack 1", "rack/1", "rack_1"]);
    for d in &loaded {
        assert_eq!(d.differences[0].source_value, d.asset_id);
    }
}

#[test]
fn test_repeated_asset_id_is_rejected_before_writing() {
    let dir = TempDir::new().unwrap();
    let logger = Logger::disabled();
    let store = DocumentStore::new(dir.path().join("docs"), &logger);

    let err = store.write_all(&[doc("a1"), doc("a2"), doc("a1")]).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(err.asset_id(), Some("a1"));
    assert!(!dir.path().join("docs").exists());
}

#[test]
fn test_load_all_orders_by_asset_id_not_file_name() {
    let dir = TempDir::new().unwrap();
    let logger = Logger::disabled();
    let store = DocumentStore::new(dir.path(), &logger);

    // "a~1" is stored as a_1-<hash>, which sorts before a_2 by file name
    store.write_all(&[doc("a~1"), doc("a_2"), doc("0")]).unwrap();

    let loaded = store.load_all().unwrap();
    let ids: Vec<&str> = loaded.iter().map(|d| d.asset_id.as_str()).collect();
    assert_eq!(ids, vec!["0", "a_2", "a~1"]);
}
