//! Cross-system sync check between a source and a target record set.

use std::collections::BTreeMap;

use recon_core_types::schema::FIELD_ASSET_ID;

use crate::config::{NormalizeConfig, ValidationConfig};
use crate::errors::ExErrorKind;
use crate::model::{FieldValue, Record};
use crate::normalize::values_equal;
use crate::sort::natural_sort_key;
use crate::validate::result::{ValidationIssue, ValidationResult};
use crate::validate::schema::truthy;

/// Ids reported in metadata for source-only assets
const MAX_LISTED_MISSING: usize = 10;

/// Source field whose mapping targets `asset_id`; `asset_id` itself otherwise
fn source_id_field(mappings: &BTreeMap<String, String>) -> &str {
    mappings
        .iter()
        .find(|(_, target)| target.as_str() == FIELD_ASSET_ID)
        .map(|(source, _)| source.as_str())
        .unwrap_or(FIELD_ASSET_ID)
}

fn index_by<'r>(records: &'r [Record], field: &str) -> BTreeMap<String, &'r Record> {
    let mut by_id = BTreeMap::new();
    for record in records {
        if let Some(id) = record.get(field).filter(|v| truthy(v)) {
            by_id.insert(id.to_string(), record);
        }
    }
    by_id
}

fn natural_sorted<'a>(ids: impl Iterator<Item = &'a String>) -> Vec<&'a String> {
    let mut ids: Vec<&String> = ids.collect();
    ids.sort_by_key(|id| natural_sort_key(Some(id.as_str())));
    ids
}

/// Compare every mapped field of the assets both sides hold
///
/// A field is compared only when both values are set.
pub fn check_sync(
    source: &[Record],
    target: &[Record],
    validation: &ValidationConfig,
    normalize: &NormalizeConfig,
    result: &mut ValidationResult,
) {
    let mappings = &validation.field_mappings;
    let source_by_id = index_by(source, source_id_field(mappings));
    let target_by_id = index_by(target, FIELD_ASSET_ID);

    let missing_in_target =
        natural_sorted(source_by_id.keys().filter(|id| !target_by_id.contains_key(*id)));
    let missing_in_source =
        natural_sorted(target_by_id.keys().filter(|id| !source_by_id.contains_key(*id)));

    if !missing_in_target.is_empty() {
        result.add_warning(ValidationIssue::new(
            ExErrorKind::SyncMismatch,
            format!(
                "{} assets in source not found in target",
                missing_in_target.len()
            ),
        ));
        let listed: Vec<&String> = missing_in_target
            .iter()
            .take(MAX_LISTED_MISSING)
            .copied()
            .collect();
        result.set_metadata("missing_in_target", serde_json::json!(listed));
    }
    if !missing_in_source.is_empty() {
        result.add_info(format!(
            "{} assets in target not found in source",
            missing_in_source.len()
        ));
    }

    let shared = natural_sorted(source_by_id.keys().filter(|id| target_by_id.contains_key(*id)));
    let mut sync_errors = 0usize;
    for id in &shared {
        let (source_record, target_record) = (source_by_id[*id], target_by_id[*id]);
        for (source_field, target_field) in mappings {
            let (Some(a), Some(b)) = (
                source_record.get(source_field).filter(|v| truthy(v)),
                target_record.get(target_field).filter(|v| truthy(v)),
            ) else {
                continue;
            };
            if values_equal(a, b, normalize) {
                continue;
            }
            sync_errors += 1;
            if sync_errors <= validation.max_detailed_mismatches {
                result.add_warning(mismatch(id, target_field, a, b));
            }
        }
    }

    let hidden = sync_errors.saturating_sub(validation.max_detailed_mismatches);
    if hidden > 0 {
        result.add_info(format!("{} more field mismatches not shown", hidden));
    }
    result.set_metadata("sync_errors", sync_errors);
    result.set_metadata("assets_compared", shared.len());
    result.add_check(sync_errors == 0);
}

fn mismatch(id: &str, field: &str, a: &FieldValue, b: &FieldValue) -> ValidationIssue {
    ValidationIssue::new(
        ExErrorKind::SyncMismatch,
        format!("Asset {}: Field mismatch {}: '{}' != '{}'", id, field, a, b),
    )
    .for_asset(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::result::ValidationStatus;
    use serde_json::json;

    fn source(host: &str, ip: &str) -> Record {
        Record::new().with("host", host).with("ip", ip)
    }

    fn target(id: &str, ip: &str) -> Record {
        Record::new().with("asset_id", id).with("ip_address", ip)
    }

    #[test]
    fn test_source_id_comes_from_mapping() {
        let mappings = crate::config::default_field_mappings();
        assert_eq!(source_id_field(&mappings), "host");
        assert_eq!(source_id_field(&BTreeMap::new()), "asset_id");
    }

    #[test]
    fn test_missing_assets_and_mismatches() {
        let config = ValidationConfig::default();
        let mut result = ValidationResult::new("sync");
        check_sync(
            &[source("a1", "10.0.0.1"), source("a2", "10.0.0.2")],
            &[target("a1", "10.0.0.9"), target("a3", "10.0.0.3")],
            &config,
            &NormalizeConfig::default(),
            &mut result,
        );

        assert_eq!(result.status(), ValidationStatus::PassedWithWarnings);
        assert_eq!(result.metadata["missing_in_target"], json!(["a2"]));
        assert_eq!(result.metadata["sync_errors"], json!(1));
        assert_eq!(result.metadata["assets_compared"], json!(1));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.message == "Asset a1: Field mismatch ip_address: '10.0.0.1' != '10.0.0.9'"));
        assert_eq!(result.info, vec!["1 assets in target not found in source".to_string()]);
    }

    #[test]
    fn test_detail_is_capped() {
        let config = ValidationConfig {
            max_detailed_mismatches: 2,
            ..Default::default()
        };
        let sources: Vec<Record> = (1..=4).map(|i| source(&format!("a{}", i), "x")).collect();
        let targets: Vec<Record> = (1..=4).map(|i| target(&format!("a{}", i), "y")).collect();
        let mut result = ValidationResult::new("sync");
        check_sync(&sources, &targets, &config, &NormalizeConfig::default(), &mut result);

        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.metadata["sync_errors"], json!(4));
        assert_eq!(result.info, vec!["2 more field mismatches not shown".to_string()]);
    }

    #[test]
    fn test_normalized_values_match() {
        let mut result = ValidationResult::new("sync");
        check_sync(
            &[source("a1", " WEB01 ")],
            &[target("a1", "web01")],
            &ValidationConfig::default(),
            &NormalizeConfig::default(),
            &mut result,
        );
        assert_eq!(result.status(), ValidationStatus::Passed);
    }
}
