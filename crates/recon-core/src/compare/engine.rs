//! Comparison engine.
//!
//! [`Comparator::compare`] walks the union of identifiers in natural order and
//! compares each asset in isolation.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use recon_core_types::RunId;

use crate::compare::model::{
    AssetComparison, AssetFault, ComparisonRun, DifferenceKind, FieldDifference, Presence,
    SYSTEM_PRESENCE_FIELD,
};
use crate::compare::stats::ComparisonStats;
use crate::config::{CompareConfig, NormalizeConfig, ReconConfig};
use crate::errors::{ExError, ReconError};
use crate::logging_facility::Logger;
use crate::model::{FieldValue, Record};
use crate::normalize::values_equal;
use crate::sort::natural::natural_sort_key;
use crate::{log_anomaly, log_op_end, log_op_start};

const NULL: &str = recon_core_types::schema::NULL_MARKER;

/// Compares keyed record sets; holds no per-run state
#[derive(Debug)]
pub struct Comparator<'a> {
    normalize: NormalizeConfig,
    compare: CompareConfig,
    logger: &'a Logger,
}

impl<'a> Comparator<'a> {
    pub fn new(config: &ReconConfig, logger: &'a Logger) -> Self {
        Self {
            normalize: config.normalize.clone(),
            compare: config.compare.clone(),
            logger,
        }
    }

    pub fn labels(&self) -> &CompareConfig {
        &self.compare
    }

    /// Compare every asset held by either system
    pub fn compare(
        &self,
        source: &BTreeMap<String, Record>,
        target: &BTreeMap<String, Record>,
    ) -> ComparisonRun {
        let run_id = RunId::new();
        self.logger.in_scope(|| {
            let unique: BTreeSet<&String> = source.keys().chain(target.keys()).collect();
            let mut ids: Vec<&String> = unique.into_iter().collect();
            ids.sort_by_key(|id| natural_sort_key(Some(id.as_str())));

            log_op_start!("compare", run_id = %run_id, asset_count = ids.len());
            let start = std::time::Instant::now();

            let mut stats = ComparisonStats::default();
            let mut assets = Vec::new();
            let mut faults = Vec::new();

            for id in ids {
                match self.compare_asset(id, source.get(id), target.get(id)) {
                    Ok(asset) => {
                        stats.record(&asset);
                        assets.push(asset);
                    }
                    Err(error) => {
                        log_anomaly!("compare", run_id = %run_id, asset_id = %id, reason = %error);
                        stats.record_fault();
                        faults.push(AssetFault {
                            asset_id: id.clone(),
                            error: ExError::from(error)
                                .with_op("compare")
                                .with_asset_id(id.as_str())
                                .with_run_id(run_id.clone()),
                        });
                    }
                }
            }

            log_op_end!(
                "compare",
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = %run_id,
                diff_count = stats.total_differences
            );

            ComparisonRun {
                run_id: run_id.clone(),
                generated_at: Utc::now(),
                assets,
                stats,
                faults,
            }
        })
    }

    /// Compare one asset given its record in each system
    ///
    /// # Errors
    ///
    /// - `IdentifierMismatch` when a record's own `asset_id` disagrees with `asset_id`
    /// - `InvalidRecord` when neither system holds the asset
    pub fn compare_asset(
        &self,
        asset_id: &str,
        source: Option<&Record>,
        target: Option<&Record>,
    ) -> Result<AssetComparison, ReconError> {
        for record in source.iter().chain(target.iter()) {
            check_identifier(asset_id, record)?;
        }
        match (source, target) {
            (Some(s), Some(t)) => Ok(self.compare_matched(asset_id, s, t)),
            (Some(s), None) => Ok(self.single_system(asset_id, s, Presence::SourceOnly)),
            (None, Some(t)) => Ok(self.single_system(asset_id, t, Presence::TargetOnly)),
            (None, None) => Err(ReconError::InvalidRecord {
                reason: format!("asset {} is held by neither system", asset_id),
            }),
        }
    }

    fn single_system(&self, asset_id: &str, record: &Record, presence: Presence) -> AssetComparison {
        let (marker_source, marker_target, kind) = match presence {
            Presence::SourceOnly => ("present", "absent", DifferenceKind::MissingInTarget),
            _ => ("absent", "present", DifferenceKind::MissingInSource),
        };

        let mut differences = vec![FieldDifference {
            asset_id: asset_id.to_string(),
            field_name: SYSTEM_PRESENCE_FIELD.to_string(),
            source_value: marker_source.to_string(),
            target_value: marker_target.to_string(),
            kind: DifferenceKind::AssetMissing,
        }];

        let mut compared = 0;
        for (name, value) in record
            .iter()
            .filter(|(name, _)| !self.compare.excluded_fields.contains(*name))
        {
            compared += 1;
            let shown = value.to_string();
            let (source_value, target_value) = match presence {
                Presence::SourceOnly => (shown, NULL.to_string()),
                _ => (NULL.to_string(), shown),
            };
            differences.push(FieldDifference {
                asset_id: asset_id.to_string(),
                field_name: name.to_string(),
                source_value,
                target_value,
                kind,
            });
        }

        AssetComparison {
            asset_id: asset_id.to_string(),
            presence,
            compared_fields: compared,
            differences,
        }
    }

    fn compare_matched(&self, asset_id: &str, source: &Record, target: &Record) -> AssetComparison {
        let mut seen = BTreeSet::new();
        let names: Vec<&str> = source
            .field_names()
            .chain(target.field_names())
            .filter(|name| !self.compare.excluded_fields.contains(*name))
            .filter(|name| seen.insert(*name))
            .collect();

        let mut differences = Vec::new();
        for name in &names {
            let difference = match (source.get(name), target.get(name)) {
                (None, Some(t)) => Some((NULL.to_string(), t.to_string(), DifferenceKind::MissingInSource)),
                (Some(s), None) => Some((s.to_string(), NULL.to_string(), DifferenceKind::MissingInTarget)),
                (Some(s), Some(t)) if !values_equal(s, t, &self.normalize) => {
                    Some((s.to_string(), t.to_string(), DifferenceKind::ValueMismatch))
                }
                _ => None,
            };
            if let Some((source_value, target_value, kind)) = difference {
                differences.push(FieldDifference {
                    asset_id: asset_id.to_string(),
                    field_name: name.to_string(),
                    source_value,
                    target_value,
                    kind,
                });
            }
        }

        AssetComparison {
            asset_id: asset_id.to_string(),
            presence: Presence::Both,
            compared_fields: names.len(),
            differences,
        }
    }
}

fn check_identifier(key: &str, record: &Record) -> Result<(), ReconError> {
    match record.asset_id() {
        None | Some(FieldValue::Null) => Ok(()),
        Some(FieldValue::Text(id)) if id == key => Ok(()),
        Some(other) => {
            let shown = other.to_string();
            if matches!(other, FieldValue::Int(_)) && shown == key {
                Ok(())
            } else {
                Err(ReconError::IdentifierMismatch {
                    key: key.to_string(),
                    record_id: shown,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    fn map(entries: Vec<(&str, Record)>) -> BTreeMap<String, Record> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_matched_asset_three_way_check() {
        let logger = Logger::disabled();
        let config = ReconConfig::default();
        let comparator = Comparator::new(&config, &logger);

        let source = Record::new()
            .with("hostname", "srv1")
            .with("ip", "10.0.0.1")
            .with("model", "X");
        let target = Record::new()
            .with("hostname", "SRV1")
            .with("ip", "10.0.0.2")
            .with("location", "DC1");

        let asset = comparator
            .compare_asset("A", Some(&source), Some(&target))
            .unwrap();
        let kinds: Vec<(&str, DifferenceKind)> = asset
            .differences
            .iter()
            .map(|d| (d.field_name.as_str(), d.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("ip", DifferenceKind::ValueMismatch),
                ("model", DifferenceKind::MissingInTarget),
                ("location", DifferenceKind::MissingInSource),
            ]
        );
        assert_eq!(asset.compared_fields, 4);
    }

    #[test]
    fn test_excluded_fields_are_skipped() {
        let logger = Logger::disabled();
        let mut config = ReconConfig::default();
        config.compare.excluded_fields.insert("last_updated".to_string());
        let comparator = Comparator::new(&config, &logger);

        let source = map(vec![("A", Record::new().with("last_updated", "monday"))]);
        let target = map(vec![("A", Record::new().with("last_updated", "tuesday"))]);
        let run = comparator.compare(&source, &target);
        assert_eq!(run.stats.total_differences, 0);
        assert_eq!(run.stats.assets_with_differences, 0);
        assert_eq!(run.assets[0].similarity_score(), None);
    }

    #[test]
    fn test_present_null_vs_absent() {
        let logger = Logger::disabled();
        let config = ReconConfig::default();
        let comparator = Comparator::new(&config, &logger);

        let source = Record::new().with("notes", FieldValue::Null);
        let target = Record::new();
        let asset = comparator
            .compare_asset("A", Some(&source), Some(&target))
            .unwrap();
        assert_eq!(asset.differences.len(), 1);
        assert_eq!(asset.differences[0].kind, DifferenceKind::MissingInTarget);
        assert_eq!(asset.differences[0].source_value, "null");
    }

    #[test]
    fn test_identifier_mismatch_is_a_fault() {
        let logger = Logger::disabled();
        let config = ReconConfig::default();
        let comparator = Comparator::new(&config, &logger);

        let source = map(vec![
            ("A", Record::new().with("asset_id", "Z").with("ip", "1")),
            ("B", Record::new().with("asset_id", "B").with("ip", "2")),
        ]);
        let run = comparator.compare(&source, &BTreeMap::new());
        assert_eq!(run.faults.len(), 1);
        assert_eq!(run.faults[0].asset_id, "A");
        assert_eq!(run.faults[0].error.kind(), ExErrorKind::IdentifierMismatch);
        assert_eq!(run.faults[0].error.run_id(), Some(&run.run_id));
        assert_eq!(run.faults[0].error.op(), Some("compare"));
        assert_eq!(run.assets.len(), 1);
        assert_eq!(run.stats.faults, 1);
        assert_eq!(run.stats.total_assets_processed, 2);
        assert_eq!(run.stats, run.recount());
    }

    #[test]
    fn test_numeric_identifier_matching_key_is_accepted() {
        let record = Record::new().with("asset_id", 42i64);
        assert!(check_identifier("42", &record).is_ok());
        assert!(check_identifier("43", &record).is_err());
    }
}
