//! Comparison output types.

use chrono::{DateTime, Utc};
use recon_core_types::RunId;
use serde::{Deserialize, Serialize};

use crate::compare::stats::ComparisonStats;
use crate::config::CompareConfig;
use crate::document::model::{DifferenceDocument, DocumentEntry, DocumentSummary};
use crate::errors::ExError;

/// Field name carried by the synthetic `asset_missing` marker
pub const SYSTEM_PRESENCE_FIELD: &str = "_system_presence";

/// Classification of one field difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceKind {
    ValueMismatch,
    MissingInSource,
    MissingInTarget,
    /// Presence marker for single-system assets; never emitted in documents
    AssetMissing,
}

impl DifferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifferenceKind::ValueMismatch => "value_mismatch",
            DifferenceKind::MissingInSource => "missing_in_source",
            DifferenceKind::MissingInTarget => "missing_in_target",
            DifferenceKind::AssetMissing => "asset_missing",
        }
    }
}

impl std::fmt::Display for DifferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-level difference; values are stringified or `"null"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDifference {
    pub asset_id: String,
    pub field_name: String,
    pub source_value: String,
    pub target_value: String,
    pub kind: DifferenceKind,
}

/// Which systems hold an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Both,
    SourceOnly,
    TargetOnly,
}

impl Presence {
    /// Human-readable note for single-system assets
    pub fn note(&self, labels: &CompareConfig) -> Option<String> {
        match self {
            Presence::Both => None,
            Presence::SourceOnly => Some(format!(
                "Asset exists only in {} system",
                labels.source_label
            )),
            Presence::TargetOnly => Some(format!(
                "Asset exists only in {} system",
                labels.target_label
            )),
        }
    }
}

/// Result of comparing one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetComparison {
    pub asset_id: String,
    pub presence: Presence,
    /// Non-excluded field names considered for this asset
    pub compared_fields: usize,
    /// In emission order; an `asset_missing` marker, if any, comes first
    pub differences: Vec<FieldDifference>,
}

impl AssetComparison {
    /// Differences without the presence marker
    pub fn field_differences(&self) -> impl Iterator<Item = &FieldDifference> {
        self.differences
            .iter()
            .filter(|d| d.kind != DifferenceKind::AssetMissing)
    }

    pub fn count_kind(&self, kind: DifferenceKind) -> usize {
        self.differences.iter().filter(|d| d.kind == kind).count()
    }

    pub fn has_differences(&self) -> bool {
        !self.differences.is_empty()
    }

    /// Percentage of compared fields that agree, rounded to 2 decimals
    ///
    /// Only defined for assets held by both systems.
    pub fn similarity_score(&self) -> Option<f64> {
        if self.presence != Presence::Both || self.compared_fields == 0 {
            return None;
        }
        let differing = self.field_differences().count();
        let matching = self.compared_fields.saturating_sub(differing) as f64;
        let score = matching / self.compared_fields as f64 * 100.0;
        Some((score * 100.0).round() / 100.0)
    }

    /// Build the persisted document; the presence marker becomes the note
    pub fn to_document(
        &self,
        generated_at: DateTime<Utc>,
        labels: &CompareConfig,
    ) -> DifferenceDocument {
        let note = self
            .differences
            .first()
            .filter(|d| d.kind == DifferenceKind::AssetMissing)
            .and_then(|_| self.presence.note(labels));

        DifferenceDocument {
            asset_id: self.asset_id.clone(),
            generated_at,
            note,
            differences: self
                .field_differences()
                .map(|d| DocumentEntry {
                    field_name: d.field_name.clone(),
                    source_value: d.source_value.clone(),
                    target_value: d.target_value.clone(),
                })
                .collect(),
            summary: DocumentSummary {
                value_mismatches: self.count_kind(DifferenceKind::ValueMismatch),
                missing_in_source: self.count_kind(DifferenceKind::MissingInSource),
                missing_in_target: self.count_kind(DifferenceKind::MissingInTarget),
            },
            similarity_score: self.similarity_score(),
        }
    }
}

/// An asset whose comparison failed; the run continued without it
///
/// The error carries the run id and the asset id.
#[derive(Debug, Clone)]
pub struct AssetFault {
    pub asset_id: String,
    pub error: ExError,
}

/// Everything one comparison run produced
#[derive(Debug, Clone)]
pub struct ComparisonRun {
    pub run_id: RunId,
    pub generated_at: DateTime<Utc>,
    /// In natural identifier order, including assets without differences
    pub assets: Vec<AssetComparison>,
    pub stats: ComparisonStats,
    pub faults: Vec<AssetFault>,
}

impl ComparisonRun {
    /// One document per asset with differences, in natural identifier order
    pub fn documents(&self, labels: &CompareConfig) -> Vec<DifferenceDocument> {
        self.assets
            .iter()
            .filter(|a| a.has_differences())
            .map(|a| a.to_document(self.generated_at, labels))
            .collect()
    }

    /// Statistics recomputed from the final comparison results
    pub fn recount(&self) -> ComparisonStats {
        ComparisonStats::recount(&self.assets, self.faults.len())
    }

    /// Text summary of the run with rates
    pub fn summary_report(&self, labels: &CompareConfig) -> String {
        let mut report = String::new();
        report.push_str(&"=".repeat(60));
        report.push('\n');
        report.push_str("COMPARISON SUMMARY REPORT\n");
        report.push_str(&"=".repeat(60));
        report.push('\n');
        report.push_str(&format!("Run: {}\n", self.run_id));
        report.push_str(&format!("Generated: {}\n\n", self.generated_at.to_rfc3339()));
        report.push_str(&self.stats.render_summary(labels));
        for fault in &self.faults {
            report.push_str(&format!("  Fault {}: {}\n", fault.asset_id, fault.error));
        }
        report.push_str(&"=".repeat(60));
        report
    }
}
