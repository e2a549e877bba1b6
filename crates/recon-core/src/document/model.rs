//! Document types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use recon_core_types::schema::NULL_MARKER;
use serde::{Deserialize, Serialize};

use crate::compare::model::{DifferenceKind, Presence};
use crate::config::CompareConfig;

/// One field entry; the difference kind is implied by the `"null"` markers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub field_name: String,
    pub source_value: String,
    pub target_value: String,
}

impl DocumentEntry {
    /// Reconstruct the difference kind from the null markers
    ///
    /// A present-but-null value on one side reads back as a missing field.
    pub fn kind(&self) -> DifferenceKind {
        if self.source_value == NULL_MARKER {
            DifferenceKind::MissingInSource
        } else if self.target_value == NULL_MARKER {
            DifferenceKind::MissingInTarget
        } else {
            DifferenceKind::ValueMismatch
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub value_mismatches: usize,
    pub missing_in_source: usize,
    pub missing_in_target: usize,
}

/// Per-asset difference document; immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferenceDocument {
    pub asset_id: String,
    pub generated_at: DateTime<Utc>,
    /// Set only for single-system assets
    pub note: Option<String>,
    pub differences: Vec<DocumentEntry>,
    pub summary: DocumentSummary,
    /// Set only for assets held by both systems
    pub similarity_score: Option<f64>,
}

impl DifferenceDocument {
    pub fn total_differences(&self) -> usize {
        self.differences.len()
    }
}

/// Structure recovered from a `.diff-doc` file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub asset_id: String,
    pub note: Option<String>,
    pub differences: Vec<DocumentEntry>,
    /// Trailer comments, keyed lower-case with spaces as `_`
    pub metadata: BTreeMap<String, String>,
}

impl ParsedDocument {
    /// Which systems held the asset, read from the note
    ///
    /// A note that names neither label falls back to the null markers.
    pub fn presence(&self, labels: &CompareConfig) -> Presence {
        let note = match &self.note {
            None => return Presence::Both,
            Some(note) => note,
        };
        if Presence::SourceOnly.note(labels).as_ref() == Some(note) {
            return Presence::SourceOnly;
        }
        if Presence::TargetOnly.note(labels).as_ref() == Some(note) {
            return Presence::TargetOnly;
        }
        let source_blank = self
            .differences
            .iter()
            .all(|d| d.source_value == NULL_MARKER);
        if source_blank && !self.differences.is_empty() {
            Presence::TargetOnly
        } else {
            Presence::SourceOnly
        }
    }

    /// Trailer value parsed as a count
    pub fn metadata_count(&self, key: &str) -> Option<usize> {
        self.metadata.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// Trailer similarity score without the `%` sign
    pub fn similarity_score(&self) -> Option<f64> {
        self.metadata
            .get("similarity_score")
            .and_then(|v| v.trim().trim_end_matches('%').parse().ok())
    }
}
