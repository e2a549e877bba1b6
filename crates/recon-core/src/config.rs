//! Engine configuration
//!
//! Loaded from TOML. Every section and key is optional and falls back to the
//! defaults below.
//!
//! ```toml
//! [normalize]
//! case_sensitive = false
//! normalize_whitespace = true
//! numeric_tolerance = 0.01
//!
//! [compare]
//! excluded_fields = ["last_updated"]
//!
//! [sort.field_priority]
//! rack = 10
//!
//! [validation]
//! max_detailed_mismatches = 5
//! max_cache_age_hours = 24
//! ```

#![allow(clippy::result_large_err)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{ExError, ExErrorKind, ReconError, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconConfig {
    pub normalize: NormalizeConfig,
    pub compare: CompareConfig,
    pub sort: SortConfig,
    pub validation: ValidationConfig,
}

/// Value canonicalization used for equality decisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeConfig {
    pub case_sensitive: bool,
    pub normalize_whitespace: bool,
    /// Largest numeric delta still treated as equal
    pub numeric_tolerance: f64,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            normalize_whitespace: true,
            numeric_tolerance: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareConfig {
    pub excluded_fields: BTreeSet<String>,
    /// Name of the source system in notes and reports
    pub source_label: String,
    /// Name of the target system in notes and reports
    pub target_label: String,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            excluded_fields: BTreeSet::new(),
            source_label: "source".to_string(),
            target_label: "target".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SortConfig {
    /// Overrides merged over the built-in field priority table
    pub field_priority: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Source field name → target field name
    pub field_mappings: BTreeMap<String, String>,
    pub max_detailed_mismatches: usize,
    pub max_cache_age_hours: u64,
}

impl ValidationConfig {
    /// Cache age limit; saturates instead of overflowing for huge hour counts
    pub fn max_cache_age(&self) -> Duration {
        Duration::from_secs(self.max_cache_age_hours.saturating_mul(3600))
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            field_mappings: default_field_mappings(),
            max_detailed_mismatches: 5,
            max_cache_age_hours: 24,
        }
    }
}

/// Default mapping between the two systems' field names
pub fn default_field_mappings() -> BTreeMap<String, String> {
    [
        ("host", "asset_id"),
        ("name", "hostname"),
        ("ip", "ip_address"),
        ("serialno_a", "serial_number"),
        ("tag", "department"),
        ("location", "location"),
        ("model", "model"),
        ("vendor", "manufacturer"),
        ("status", "status"),
        ("notes", "notes"),
    ]
    .into_iter()
    .map(|(s, t)| (s.to_string(), t.to_string()))
    .collect()
}

impl ReconConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ReconConfig = toml::from_str(text).map_err(|e| {
            ExError::from(ReconError::InvalidConfig {
                reason: e.to_string(),
            })
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ExError::from(ReconError::io(path.display().to_string(), &e)))?;
        Self::from_toml_str(&text).map_err(|e| e.with_path(path.display().to_string()))
    }

    /// Reject values no engine component can work with
    pub fn validate(&self) -> Result<()> {
        let tolerance = self.normalize.numeric_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_config")
                .with_field("numeric_tolerance")
                .with_message(format!(
                    "numeric_tolerance must be a finite, non-negative number, got {}",
                    tolerance
                )));
        }
        if self.compare.source_label.trim().is_empty()
            || self.compare.target_label.trim().is_empty()
        {
            return Err(ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_config")
                .with_message("system labels must not be blank"));
        }
        Ok(())
    }
}
