//! Recon Core - asset reconciliation between two inventory systems
//!
//! This crate compares the asset records held by a source and a target system
//! and turns the outcome into reviewable artefacts:
//! - Value normalization with numeric tolerance
//! - Per-asset comparison with run statistics and explicit faults
//! - The `.diff-doc` text format, its parser and JSON/CSV re-encodings
//! - Deterministic natural-order sorting of records, documents and change lists
//! - Layered validation with a monotonic PASSED / WARNINGS / FAILED status

#![allow(clippy::result_large_err)]

pub mod compare;
pub mod config;
pub mod document;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod normalize;
pub mod sort;
pub mod validate;

// Re-export commonly used types
pub use compare::{Comparator, ComparisonRun, ComparisonStats};
pub use config::ReconConfig;
pub use document::{parse_document, write_document, DifferenceDocument, ParsedDocument};
pub use errors::{ExError, ExErrorKind, ReconError, Result};
pub use logging_facility::{Logger, Profile};
pub use model::{FieldValue, Record};
pub use sort::Sorter;
pub use validate::{ValidationResult, ValidationStatus, Validator};
