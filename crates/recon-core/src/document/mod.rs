//! Difference documents: model, text codec, JSON projection, analysis and export.
//!
//! The `.diff-doc` text format:
//!
//! ```text
//! asset_id: A1
//! note: Asset exists only in target system
//! differences:
//!   - field_name: os
//!     source_value: "null"
//!     target_value: "Linux"
//!
//! # Generated: 2026-01-01T00:00:00+00:00
//! # Total differences: 1
//! # Value mismatches: 0
//! # Missing in source: 1
//! # Missing in target: 0
//! ```
//!
//! Values are always quoted with JSON string escapes. Header scalars and
//! field names are quoted only when a plain line would not carry them intact.
//! Trailer comments are advisory; the parser collects any `# key: value`
//! comment into `metadata` and ignores everything else it does not know.

pub mod analyze;
pub mod codec;
pub mod export;
pub mod json;
pub mod model;

pub use analyze::{analyze_patterns, reconciliation_report, PatternAnalysis};
pub use codec::{parse_document, write_document};
pub use export::export_csv;
pub use json::to_json;
pub use model::{DifferenceDocument, DocumentEntry, DocumentSummary, ParsedDocument};
