//! Field-level comparison of two keyed record sets.
//!
//! ## Entry point
//!
//! ```
//! use std::collections::BTreeMap;
//! use recon_core::compare::Comparator;
//! use recon_core::config::ReconConfig;
//! use recon_core::logging_facility::Logger;
//! use recon_core::model::Record;
//!
//! let logger = Logger::disabled();
//! let config = ReconConfig::default();
//! let source = BTreeMap::from([("A".to_string(), Record::new().with("ip", "1.1.1.1"))]);
//! let target = BTreeMap::from([("A".to_string(), Record::new().with("ip", "1.1.1.2"))]);
//!
//! let run = Comparator::new(&config, &logger).compare(&source, &target);
//! assert_eq!(run.stats.total_differences, 1);
//! ```
//!
//! ## Guarantees
//!
//! - **Partition**: every identifier lands in exactly one of matched,
//!   source-only, target-only or faulted.
//! - **Fault isolation**: a bad asset is recorded in `faults` and never
//!   aborts the run.
//! - **Determinism**: assets are emitted in natural identifier order and
//!   fields in first-seen order, source fields before target-only fields.

pub mod engine;
pub mod model;
pub mod stats;

pub use engine::Comparator;
pub use model::{
    AssetComparison, AssetFault, ComparisonRun, DifferenceKind, FieldDifference, Presence,
    SYSTEM_PRESENCE_FIELD,
};
pub use stats::ComparisonStats;
