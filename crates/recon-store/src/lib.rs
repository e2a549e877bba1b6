//! Recon Store - filesystem persistence for reconciliation artefacts
//!
//! Provides:
//! - Atomic temp→rename writes
//! - A document store of `.diff-doc` files with checksum sidecars
//! - In-place sorting of change-list and difference-entry JSON files with backups

pub mod atomic;
pub mod checksum;
pub mod doc_store;
pub mod errors;
pub mod file_sort;

// Re-export key types
pub use doc_store::DocumentStore;
pub use errors::Result;
pub use file_sort::{sort_file, FileKind, SortReport};
