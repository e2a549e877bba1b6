//! Core types shared across the reconciliation crates
//!
//! This crate provides foundational types used by the error and logging
//! facilities of `recon-core` and by the store:
//!
//! - **Correlation types**: RunId for tying log events to one comparison or validation run
//! - **Schema constants**: Canonical field keys, event names and file conventions

pub mod correlation;
pub mod schema;

pub use correlation::RunId;
