//! Structured logging facility for the reconciliation engine
//!
//! This module provides a canonical logging facility with:
//! - An explicit `Logger` handle built once and passed by reference
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! No global subscriber is installed by this crate. Components receive a
//! `&Logger` and emit their events inside `Logger::in_scope`.
//!
//! # Usage
//!
//! ```rust
//! use recon_core::logging_facility::{Logger, Profile};
//!
//! let logger = Logger::new(Profile::Test);
//! logger.in_scope(|| {
//!     recon_core::log_op_start!("compare");
//! });
//! ```
//!
//! # Logging Macros
//!
//! - `log_op_start!(op, ...)` - Log operation start
//! - `log_op_end!(op, duration_ms = ...)` - Log operation end
//! - `log_op_error!(op, err, duration_ms = ...)` - Log operation error
//! - `log_anomaly!(op, ...)` - Log a recorded, non-fatal anomaly

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{Logger, Profile};
pub use test_capture::{CapturedEvent, TestCapture, TestCaptureLayer};
