//! Validation of reconciliation artefacts.
//!
//! Checks are layered. A structural failure (unreadable file, invalid JSON,
//! unknown container) is critical and stops the pass. Schema, semantic, sync
//! and integrity checks collect every finding they can into one
//! [`ValidationResult`] whose status only ever gets worse:
//!
//! ```text
//! PASSED --warning--> PASSED_WITH_WARNINGS --error--> FAILED
//! ```

pub mod integrity;
pub mod report;
pub mod result;
pub mod schema;
pub mod semantic;
pub mod structural;
pub mod sync;
pub mod validator;

pub use integrity::{sha256_hex, sidecar_path};
pub use report::ValidationReport;
pub use result::{ValidationIssue, ValidationResult, ValidationStatus, ValidationSummary};
pub use validator::Validator;
