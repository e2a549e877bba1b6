//! Canonical schema constants for structured logging and artifacts
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Entity identifiers
pub const FIELD_ASSET_ID: &str = "asset_id";
pub const FIELD_FIELD_NAME: &str = "field_name";
pub const FIELD_PATH: &str = "path";

// Collection sizes
pub const FIELD_ASSET_COUNT: &str = "asset_count";
pub const FIELD_DIFF_COUNT: &str = "diff_count";
pub const FIELD_ENTRY_COUNT: &str = "entry_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_ANOMALY: &str = "anomaly";

// Artifact conventions
pub const DIFF_DOC_EXTENSION: &str = "diff-doc";
pub const CHECKSUM_EXTENSION: &str = "sha256";
pub const NULL_MARKER: &str = "null";
