//! Error handling for recon-store
//!
//! Wraps recon-core ExError with store-specific helpers

use std::path::Path;

use recon_core::errors::{ExError, ExErrorKind, ReconError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error, keeping NotFound distinct
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::from(ReconError::io(path.display().to_string(), &err)).with_op(operation)
}

/// Create an error for a file whose JSON could not be read
pub fn invalid_json(operation: &str, path: &Path, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation)
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

/// Create an error for a JSON file with no sortable list
pub fn unknown_layout(path: &Path, expected: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("sort_file")
        .with_path(path.display().to_string())
        .with_message(format!("expected {}", expected))
}

/// Create an error for a list the sorter refused to reorder
///
/// The sorter's own error is kept as the source.
pub fn unsortable(path: &Path, reason: ReconError) -> ExError {
    ExError::new(ExErrorKind::UncomparableKey)
        .with_op("sort_file")
        .with_path(path.display().to_string())
        .with_message("list left in its original order")
        .with_source(ExError::from(reason))
}
