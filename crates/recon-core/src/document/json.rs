//! JSON projection of parsed documents.

#![allow(clippy::result_large_err)]

use crate::document::model::ParsedDocument;
use crate::errors::{ExError, ExErrorKind, Result};

/// Pretty JSON re-encoding of a parsed document, with no added semantics
pub fn to_json(parsed: &ParsedDocument) -> Result<String> {
    serde_json::to_string_pretty(parsed).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("to_json")
            .with_asset_id(parsed.asset_id.clone())
            .with_message(e.to_string())
    })
}
