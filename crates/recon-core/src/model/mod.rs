//! Typed record model
//!
//! Records are ordered lists of `(field_name, FieldValue)` pairs. An absent
//! field and a field present with `Null` are different states.

pub mod record;
pub mod record_set;

pub use record::{FieldValue, Record};
pub use record_set::{key_by_asset_id, records_from_json};
