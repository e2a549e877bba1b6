//! Deterministic ordering of records, documents and entry lists.
//!
//! Every sort here is stable and all-or-nothing: if any element's key cannot
//! be derived, the input comes back unchanged together with the anomaly.

pub mod fields;
pub mod natural;
pub mod sorter;

pub use fields::FieldPriority;
pub use natural::{natural_sort_key, SortKey};
pub use sorter::{validate_json_sort_order, validate_sort_order, SortOutcome, Sorter};
