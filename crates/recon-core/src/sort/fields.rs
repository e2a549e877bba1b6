//! Field ordering within a record.

use std::collections::BTreeMap;

use crate::model::Record;

/// Priority of any field not in the table
pub const DEFAULT_PRIORITY: u32 = 50;

const BUILT_IN: &[(&str, u32)] = &[
    ("asset_id", 1),
    ("ip_address", 2),
    ("hostname", 3),
    ("serial_number", 4),
    ("model", 5),
    ("manufacturer", 6),
    ("location", 7),
    ("department", 8),
    ("status", 9),
    ("last_updated", 90),
    ("created_date", 91),
    ("notes", 99),
];

/// Field name → priority; lower sorts first, ties alphabetical ignoring case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPriority {
    table: BTreeMap<String, u32>,
}

impl Default for FieldPriority {
    fn default() -> Self {
        Self {
            table: BUILT_IN
                .iter()
                .map(|(name, p)| (name.to_string(), *p))
                .collect(),
        }
    }
}

impl FieldPriority {
    /// Built-in table with `overrides` merged over it; keys are matched case-insensitively
    pub fn with_overrides(overrides: &BTreeMap<String, u32>) -> Self {
        let mut priority = Self::default();
        for (name, p) in overrides {
            priority.table.insert(name.to_lowercase(), *p);
        }
        priority
    }

    pub fn priority(&self, field: &str) -> u32 {
        self.table
            .get(&field.to_lowercase())
            .copied()
            .unwrap_or(DEFAULT_PRIORITY)
    }

    /// Sort key of a field name
    pub fn key(&self, field: &str) -> (u32, String) {
        (self.priority(field), field.to_lowercase())
    }

    /// A new record with the same fields in priority order
    pub fn order_fields(&self, record: &Record) -> Record {
        let mut pairs: Vec<(String, _)> = record
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        pairs.sort_by_cached_key(|(name, _)| self.key(name));
        Record::from_pairs(pairs)
    }

    /// Field names in priority order
    pub fn order_names<'n>(&self, names: impl IntoIterator<Item = &'n str>) -> Vec<&'n str> {
        let mut names: Vec<&str> = names.into_iter().collect();
        names.sort_by_cached_key(|name| self.key(name));
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_bands() {
        let p = FieldPriority::default();
        assert!(p.priority("asset_id") < p.priority("rack"));
        assert!(p.priority("rack") < p.priority("last_updated"));
        assert_eq!(p.priority("rack"), DEFAULT_PRIORITY);
        assert_eq!(p.priority("Hostname"), 3);
    }

    #[test]
    fn test_order_fields() {
        let record = Record::new()
            .with("notes", "n")
            .with("Zeta", "z")
            .with("alpha", "a")
            .with("hostname", "h")
            .with("asset_id", "A");
        let ordered = FieldPriority::default().order_fields(&record);
        let names: Vec<&str> = ordered.field_names().collect();
        assert_eq!(names, vec!["asset_id", "hostname", "alpha", "Zeta", "notes"]);
        // the input is untouched
        assert_eq!(record.field_names().next(), Some("notes"));
    }

    #[test]
    fn test_overrides() {
        let overrides = BTreeMap::from([("Rack".to_string(), 2u32), ("notes".to_string(), 1)]);
        let p = FieldPriority::with_overrides(&overrides);
        assert_eq!(p.priority("rack"), 2);
        assert_eq!(
            p.order_names(["hostname", "rack", "notes", "ip_address"]),
            vec!["notes", "ip_address", "rack", "hostname"]
        );
    }
}
