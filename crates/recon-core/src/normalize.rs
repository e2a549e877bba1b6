//! Value canonicalization for equality decisions
//!
//! Normalized forms are only ever compared; reported values always keep the
//! original text.

use recon_core_types::schema::NULL_MARKER;

use crate::config::NormalizeConfig;
use crate::model::FieldValue;

/// Canonical comparison form of a value
pub fn normalize(value: &FieldValue, config: &NormalizeConfig) -> String {
    let raw = match value {
        FieldValue::Null => return NULL_MARKER.to_string(),
        other => other.to_string(),
    };
    let spaced = if config.normalize_whitespace {
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        raw
    };
    if config.case_sensitive {
        spaced
    } else {
        spaced.to_lowercase()
    }
}

/// Finite numeric reading of a value, if it has one
///
/// Text is trimmed before parsing. Booleans are never numeric.
pub fn as_number(value: &FieldValue) -> Option<f64> {
    let n = match value {
        FieldValue::Int(i) => *i as f64,
        FieldValue::Float(x) => *x,
        FieldValue::Text(s) => s.trim().parse::<f64>().ok()?,
        FieldValue::Null | FieldValue::Bool(_) => return None,
    };
    n.is_finite().then_some(n)
}

/// Equality under null, numeric-tolerance and normalized-text rules, in that order
pub fn values_equal(a: &FieldValue, b: &FieldValue, config: &NormalizeConfig) -> bool {
    match (a.is_null(), b.is_null()) {
        (true, true) => return true,
        (true, false) | (false, true) => return false,
        (false, false) => {}
    }
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return (x - y).abs() <= config.numeric_tolerance;
    }
    normalize(a, config) == normalize(b, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> NormalizeConfig {
        NormalizeConfig::default()
    }

    #[test]
    fn test_null_marker_differs_from_empty_text() {
        assert_eq!(normalize(&FieldValue::Null, &cfg()), "null");
        assert_eq!(normalize(&FieldValue::text(""), &cfg()), "");
        assert!(!values_equal(&FieldValue::Null, &FieldValue::text(""), &cfg()));
    }

    #[test]
    fn test_whitespace_and_case() {
        let a = FieldValue::text("  Web   Server ");
        let b = FieldValue::text("web server");
        assert!(values_equal(&a, &b, &cfg()));

        let strict = NormalizeConfig {
            case_sensitive: true,
            normalize_whitespace: false,
            ..cfg()
        };
        assert!(!values_equal(&a, &b, &strict));
    }

    #[test]
    fn test_numeric_format_drift_is_equal() {
        assert!(values_equal(&FieldValue::text("8"), &FieldValue::text("8.0"), &cfg()));
        assert!(values_equal(&FieldValue::Int(8), &FieldValue::text(" 8.00 "), &cfg()));
        assert!(values_equal(&FieldValue::Float(1.0), &FieldValue::Float(1.005), &cfg()));
        assert!(!values_equal(&FieldValue::Float(1.0), &FieldValue::Float(1.02), &cfg()));
    }

    #[test]
    fn test_ip_addresses_are_not_numeric() {
        assert_eq!(as_number(&FieldValue::text("1.1.1.1")), None);
        assert!(!values_equal(
            &FieldValue::text("1.1.1.1"),
            &FieldValue::text("1.1.1.2"),
            &cfg()
        ));
    }

    #[test]
    fn test_non_finite_text_is_not_numeric() {
        assert_eq!(as_number(&FieldValue::text("NaN")), None);
        assert_eq!(as_number(&FieldValue::text("inf")), None);
        assert!(values_equal(&FieldValue::text("NaN"), &FieldValue::text("nan"), &cfg()));
    }

    #[test]
    fn test_booleans_compare_as_text() {
        assert_eq!(as_number(&FieldValue::Bool(true)), None);
        assert!(values_equal(&FieldValue::Bool(true), &FieldValue::text("TRUE"), &cfg()));
    }
}
