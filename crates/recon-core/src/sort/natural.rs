//! Natural ordering of identifiers
//!
//! `asset2 < asset10 < asset100`: digit runs compare as numbers of any
//! length, other runs compare as lower-cased text. Absent or blank
//! identifiers order after everything else.

use std::cmp::Ordering;

use serde_json::Value;

use crate::model::FieldValue;

/// A run of digits compared by numeric value
///
/// Held as the digit string without leading zeros, so arbitrarily long runs
/// order correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumToken(String);

impl NumToken {
    fn from_digits(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            NumToken("0".to_string())
        } else {
            NumToken(trimmed.to_string())
        }
    }

    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl Ord for NumToken {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for NumToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One element of a natural key; numbers order before text at the same position
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Token {
    Num(NumToken),
    Text(String),
}

/// Comparison key for natural ordering
///
/// `Last` is strictly greater than every derived key and equal to itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Key(Vec<Token>),
    Last,
}

/// Derive the natural key of an identifier
pub fn natural_sort_key(id: Option<&str>) -> SortKey {
    let text = match id.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => return SortKey::Last,
    };

    let mut tokens = Vec::new();
    let mut run = String::new();
    let mut in_digits = false;
    for ch in text.chars() {
        let is_digit = ch.is_ascii_digit();
        if !run.is_empty() && is_digit != in_digits {
            tokens.push(make_token(&run, in_digits));
            run.clear();
        }
        in_digits = is_digit;
        run.push(ch);
    }
    if !run.is_empty() {
        tokens.push(make_token(&run, in_digits));
    }
    SortKey::Key(tokens)
}

fn make_token(run: &str, digits: bool) -> Token {
    if digits {
        Token::Num(NumToken::from_digits(run))
    } else {
        Token::Text(run.to_string())
    }
}

/// Key for a record identifier; booleans cannot be ordered
pub fn key_for_field(value: Option<&FieldValue>) -> Result<SortKey, String> {
    match value {
        None | Some(FieldValue::Null) => Ok(SortKey::Last),
        Some(FieldValue::Bool(b)) => Err(format!("boolean identifier {}", b)),
        Some(FieldValue::Text(s)) => Ok(natural_sort_key(Some(s))),
        Some(other) => Ok(natural_sort_key(Some(&other.to_string()))),
    }
}

/// Key for a JSON identifier; booleans, arrays and objects cannot be ordered
pub fn key_for_json(value: Option<&Value>) -> Result<SortKey, String> {
    match value {
        None | Some(Value::Null) => Ok(SortKey::Last),
        Some(Value::String(s)) => Ok(natural_sort_key(Some(s))),
        Some(Value::Number(n)) => Ok(natural_sort_key(Some(&n.to_string()))),
        Some(Value::Bool(b)) => Err(format!("boolean identifier {}", b)),
        Some(Value::Array(_)) => Err("array identifier".to_string()),
        Some(Value::Object(_)) => Err("object identifier".to_string()),
    }
}

/// Order two plain identifiers naturally
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_sort_key(Some(a)).cmp(&natural_sort_key(Some(b)))
}
