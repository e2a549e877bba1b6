//! `.diff-doc` text codec.
//!
//! [`write_document`] and [`parse_document`] are inverse over `asset_id`,
//! `note` and the ordered entry list for any content, including empty
//! strings, surrounding whitespace, quotes and control characters.

#![allow(clippy::result_large_err)]

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::document::model::{DifferenceDocument, DocumentEntry, ParsedDocument};
use crate::errors::{ExError, ReconError, Result};

const ENTRY_PREFIX: &str = "- field_name:";

/// Render a document in the stable text form
pub fn write_document(doc: &DifferenceDocument) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "asset_id: {}", scalar(&doc.asset_id));
    if let Some(note) = &doc.note {
        let _ = writeln!(out, "note: {}", scalar(note));
    }
    out.push_str("differences:\n");
    for entry in &doc.differences {
        let _ = writeln!(out, "  {} {}", ENTRY_PREFIX, scalar(&entry.field_name));
        let _ = writeln!(out, "    source_value: {}", quote(&entry.source_value));
        let _ = writeln!(out, "    target_value: {}", quote(&entry.target_value));
    }

    out.push('\n');
    let _ = writeln!(out, "# Generated: {}", doc.generated_at.to_rfc3339());
    let _ = writeln!(out, "# Total differences: {}", doc.total_differences());
    if let Some(score) = doc.similarity_score {
        let _ = writeln!(out, "# Similarity score: {}%", format_score(score));
    }
    let _ = writeln!(out, "# Value mismatches: {}", doc.summary.value_mismatches);
    let _ = writeln!(out, "# Missing in source: {}", doc.summary.missing_in_source);
    let _ = writeln!(out, "# Missing in target: {}", doc.summary.missing_in_target);
    out
}

/// Parse the stable text form
///
/// # Errors
///
/// - `InvalidDocument` for a value line outside an entry, an entry without
///   both values, an unterminated quoted value, or a missing `asset_id:` header
pub fn parse_document(text: &str) -> Result<ParsedDocument> {
    let mut asset_id = None;
    let mut note = None;
    let mut in_differences = false;
    let mut pending: Option<PendingEntry> = None;
    let mut differences = Vec::new();
    let mut metadata = BTreeMap::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            if let Some((key, value)) = metadata_comment(comment) {
                metadata.insert(key, value);
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix(ENTRY_PREFIX) {
            if !in_differences {
                return Err(parse_error(line_no, "entry before differences block"));
            }
            if let Some(done) = pending.take() {
                differences.push(done.finish()?);
            }
            pending = Some(PendingEntry::new(line_no, read_scalar(rest, line_no)?));
            continue;
        }

        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        match key {
            "asset_id" => asset_id = Some(read_scalar(rest, line_no)?),
            "note" => note = Some(read_scalar(rest, line_no)?),
            "differences" => in_differences = true,
            "source_value" | "target_value" => {
                let entry = pending
                    .as_mut()
                    .ok_or_else(|| parse_error(line_no, format!("{} outside an entry", key)))?;
                let value = read_scalar(rest, line_no)?;
                if key == "source_value" {
                    entry.source_value = Some(value);
                } else {
                    entry.target_value = Some(value);
                }
            }
            _ => {}
        }
    }

    if let Some(done) = pending.take() {
        differences.push(done.finish()?);
    }

    let asset_id = asset_id.ok_or_else(|| ExError::from(ReconError::MissingDocumentHeader))?;
    Ok(ParsedDocument {
        asset_id,
        note,
        differences,
        metadata,
    })
}

struct PendingEntry {
    line: usize,
    field_name: String,
    source_value: Option<String>,
    target_value: Option<String>,
}

impl PendingEntry {
    fn new(line: usize, field_name: String) -> Self {
        Self {
            line,
            field_name,
            source_value: None,
            target_value: None,
        }
    }

    fn finish(self) -> Result<DocumentEntry> {
        match (self.source_value, self.target_value) {
            (Some(source_value), Some(target_value)) => Ok(DocumentEntry {
                field_name: self.field_name,
                source_value,
                target_value,
            }),
            _ => Err(parse_error(
                self.line,
                format!("entry for field '{}' lacks a source or target value", self.field_name),
            )),
        }
    }
}

fn parse_error(line: usize, reason: impl Into<String>) -> ExError {
    ReconError::DocumentParse {
        line,
        reason: reason.into(),
    }
    .into()
}

/// `# Key words: value` → (`key_words`, `value`)
fn metadata_comment(comment: &str) -> Option<(String, String)> {
    let body = comment.strip_prefix(' ')?;
    let (key, value) = body.split_once(": ")?;
    let first = key.chars().next()?;
    let key_ok = (first.is_alphanumeric() || first == '_')
        && key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c.is_whitespace());
    let value = value.trim();
    if !key_ok || value.is_empty() {
        return None;
    }
    Some((key.trim().to_lowercase().replace(' ', "_"), value.to_string()))
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty() || s != s.trim() || s.starts_with('"') || s.chars().any(char::is_control)
}

fn scalar(s: &str) -> String {
    if needs_quoting(s) {
        quote(s)
    } else {
        s.to_string()
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn read_scalar(rest: &str, line: usize) -> Result<String> {
    let text = rest.trim();
    if !text.starts_with('"') {
        return Ok(text.to_string());
    }
    if let Ok(value) = serde_json::from_str::<String>(text) {
        return Ok(value);
    }
    // Older writers quoted without escaping.
    if text.len() >= 2 && text.ends_with('"') {
        return Ok(text[1..text.len() - 1].to_string());
    }
    Err(parse_error(line, "unterminated quoted value"))
}

/// Render a score with at least one decimal, as in `50.0` or `66.67`
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{:.1}", score)
    } else {
        format!("{}", score)
    }
}
