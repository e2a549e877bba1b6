//! Validation result with a monotonic status.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ExErrorKind;

/// Outcome of one validation pass
///
/// Ordered by severity; a result only ever moves up this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Passed,
    PassedWithWarnings,
    Failed,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Passed => "PASSED",
            ValidationStatus::PassedWithWarnings => "PASSED_WITH_WARNINGS",
            ValidationStatus::Failed => "FAILED",
        }
    }

    /// Whether a caller may proceed (possibly after review)
    pub fn is_success(&self) -> bool {
        *self != ValidationStatus::Failed
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One collected problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    #[serde(serialize_with = "serialize_kind")]
    pub kind: ExErrorKind,
    pub message: String,
    /// Zero-based position of the offending entry, if any
    pub entry: Option<usize>,
    pub asset_id: Option<String>,
}

fn serialize_kind<S: serde::Serializer>(kind: &ExErrorKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(kind.code())
}

impl ValidationIssue {
    pub fn new(kind: ExErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            entry: None,
            asset_id: None,
        }
    }

    pub fn at_entry(mut self, index: usize) -> Self {
        self.entry = Some(index);
        self
    }

    pub fn for_asset(mut self, asset_id: impl Into<String>) -> Self {
        self.asset_id = Some(asset_id.into());
        self
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.message, self.kind.code())
    }
}

/// Summary counters for machine consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub name: String,
    pub status: ValidationStatus,
    pub checks_performed: usize,
    pub passed_checks: usize,
    pub failed_checks: usize,
    pub warnings_count: usize,
    pub errors_count: usize,
    pub critical_errors_count: usize,
    pub duration_seconds: Option<f64>,
}

/// Findings of one validation pass
///
/// Created at the start of a pass and finished once at its end; never reused.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub name: String,
    status: ValidationStatus,
    pub checks_performed: usize,
    pub passed_checks: usize,
    pub warnings: Vec<ValidationIssue>,
    pub errors: Vec<ValidationIssue>,
    pub critical_errors: Vec<ValidationIssue>,
    pub info: Vec<String>,
    pub metadata: BTreeMap<String, Value>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl ValidationResult {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ValidationStatus::Passed,
            checks_performed: 0,
            passed_checks: 0,
            warnings: Vec::new(),
            errors: Vec::new(),
            critical_errors: Vec::new(),
            info: Vec::new(),
            metadata: BTreeMap::new(),
            start_time: Utc::now(),
            end_time: None,
        }
    }

    pub fn status(&self) -> ValidationStatus {
        self.status
    }

    /// Count a check; failures are reported through the issue that caused them
    pub fn add_check(&mut self, passed: bool) {
        self.checks_performed += 1;
        if passed {
            self.passed_checks += 1;
        }
    }

    /// `PASSED` becomes `PASSED_WITH_WARNINGS`; worse states are kept
    pub fn add_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
        self.status = self.status.max(ValidationStatus::PassedWithWarnings);
    }

    /// Any error fails the result for good
    pub fn add_error(&mut self, issue: ValidationIssue, critical: bool) {
        if critical {
            self.critical_errors.push(issue);
        } else {
            self.errors.push(issue);
        }
        self.status = ValidationStatus::Failed;
    }

    pub fn add_info(&mut self, message: impl Into<String>) {
        self.info.push(message.into());
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn has_critical(&self) -> bool {
        !self.critical_errors.is_empty()
    }

    /// Whether any warning or error carries `kind`
    pub fn has_issue(&self, kind: ExErrorKind) -> bool {
        self.critical_errors
            .iter()
            .chain(&self.errors)
            .chain(&self.warnings)
            .any(|i| i.kind == kind)
    }

    pub fn finish(&mut self) {
        self.end_time = Some(Utc::now());
    }

    pub fn summary(&self) -> ValidationSummary {
        ValidationSummary {
            name: self.name.clone(),
            status: self.status,
            checks_performed: self.checks_performed,
            passed_checks: self.passed_checks,
            failed_checks: self.checks_performed - self.passed_checks,
            warnings_count: self.warnings.len(),
            errors_count: self.errors.len(),
            critical_errors_count: self.critical_errors.len(),
            duration_seconds: self
                .end_time
                .map(|end| (end - self.start_time).num_milliseconds() as f64 / 1000.0),
        }
    }

    /// Human-readable report: critical errors, errors, warnings, info, metadata
    pub fn generate_report(&self) -> String {
        let mut lines = vec![
            format!("Validation Report - {}", self.name),
            "=".repeat(60),
            format!("Status: {}", self.status),
            format!("Checks Performed: {}", self.checks_performed),
            format!("Passed: {}", self.passed_checks),
            format!("Failed: {}", self.checks_performed - self.passed_checks),
        ];

        issue_section(&mut lines, "Critical Errors", "✗", &self.critical_errors);
        issue_section(&mut lines, "Errors", "✗", &self.errors);
        issue_section(&mut lines, "Warnings", "⚠", &self.warnings);

        if !self.info.is_empty() {
            lines.push(String::new());
            lines.push("Information:".to_string());
            for info in &self.info {
                lines.push(format!("  ℹ {}", info));
            }
        }

        if !self.metadata.is_empty() {
            lines.push(String::new());
            lines.push("Metadata:".to_string());
            for (key, value) in &self.metadata {
                let shown = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                lines.push(format!("  {}: {}", key, shown));
            }
        }

        lines.join("\n")
    }
}

fn issue_section(lines: &mut Vec<String>, title: &str, mark: &str, issues: &[ValidationIssue]) {
    if issues.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(format!("{}:", title));
    for issue in issues {
        lines.push(format!("  {} {}", mark, issue));
    }
}
