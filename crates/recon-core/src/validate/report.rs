//! Aggregate report over several validation results.

use chrono::{DateTime, Utc};

use crate::validate::result::{ValidationResult, ValidationStatus};

/// More warnings than this across all results earns a review recommendation
const WARNING_REVIEW_THRESHOLD: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    results: Vec<ValidationResult>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: ValidationResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    pub fn count(&self, status: ValidationStatus) -> usize {
        self.results.iter().filter(|r| r.status() == status).count()
    }

    /// Worst status over all results; `PASSED` when empty
    pub fn overall_status(&self) -> ValidationStatus {
        self.results
            .iter()
            .map(ValidationResult::status)
            .max()
            .unwrap_or(ValidationStatus::Passed)
    }

    pub fn recommendations(&self) -> Vec<String> {
        let warnings: usize = self.results.iter().map(|r| r.warnings.len()).sum();
        let errors: usize = self
            .results
            .iter()
            .map(|r| r.errors.len() + r.critical_errors.len())
            .sum();
        let positive = |key: &str| {
            self.results.iter().any(|r| {
                r.metadata
                    .get(key)
                    .and_then(serde_json::Value::as_u64)
                    .is_some_and(|n| n > 0)
            })
        };

        let mut recommendations = Vec::new();
        if errors > 0 {
            recommendations.push("Address errors before proceeding with sync".to_string());
        }
        if warnings > WARNING_REVIEW_THRESHOLD {
            recommendations.push("Review warnings to improve data quality".to_string());
        }
        if positive("sync_errors") {
            recommendations.push("Investigate field mapping discrepancies".to_string());
        }
        if positive("duplicate_asset_ids") {
            recommendations.push("Resolve duplicate asset IDs before sync".to_string());
        }
        if recommendations.is_empty() {
            recommendations.push("All validations passed successfully".to_string());
        }
        recommendations
    }

    pub fn generate_report(&self, generated_at: DateTime<Utc>) -> String {
        let rule = "-".repeat(60);
        let mut lines = vec![
            "=".repeat(60),
            "COMPREHENSIVE VALIDATION REPORT".to_string(),
            "=".repeat(60),
            format!("Generated: {}", generated_at.to_rfc3339()),
            format!("Total Validations: {}", self.results.len()),
            String::new(),
            "Summary:".to_string(),
            format!("  Passed: {}", self.count(ValidationStatus::Passed)),
            format!(
                "  Passed with Warnings: {}",
                self.count(ValidationStatus::PassedWithWarnings)
            ),
            format!("  Failed: {}", self.count(ValidationStatus::Failed)),
            String::new(),
        ];

        for result in &self.results {
            lines.push(rule.clone());
            lines.push(result.generate_report());
            lines.push(String::new());
        }

        lines.push(rule);
        lines.push("Recommendations:".to_string());
        for recommendation in self.recommendations() {
            lines.push(format!("  • {}", recommendation));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;
    use crate::validate::result::ValidationIssue;

    #[test]
    fn test_empty_report_recommends_nothing_to_fix() {
        let report = ValidationReport::new();
        assert_eq!(report.overall_status(), ValidationStatus::Passed);
        assert_eq!(
            report.recommendations(),
            vec!["All validations passed successfully".to_string()]
        );
    }

    #[test]
    fn test_counts_and_recommendations() {
        let mut passed = ValidationResult::new("ok");
        passed.set_metadata("sync_errors", 0);

        let mut failed = ValidationResult::new("dupes");
        failed.add_error(ValidationIssue::new(ExErrorKind::Semantic, "dup"), false);
        failed.set_metadata("duplicate_asset_ids", 1);

        let mut warned = ValidationResult::new("sync");
        warned.add_warning(ValidationIssue::new(ExErrorKind::SyncMismatch, "x"));
        warned.set_metadata("sync_errors", 1);

        let mut report = ValidationReport::new();
        report.push(passed);
        report.push(failed);
        report.push(warned);

        assert_eq!(report.count(ValidationStatus::Passed), 1);
        assert_eq!(report.count(ValidationStatus::Failed), 1);
        assert_eq!(report.overall_status(), ValidationStatus::Failed);
        assert_eq!(
            report.recommendations(),
            vec![
                "Address errors before proceeding with sync".to_string(),
                "Investigate field mapping discrepancies".to_string(),
                "Resolve duplicate asset IDs before sync".to_string(),
            ]
        );

        let text = report.generate_report(Utc::now());
        assert!(text.contains("Total Validations: 3"));
        assert!(text.contains("Validation Report - dupes"));
        assert!(text.ends_with("  • Resolve duplicate asset IDs before sync"));
    }
}
