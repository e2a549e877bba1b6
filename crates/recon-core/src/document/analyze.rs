//! Cross-document analysis and the reconciliation report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::compare::model::Presence;
use crate::config::CompareConfig;
use crate::document::model::ParsedDocument;

/// How many of each category the reconciliation report lists by name
const REPORT_SAMPLE: usize = 5;
/// Upper bound of a "minor" difference count
const MINOR_LIMIT: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemCoverage {
    pub both_systems: usize,
    pub source_only: usize,
    pub target_only: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStatistic {
    pub occurrences: usize,
    /// Share of all field occurrences, rounded to 2 decimals
    pub percentage: f64,
}

/// Difference patterns across many documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternAnalysis {
    pub total_documents: usize,
    /// Field name → number of entries naming it
    pub field_frequency: BTreeMap<String, usize>,
    /// `<field>_<kind>` → occurrences
    pub common_differences: BTreeMap<String, usize>,
    pub system_coverage: SystemCoverage,
    pub field_statistics: BTreeMap<String, FieldStatistic>,
}

impl PatternAnalysis {
    /// The `limit` most frequent patterns, ties by name
    pub fn top_patterns(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut patterns: Vec<(&str, usize)> = self
            .common_differences
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        patterns.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        patterns.truncate(limit);
        patterns
    }
}

pub fn analyze_patterns(docs: &[ParsedDocument], labels: &CompareConfig) -> PatternAnalysis {
    let mut analysis = PatternAnalysis {
        total_documents: docs.len(),
        ..PatternAnalysis::default()
    };

    for doc in docs {
        match doc.presence(labels) {
            Presence::Both => analysis.system_coverage.both_systems += 1,
            Presence::SourceOnly => analysis.system_coverage.source_only += 1,
            Presence::TargetOnly => analysis.system_coverage.target_only += 1,
        }
        for entry in &doc.differences {
            *analysis
                .field_frequency
                .entry(entry.field_name.clone())
                .or_insert(0) += 1;
            let pattern = format!("{}_{}", entry.field_name, entry.kind());
            *analysis.common_differences.entry(pattern).or_insert(0) += 1;
        }
    }

    let total: usize = analysis.field_frequency.values().sum();
    for (field, count) in &analysis.field_frequency {
        let percentage = (*count as f64 / total as f64 * 100.0 * 100.0).round() / 100.0;
        analysis.field_statistics.insert(
            field.clone(),
            FieldStatistic {
                occurrences: *count,
                percentage,
            },
        );
    }
    analysis
}

/// Categorized reconciliation report over parsed documents
///
/// Documents are reported in the order given.
pub fn reconciliation_report(docs: &[ParsedDocument]) -> String {
    let mut perfect = Vec::new();
    let mut minor = Vec::new();
    let mut major = Vec::new();
    let mut single = Vec::new();

    for doc in docs {
        let count = doc.differences.len();
        match &doc.note {
            Some(note) => single.push(format!("✗ {} - {}", doc.asset_id, note)),
            None if count == 0 => perfect.push(format!("✓ {}", doc.asset_id)),
            None if count <= MINOR_LIMIT => {
                minor.push(format!("⚠ {} - {} differences", doc.asset_id, count))
            }
            None => major.push(format!("⚠ {} - {} differences", doc.asset_id, count)),
        }
    }

    let mut lines = vec![
        "=".repeat(70),
        "DATA RECONCILIATION REPORT".to_string(),
        "=".repeat(70),
        String::new(),
    ];
    section(&mut lines, "PERFECT MATCHES", &perfect);
    section(&mut lines, "MINOR DIFFERENCES", &minor);
    section(&mut lines, "MAJOR DIFFERENCES", &major);
    section(&mut lines, "SINGLE SYSTEM ASSETS", &single);

    lines.push("SUMMARY:".to_string());
    lines.push(format!("  Total assets analyzed: {}", docs.len()));
    if !docs.is_empty() {
        let rate = perfect.len() as f64 / docs.len() as f64 * 100.0;
        lines.push(format!("  Perfect match rate: {:.2}%", rate));
        lines.push(format!(
            "  Assets needing reconciliation: {}",
            minor.len() + major.len()
        ));
    }
    lines.push("=".repeat(70));
    lines.join("\n")
}

fn section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    lines.push(format!("{} ({} assets):", title, items.len()));
    for item in items.iter().take(REPORT_SAMPLE) {
        lines.push(format!("  {}", item));
    }
    if items.len() > REPORT_SAMPLE {
        lines.push(format!("  ... and {} more", items.len() - REPORT_SAMPLE));
    }
    lines.push(String::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::model::DocumentEntry;

    fn doc(id: &str, note: Option<&str>, entries: &[(&str, &str, &str)]) -> ParsedDocument {
        ParsedDocument {
            asset_id: id.to_string(),
            note: note.map(str::to_string),
            differences: entries
                .iter()
                .map(|(f, s, t)| DocumentEntry {
                    field_name: f.to_string(),
                    source_value: s.to_string(),
                    target_value: t.to_string(),
                })
                .collect(),
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn test_pattern_counts() {
        let labels = CompareConfig::default();
        let docs = vec![
            doc("A1", None, &[("ip", "1", "2"), ("os", "null", "Linux")]),
            doc("A2", None, &[("ip", "3", "4")]),
            doc(
                "A3",
                Some("Asset exists only in source system"),
                &[("ip", "5", "null")],
            ),
        ];
        let analysis = analyze_patterns(&docs, &labels);
        assert_eq!(analysis.total_documents, 3);
        assert_eq!(analysis.field_frequency.get("ip"), Some(&3));
        assert_eq!(analysis.common_differences.get("ip_value_mismatch"), Some(&2));
        assert_eq!(analysis.common_differences.get("os_missing_in_source"), Some(&1));
        assert_eq!(analysis.common_differences.get("ip_missing_in_target"), Some(&1));
        assert_eq!(analysis.system_coverage.both_systems, 2);
        assert_eq!(analysis.system_coverage.source_only, 1);
        assert_eq!(analysis.field_statistics["ip"].percentage, 75.0);
        assert_eq!(analysis.top_patterns(1), vec![("ip_value_mismatch", 2)]);
    }

    #[test]
    fn test_empty_analysis() {
        let analysis = analyze_patterns(&[], &CompareConfig::default());
        assert!(analysis.field_statistics.is_empty());
    }

    #[test]
    fn test_report_categories_and_overflow() {
        let mut docs: Vec<ParsedDocument> = (1..=7)
            .map(|i| doc(&format!("M{}", i), None, &[("ip", "1", "2")]))
            .collect();
        docs.push(doc(
            "BIG",
            None,
            &[("a", "1", "2"), ("b", "1", "2"), ("c", "1", "2"), ("d", "1", "2")],
        ));
        docs.push(doc("S", Some("Asset exists only in target system"), &[]));
        docs.push(doc("P", None, &[]));

        let report = reconciliation_report(&docs);
        assert!(report.contains("MINOR DIFFERENCES (7 assets):"));
        assert!(report.contains("  ... and 2 more"));
        assert!(report.contains("⚠ BIG - 4 differences"));
        assert!(report.contains("✗ S - Asset exists only in target system"));
        assert!(report.contains("✓ P"));
        assert!(report.contains("Perfect match rate: 10.00%"));
        assert!(report.contains("Assets needing reconciliation: 8"));
    }
}
