//! Run statistics.

use serde::{Deserialize, Serialize};

use crate::compare::model::{AssetComparison, DifferenceKind, Presence};
use crate::config::CompareConfig;

/// Counters for one comparison run
///
/// `total_differences` counts field differences only; the presence marker of a
/// single-system asset is not a field difference but does make the asset one
/// "with differences".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonStats {
    pub total_assets_processed: usize,
    pub matched_assets: usize,
    pub source_only: usize,
    pub target_only: usize,
    pub assets_with_differences: usize,
    pub total_differences: usize,
    pub faults: usize,
}

impl ComparisonStats {
    /// Fold one finished asset into the counters
    pub fn record(&mut self, asset: &AssetComparison) {
        self.total_assets_processed += 1;
        match asset.presence {
            Presence::Both => self.matched_assets += 1,
            Presence::SourceOnly => self.source_only += 1,
            Presence::TargetOnly => self.target_only += 1,
        }
        if asset.has_differences() {
            self.assets_with_differences += 1;
        }
        self.total_differences += asset
            .differences
            .iter()
            .filter(|d| d.kind != DifferenceKind::AssetMissing)
            .count();
    }

    /// Fold one faulted asset into the counters
    pub fn record_fault(&mut self) {
        self.total_assets_processed += 1;
        self.faults += 1;
    }

    /// Recompute counters from scratch over finished results
    pub fn recount(assets: &[AssetComparison], faults: usize) -> Self {
        let mut stats = Self::default();
        for asset in assets {
            stats.record(asset);
        }
        for _ in 0..faults {
            stats.record_fault();
        }
        stats
    }

    /// Matched assets as a percentage of all processed assets
    pub fn match_rate(&self) -> Option<f64> {
        (self.total_assets_processed > 0)
            .then(|| self.matched_assets as f64 / self.total_assets_processed as f64 * 100.0)
    }

    /// Assets with differences as a percentage of matched assets
    pub fn difference_rate(&self) -> Option<f64> {
        (self.matched_assets > 0)
            .then(|| self.assets_with_differences as f64 / self.matched_assets as f64 * 100.0)
    }

    pub fn render_summary(&self, labels: &CompareConfig) -> String {
        let mut lines = vec![
            "STATISTICS:".to_string(),
            format!("  Total assets processed: {}", self.total_assets_processed),
            format!("  Matched assets: {}", self.matched_assets),
            format!("  {}-only assets: {}", labels.source_label, self.source_only),
            format!("  {}-only assets: {}", labels.target_label, self.target_only),
            format!("  Assets with differences: {}", self.assets_with_differences),
            format!("  Total differences found: {}", self.total_differences),
        ];
        if self.faults > 0 {
            lines.push(format!("  Faulted assets: {}", self.faults));
        }
        lines.push(String::new());
        if let Some(rate) = self.match_rate() {
            lines.push(format!("  Match rate: {:.2}%", rate));
        }
        if let Some(rate) = self.difference_rate() {
            lines.push(format!("  Difference rate (matched assets): {:.2}%", rate));
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
