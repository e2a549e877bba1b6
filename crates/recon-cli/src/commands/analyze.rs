//! Analyze command
//!
//! Usage: recon analyze <DIR> [--json]

use std::path::PathBuf;

use clap::Args;
use recon_core::document::{analyze_patterns, reconciliation_report};
use recon_store::DocumentStore;

use crate::commands::Context;

/// Patterns listed in the text output
const TOP_PATTERNS: usize = 10;

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Directory of .diff-doc files
    pub dir: PathBuf,

    /// Print the pattern analysis as JSON instead of text reports
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: AnalyzeArgs, ctx: &Context) -> anyhow::Result<()> {
    let docs = DocumentStore::new(&args.dir, &ctx.logger).load_all()?;
    let analysis = analyze_patterns(&docs, &ctx.config.compare);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("Documents analyzed: {}", analysis.total_documents);
    println!(
        "Coverage: {} both, {} {}-only, {} {}-only",
        analysis.system_coverage.both_systems,
        analysis.system_coverage.source_only,
        ctx.config.compare.source_label,
        analysis.system_coverage.target_only,
        ctx.config.compare.target_label,
    );
    println!("Most common differences:");
    for (pattern, count) in analysis.top_patterns(TOP_PATTERNS) {
        println!("  {}: {}", pattern, count);
    }
    println!();
    println!("{}", reconciliation_report(&docs));
    Ok(())
}
