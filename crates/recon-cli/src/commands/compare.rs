//! Compare command
//!
//! Usage: recon compare <SOURCE> <TARGET> --out <DIR>

use std::path::PathBuf;

use clap::Args;
use recon_core::compare::Comparator;
use recon_core::sort::Sorter;
use recon_store::DocumentStore;

use crate::commands::{load_records, Context};

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Source system record file (JSON array, or object keyed by asset id)
    pub source: PathBuf,

    /// Target system record file
    pub target: PathBuf,

    /// Directory receiving one .diff-doc per asset with differences
    #[arg(short, long)]
    pub out: PathBuf,
}

pub fn execute(args: CompareArgs, ctx: &Context) -> anyhow::Result<()> {
    let source = load_records(&args.source)?;
    let target = load_records(&args.target)?;

    let run = Comparator::new(&ctx.config, &ctx.logger).compare(&source, &target);
    let labels = &ctx.config.compare;
    let docs = Sorter::new(&ctx.config, &ctx.logger).sort_documents(run.documents(labels));

    let store = DocumentStore::new(&args.out, &ctx.logger);
    let written = store.write_all(&docs)?;

    print!("{}", run.summary_report(labels));
    for fault in &run.faults {
        eprintln!("⚠ {}: {}", fault.asset_id, fault.error);
    }
    println!("✓ Wrote {} documents to {}", written.len(), args.out.display());
    Ok(())
}
