//! Export command
//!
//! Usage: recon export <DIR> --csv <FILE>

use std::path::PathBuf;

use clap::Args;
use recon_core::document::export_csv;
use recon_store::atomic::atomic_write;
use recon_store::DocumentStore;

use crate::commands::Context;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Directory of .diff-doc files
    pub dir: PathBuf,

    /// CSV output file
    #[arg(long)]
    pub csv: PathBuf,
}

pub fn execute(args: ExportArgs, ctx: &Context) -> anyhow::Result<()> {
    let docs = DocumentStore::new(&args.dir, &ctx.logger).load_all()?;
    let csv = export_csv(&docs)?;
    atomic_write(&args.csv, csv.as_bytes())?;

    let rows: usize = docs.iter().map(|d| d.differences.len()).sum();
    println!("✓ Exported {} rows to {}", rows, args.csv.display());
    Ok(())
}
