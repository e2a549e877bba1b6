//! Sort command
//!
//! Usage: recon sort <FILE> [--kind change-list|entries] [--no-backup]

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use recon_core::sort::Sorter;
use recon_store::{sort_file, FileKind};

use crate::commands::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    ChangeList,
    Entries,
}

#[derive(Debug, Args)]
pub struct SortArgs {
    /// JSON file to sort in place
    pub file: PathBuf,

    /// Layout of the file
    #[arg(long, value_enum, default_value = "change-list")]
    pub kind: Kind,

    /// Skip the <FILE>.bak copy
    #[arg(long)]
    pub no_backup: bool,
}

pub fn execute(args: SortArgs, ctx: &Context) -> anyhow::Result<()> {
    let kind = match args.kind {
        Kind::ChangeList => FileKind::ChangeList,
        Kind::Entries => FileKind::DiffEntries,
    };
    let sorter = Sorter::new(&ctx.config, &ctx.logger);
    let report = sort_file(&args.file, kind, &sorter, &ctx.logger, !args.no_backup)?;

    println!("✓ Sorted {} entries in {}", report.sorted, report.path.display());
    if let Some(backup) = report.backup {
        println!("  Backup: {}", backup.display());
    }
    Ok(())
}
