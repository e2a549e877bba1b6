//! Validate command
//!
//! Usage: recon validate <doc|entries|change-list|records|cache> <PATH>
//!        recon validate sync <SOURCE> <TARGET>

use std::path::PathBuf;

use anyhow::bail;
use clap::{Args, Subcommand};
use recon_core::validate::{ValidationResult, Validator};

use crate::commands::{read_records, Context};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(subcommand)]
    pub command: ValidateCommand,

    /// Also write the report to this file
    #[arg(long, global = true)]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum ValidateCommand {
    /// A single .diff-doc file
    Doc { path: PathBuf },
    /// A difference-entry or asset-list JSON file
    Entries { path: PathBuf },
    /// A change-list JSON file
    ChangeList { path: PathBuf },
    /// A record file (JSON array, or object keyed by asset id)
    Records { path: PathBuf },
    /// A cache directory of *.json / *.cache files
    Cache { path: PathBuf },
    /// Field agreement between a source and a target record file
    Sync { source: PathBuf, target: PathBuf },
}

pub fn execute(args: ValidateArgs, ctx: &Context) -> anyhow::Result<()> {
    let validator = Validator::new(&ctx.config, &ctx.logger);
    let result = match &args.command {
        ValidateCommand::Doc { path } => validator.validate_document_file(path),
        ValidateCommand::Entries { path } => validator.validate_entries_file(path),
        ValidateCommand::ChangeList { path } => validator.validate_change_list_file(path),
        ValidateCommand::Records { path } => validator.validate_records_file(path),
        ValidateCommand::Cache { path } => validator.validate_cache_dir(path),
        ValidateCommand::Sync { source, target } => {
            validator.validate_sync(&read_records(source)?, &read_records(target)?)
        }
    };
    finish(&result, args.report.as_ref())
}

/// Print the report and turn a failed status into an error
fn finish(result: &ValidationResult, report: Option<&PathBuf>) -> anyhow::Result<()> {
    let text = result.generate_report();
    println!("{}", text);
    if let Some(path) = report {
        recon_store::atomic::atomic_write(path, format!("{}\n", text).as_bytes())?;
    }
    if !result.status().is_success() {
        bail!("validation {}", result.status());
    }
    Ok(())
}
