//! Recon CLI
//!
//! Command-line interface for asset reconciliation

use clap::{Parser, Subcommand};

mod commands;

use commands::GlobalArgs;

#[derive(Debug, Parser)]
#[command(name = "recon")]
#[command(about = "Recon - compare, validate and sort asset inventories", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two record files and write one difference document per asset
    Compare(commands::compare::CompareArgs),
    /// Validate documents, entry files, change lists, record files or a cache directory
    Validate(commands::validate::ValidateArgs),
    /// Analyze difference patterns across a document directory
    Analyze(commands::analyze::AnalyzeArgs),
    /// Export a document directory as CSV
    Export(commands::export::ExportArgs),
    /// Sort a change-list or difference-entry JSON file in place
    Sort(commands::sort::SortArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = cli.global.context().and_then(|ctx| match cli.command {
        Commands::Compare(args) => commands::compare::execute(args, &ctx),
        Commands::Validate(args) => commands::validate::execute(args, &ctx),
        Commands::Analyze(args) => commands::analyze::execute(args, &ctx),
        Commands::Export(args) => commands::export::execute(args, &ctx),
        Commands::Sort(args) => commands::sort::execute(args, &ctx),
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
