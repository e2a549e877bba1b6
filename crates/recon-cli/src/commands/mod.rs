//! Subcommands and the context they share

pub mod analyze;
pub mod compare;
pub mod export;
pub mod sort;
pub mod validate;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, ValueEnum};
use recon_core::config::ReconConfig;
use recon_core::logging_facility::{Logger, Profile};
use recon_core::model::{key_by_asset_id, records_from_json, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable debug output on stderr
    Text,
    /// JSON lines on stderr
    Json,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit structured logs; silent when omitted
    #[arg(long, value_enum, global = true)]
    pub log: Option<LogFormat>,
}

impl GlobalArgs {
    pub fn context(&self) -> anyhow::Result<Context> {
        let config = match &self.config {
            Some(path) => {
                let config = ReconConfig::load(path)
                    .with_context(|| format!("loading config {}", path.display()))?;
                config.validate()?;
                config
            }
            None => ReconConfig::default(),
        };
        let logger = match self.log {
            Some(LogFormat::Text) => Logger::new(Profile::Development),
            Some(LogFormat::Json) => Logger::new(Profile::Production),
            None => Logger::disabled(),
        };
        Ok(Context { config, logger })
    }
}

/// Configuration and logger built once per invocation
pub struct Context {
    pub config: ReconConfig,
    pub logger: Logger,
}

/// Parse a JSON file
pub fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Load the records of a file as listed
pub fn read_records(path: &Path) -> anyhow::Result<Vec<Record>> {
    records_from_json(&read_json(path)?)
        .with_context(|| format!("reading records from {}", path.display()))
}

/// Load a record file keyed by asset id
pub fn load_records(path: &Path) -> anyhow::Result<BTreeMap<String, Record>> {
    key_by_asset_id(read_records(path)?)
        .with_context(|| format!("keying records of {}", path.display()))
}
