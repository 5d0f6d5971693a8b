//! Run configuration.
//!
//! Every option can be given as a CLI flag, as its uppercase environment
//! variable, or through a JSON file named by `--config`/`CONFIG`.
//! Precedence: flag (or its env var) > config file > default.

use std::path::PathBuf;

use anyhow::{ensure, Context};
use clap::Parser;
use serde::Deserialize;

pub const DEFAULT_STOP_SECS: u64 = 60 * 60 * 24;
pub const DEFAULT_EVERY_SECS: u64 = 30;

#[derive(Parser, Debug, Default)]
#[command(
    name = "xlm-vanity",
    about = "Search the Stellar keypair space for an address containing a substring"
)]
pub struct Args {
    /// Path to a JSON file providing any of the other options
    #[arg(long, env = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Substring in the address to look for (letters and digits only)
    #[arg(long, env = "FIND")]
    pub find: Option<String>,

    /// Worker threads to use when searching
    #[arg(long, env = "CORES")]
    pub cores: Option<usize>,

    /// Output path to write results to (defaults to <find>.json)
    #[arg(long, env = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Seconds to run before stopping
    #[arg(long, env = "STOP")]
    pub stop: Option<u64>,

    /// Suppress feedback and skip the scanned-addresses counter entirely
    #[arg(long, env = "QUIET")]
    pub quiet: bool,

    /// Seconds between scanned-addresses updates
    #[arg(long, env = "EVERY")]
    pub every: Option<u64>,
}

/// File form of [`Args`]: a JSON object with any subset of the keys.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    find: Option<String>,
    cores: Option<usize>,
    output: Option<PathBuf>,
    stop: Option<u64>,
    quiet: Option<bool>,
    every: Option<u64>,
}

/// Resolved configuration, immutable for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub find: String,
    pub cores: usize,
    pub output: PathBuf,
    /// Seconds until the deadline trigger fires.
    pub stop_after: u64,
    pub quiet: bool,
    /// Seconds between progress reports.
    pub every: u64,
}

impl Args {
    pub fn resolve(self) -> anyhow::Result<RunConfig> {
        let file = match &self.config {
            Some(path) => {
                let data = std::fs::read(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                serde_json::from_slice::<FileConfig>(&data)
                    .with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => FileConfig::default(),
        };

        let find = self.find.or(file.find).unwrap_or_default();
        let cores = self.cores.or(file.cores).unwrap_or_else(num_cpus::get);
        ensure!(cores >= 1, "cores must be at least 1");
        let every = self.every.or(file.every).unwrap_or(DEFAULT_EVERY_SECS);
        ensure!(every >= 1, "report interval must be at least 1 second");
        // an unset output path is derived from the query, "stellar" -> "stellar.json"
        let output = self
            .output
            .or(file.output)
            .unwrap_or_else(|| PathBuf::from(format!("{find}.json")));

        Ok(RunConfig {
            find,
            cores,
            output,
            stop_after: self.stop.or(file.stop).unwrap_or(DEFAULT_STOP_SECS),
            quiet: self.quiet || file.quiet.unwrap_or(false),
            every,
        })
    }
}
