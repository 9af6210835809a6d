//! Command line interface definitions.
use clap::Parser;

use crate::{
    error::{ClparseError, Result},
    output::OutputFormat,
};

/// Parse changelogs into structured data.
#[derive(Parser, Debug, Clone)]
#[command(name = "clparse", version, about, long_about = None)]
pub struct Args {
    /// Path to the changelog file to parse.
    #[arg(default_value = "./CHANGELOG.md")]
    pub path: String,

    /// Output only the latest release entry.
    #[arg(short, long)]
    pub latest: bool,

    /// Output only the entry for the given version.
    #[arg(short, long, default_value = "")]
    pub release: String,

    /// Output only the N most recent entries.
    #[arg(long, default_value_t = 0)]
    pub last: usize,

    /// Output only entries released within the last N days.
    #[arg(long, default_value_t = 0)]
    pub since_days: u64,

    /// Include commit message bodies from the local repository.
    #[arg(long)]
    pub include_body: bool,

    /// Fetch issue and pull request details from the origin provider.
    #[arg(long)]
    pub fetch_item_details: bool,

    /// API token for the origin provider.
    #[arg(long, default_value = "")]
    pub token: String,

    /// Output serialization format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Reject flag combinations that select entries in conflicting ways.
    pub fn validate(&self) -> Result<()> {
        if self.latest
            && (!self.release.is_empty() || self.last > 0 || self.since_days > 0)
        {
            return Err(ClparseError::invalid_args(
                "--latest cannot be combined with --release, --last, or --since-days",
            ));
        }

        if !self.release.is_empty() && (self.last > 0 || self.since_days > 0) {
            return Err(ClparseError::invalid_args(
                "--release cannot be combined with --last or --since-days",
            ));
        }

        if self.last > 0 && self.since_days > 0 {
            return Err(ClparseError::invalid_args(
                "--last cannot be combined with --since-days",
            ));
        }

        Ok(())
    }
}
