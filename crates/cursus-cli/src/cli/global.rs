use std::path::PathBuf;

use clap::ValueEnum;

/// Shared output mode across all commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Raw,
}

impl OutputFormat {
    /// Parse a configured `general.default_format` value.
    pub fn from_config(value: &str) -> anyhow::Result<Self> {
        <Self as ValueEnum>::from_str(value, true)
            .map_err(|error| anyhow::anyhow!("invalid general.default_format '{value}': {error}"))
    }
}

/// Global flags resolved against configuration, passed to every handler.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    /// Snapshot file to analyse instead of the term store.
    pub snapshot: Option<PathBuf>,
    /// Stored term to analyse; `--term` wins over `general.default_term`.
    pub term: Option<String>,
}
