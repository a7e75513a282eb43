use std::path::PathBuf;

use clap::Parser;
use cursus_config::CursusConfig;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `cursus` binary.
#[derive(Debug, Parser)]
#[command(
    name = "cursus",
    version,
    about = "Cursus - coverage ordering and cancellation impact for term plans"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw (defaults to general.default_format)
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read the term from a JSON snapshot file instead of the store
    #[arg(short, long, global = true, conflicts_with = "term")]
    pub snapshot: Option<PathBuf>,

    /// Stored term id (defaults to general.default_term)
    #[arg(short, long, global = true)]
    pub term: Option<String>,

    /// Term store path (overrides database.path)
    #[arg(long, global = true)]
    pub db: Option<String>,
}

impl Cli {
    /// Merge parsed flags with configured defaults for command handlers.
    pub fn global_flags(&self, config: &CursusConfig) -> anyhow::Result<GlobalFlags> {
        let format = match self.format {
            Some(format) => format,
            None => OutputFormat::from_config(&config.general.default_format)?,
        };
        Ok(GlobalFlags {
            format,
            snapshot: self.snapshot.clone(),
            term: self
                .term
                .clone()
                .or_else(|| config.general.default_term.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use cursus_config::CursusConfig;

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "cursus",
            "--format",
            "table",
            "--snapshot",
            "term.json",
            "--verbose",
            "validate",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, Some(OutputFormat::Table));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Validate(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["cursus", "whatif", "ses-1", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, Some(OutputFormat::Raw));
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Whatif(_)));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["cursus", "--format", "xml", "validate"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn snapshot_and_term_are_mutually_exclusive() {
        let parsed = Cli::try_parse_from([
            "cursus",
            "--snapshot",
            "term.json",
            "--term",
            "trm-1",
            "validate",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn configured_defaults_fill_missing_flags() {
        let mut config = CursusConfig::default();
        config.general.default_format = "table".to_string();
        config.general.default_term = Some("trm-fall".to_string());

        let cli = Cli::try_parse_from(["cursus", "matrix"]).expect("cli should parse");
        let flags = cli.global_flags(&config).expect("flags should resolve");
        assert_eq!(flags.format, OutputFormat::Table);
        assert_eq!(flags.term.as_deref(), Some("trm-fall"));

        let cli = Cli::try_parse_from(["cursus", "--term", "trm-spring", "-f", "json", "matrix"])
            .expect("cli should parse");
        let flags = cli.global_flags(&config).expect("flags should resolve");
        assert_eq!(flags.format, OutputFormat::Json);
        assert_eq!(flags.term.as_deref(), Some("trm-spring"));
    }
}
