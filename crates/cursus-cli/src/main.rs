#![allow(clippy::unused_async)]

use anyhow::Context;
use clap::Parser;
use cursus_config::CursusConfig;

mod cli;
mod commands;
mod context;
mod output;
mod planner;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("cursus error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let mut config =
        CursusConfig::load_with_dotenv().context("failed to load cursus configuration")?;
    if let Some(path) = &cli.db {
        config.database.path.clone_from(path);
    }

    let flags = cli.global_flags(&config)?;
    let mut ctx = context::AppContext::new(config);

    tracing::debug!(command = cli.command.name(), "dispatching command");
    commands::dispatch::dispatch(cli.command, &mut ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("CURSUS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
