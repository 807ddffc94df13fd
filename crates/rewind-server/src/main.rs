//! Rewind - main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use rewind_common::init_logging;
use rewind_config::{Config, ConfigLoader};
use rewind_engine::{Analyzer, ViewMode};
use rewind_server::{serve, HistoryLoader};
use std::path::PathBuf;
use tracing::info;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "REWIND_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Log level, overriding the configured one
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server (the default)
    Serve,
    /// Compute one view from the shards and print it as JSON
    Report {
        /// View selector, e.g. `monthlyTrends` or `time-of-day`
        mode: ViewMode,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_logging(&config.logging)?;
    info!("Configuration loaded successfully");

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await?,
        Command::Report { mode, pretty } => report(&config, mode, pretty).await?,
    }

    Ok(())
}

async fn report(config: &Config, mode: ViewMode, pretty: bool) -> Result<()> {
    let events = HistoryLoader::from_config(&config.data).load_events().await?;
    let analyzer = Analyzer::new(config.analysis.clone())?;
    let report = analyzer.report(mode, &events);

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}
