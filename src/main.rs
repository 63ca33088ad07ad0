//! Trade journal CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use journal_config::load_or_default;
use journal_monitor::setup_logging;
use tracing::{debug, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::ValidateConfig = cli.command {
        return cli::commands::validate::run(&cli.config).await;
    }

    let config = load_or_default(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Setup logging; the guard flushes the log file on exit
    let level = cli
        .log_level
        .as_ref()
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let json = cli.json_logs || config.logging.is_json();
    let _guard = setup_logging(&level, json, config.logging.file.as_deref());

    if cli.config.exists() {
        debug!("Loaded configuration from {}", cli.config.display());
    } else {
        warn!("Config file {} not found, using defaults", cli.config.display());
    }

    // Execute command
    match cli.command {
        Commands::Convert(args) => cli::commands::convert::run(args, &config).await,
        Commands::Overview(args) => cli::commands::overview::run(args, &config).await,
        Commands::Chart(args) => cli::commands::chart::run(args, &config).await,
        Commands::Report(args) => cli::commands::report::run(args, &config).await,
        Commands::Probe(args) => cli::commands::probe::run(args, &config).await,
        Commands::ValidateConfig => Ok(()),
    }
}
