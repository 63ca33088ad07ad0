//! Overview command implementation.

use anyhow::{Context, Result};
use journal_analysis::JournalOverview;
use journal_config::AppConfig;
use journal_data::load_journal;
use tracing::info;

use crate::cli::providers::stock_directory;
use crate::cli::OverviewArgs;

pub async fn run(args: OverviewArgs, config: &AppConfig) -> Result<()> {
    let book = load_journal(&args.journal)
        .with_context(|| format!("Failed to load journal {}", args.journal.display()))?;
    let codes = book.instruments();
    info!("Loaded {} records for {} instruments", book.len(), codes.len());

    let mut directory = stock_directory(&config.quotes).context("Failed to set up quote clients")?;
    let mut infos = Vec::with_capacity(codes.len());
    for code in codes {
        let info = directory.lookup(&code).await;
        infos.push((code, info));
    }

    let overview = JournalOverview::build(&book, &infos);
    if args.json {
        println!("{}", overview.to_json()?);
    } else {
        println!("{}", overview.summary());
    }

    Ok(())
}
