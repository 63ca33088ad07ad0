//! Profit/loss report command implementation.

use anyhow::{Context, Result};
use chrono::Local;
use journal_analysis::collapse_positions;
use journal_config::AppConfig;
use journal_data::PositionSheet;
use journal_report::write_pl_report;
use tracing::info;

use crate::cli::ReportArgs;

pub async fn run(args: ReportArgs, config: &AppConfig) -> Result<()> {
    let sheet = PositionSheet::load(&args.sheet)
        .with_context(|| format!("Failed to read position sheet {}", args.sheet.display()))?;
    info!("Read {} position rows", sheet.rows().len());

    let trades = collapse_positions(sheet.rows()).context("Failed to build closed trades")?;
    let output = args.output.unwrap_or_else(|| config.report.output.clone());
    write_pl_report(&trades, &output, Local::now().naive_local())
        .with_context(|| format!("Failed to write report {}", output.display()))?;

    let winners = trades.iter().filter(|t| t.is_profit()).count();
    println!("Closed trades: {} ({} profitable)", trades.len(), winners);
    println!("Report saved to {}", output.display());

    Ok(())
}
