//! Provider probe command implementation.

use anyhow::{Context, Result};
use chrono::{Duration, Local};
use journal_config::AppConfig;
use tracing::info;

use crate::cli::providers::bar_providers;
use crate::cli::ProbeArgs;

const RULE: &str = "────────────────────────────────────────────────────────────\n";

pub async fn run(args: ProbeArgs, config: &AppConfig) -> Result<()> {
    let providers = bar_providers(&config.quotes).context("Failed to set up quote clients")?;
    let end = Local::now().date_naive();
    let start = end - Duration::days(args.days.max(1));
    info!("Probing {} providers with {} codes", providers.len(), args.codes.len());

    let mut report = String::new();
    let mut successes = 0;
    let mut attempts = 0;
    for code in &args.codes {
        report.push_str(&format!("  {}\n", code));
        for provider in &providers {
            attempts += 1;
            match provider.fetch_bars(code, start, end).await {
                Ok(bars) if !bars.is_empty() => {
                    successes += 1;
                    let last = bars.last().map(|b| b.close).unwrap_or_default();
                    report.push_str(&format!(
                        "    ✓ {:<10} {:>4} bars, last close {:.2}\n",
                        provider.name(),
                        bars.len(),
                        last
                    ));
                }
                Ok(_) => report.push_str(&format!("    ✗ {:<10} no data\n", provider.name())),
                Err(e) => report.push_str(&format!("    ✗ {:<10} {}\n", provider.name(), e)),
            }
        }
    }

    println!("Provider probe {} to {}", start, end);
    print!("{}", RULE);
    print!("{}", report);
    print!("{}", RULE);
    println!("  {}/{} requests returned data", successes, attempts);

    Ok(())
}
