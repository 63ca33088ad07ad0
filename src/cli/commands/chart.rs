//! Chart command implementation.

use anyhow::{bail, Context, Result};
use chrono::Duration;
use journal_analysis::{evaluate, performance_summary};
use journal_config::AppConfig;
use journal_data::{load_journal, TransactionBook};
use journal_quotes::{PriceResolver, StockDirectory};
use journal_report::{ChartPage, ChartSize};
use std::path::Path;
use tracing::{info, warn};

use crate::cli::providers::{price_resolver, stock_directory};
use crate::cli::ChartArgs;

pub async fn run(args: ChartArgs, config: &AppConfig) -> Result<()> {
    let book = load_journal(&args.journal)
        .with_context(|| format!("Failed to load journal {}", args.journal.display()))?;

    let codes = if args.codes.is_empty() {
        book.instruments()
    } else {
        args.codes.iter().map(|c| pad_code(c)).collect()
    };

    let resolver = price_resolver(&config.quotes).context("Failed to set up quote clients")?;
    let mut directory = stock_directory(&config.quotes).context("Failed to set up quote clients")?;
    let output_dir = args.output_dir.as_deref().unwrap_or(&config.chart.output_dir);

    let mut written = 0;
    for code in &codes {
        if book.for_instrument(code).is_empty() {
            warn!("No journal entries for {}", code);
            continue;
        }
        chart_one(&book, code, &resolver, &mut directory, config, output_dir).await?;
        written += 1;
    }

    if written == 0 {
        bail!("No chart pages written; none of the requested codes appear in the journal");
    }
    println!("Wrote {} chart page(s) to {}", written, output_dir.display());

    Ok(())
}

async fn chart_one(
    book: &TransactionBook,
    code: &str,
    resolver: &PriceResolver,
    directory: &mut StockDirectory,
    config: &AppConfig,
    output_dir: &Path,
) -> Result<()> {
    let trades = book.for_instrument(code);
    // for_instrument is date-ordered and non-empty here
    let (first, last) = match (trades.first(), trades.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => return Ok(()),
    };
    let padding = Duration::days(config.chart.padding_days);
    let start = first - padding;
    let end = last + padding;
    info!("Charting {} from {} to {}", code, start, end);

    let resolved = resolver.resolve(code, start, end).await;
    if resolved.is_none() {
        warn!("No price data for {}, writing statistics only", code);
    }
    let info = directory.lookup(code).await;
    let performance = evaluate(book, code);

    let page = ChartPage {
        code,
        info: &info,
        trades: &trades,
        bars: resolved.as_ref().map(|r| r.bars.as_slice()).unwrap_or_default(),
        source: resolved.as_ref().map(|r| r.source.as_str()),
        performance: performance.as_ref(),
        size: ChartSize {
            width: config.chart.width,
            height: config.chart.height,
        },
    };
    let path = output_dir.join(format!("{}.html", code));
    page.write(&path)
        .with_context(|| format!("Failed to write chart page {}", path.display()))?;

    match &performance {
        Some(performance) => println!("{}", performance_summary(&info, performance)),
        None => {
            let buys = trades.iter().filter(|t| t.is_buy()).count();
            println!(
                "{} {}: {} trades ({} buys, {} sells), no priced round trips",
                code,
                info.name,
                trades.len(),
                buys,
                trades.len() - buys
            );
        }
    }

    Ok(())
}

/// Journal codes are six digits; accept `1` for `000001`.
fn pad_code(raw: &str) -> String {
    let code = raw.trim();
    if !code.is_empty() && code.len() < 6 && code.chars().all(|c| c.is_ascii_digit()) {
        format!("{:0>6}", code)
    } else {
        code.to_string()
    }
}
