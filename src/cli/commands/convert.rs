//! Convert command implementation.

use anyhow::{Context, Result};
use journal_config::AppConfig;
use journal_data::convert_file;
use tracing::info;

use crate::cli::ConvertArgs;

pub async fn run(args: ConvertArgs, config: &AppConfig) -> Result<()> {
    info!("Converting broker export {}", args.input.display());

    let summary = convert_file(&args.input, &args.output, &config.convert)
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    println!("Converted {}", args.input.display());
    println!("  Rows read:    {}", summary.rows_read);
    println!("  Rows written: {}", summary.rows_written);
    println!("  Rows dropped: {}", summary.rows_dropped());
    println!("Journal saved to {}", args.output.display());

    Ok(())
}
