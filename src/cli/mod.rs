//! CLI definitions.

pub mod commands;
pub mod providers;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trade-journal")]
#[command(author, version, about = "Personal stock trade journal and reporting")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides the configured one)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a broker export into a trade journal
    Convert(ConvertArgs),
    /// Summarize every instrument in a journal
    Overview(OverviewArgs),
    /// Write candlestick chart pages with trade markers
    Chart(ChartArgs),
    /// Build the profit/loss report from a closed-position sheet
    Report(ReportArgs),
    /// Check which quote providers answer
    Probe(ProbeArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct ConvertArgs {
    /// Broker export (CSV)
    pub input: PathBuf,

    /// Journal to write
    #[arg(short, long, default_value = "trades.csv")]
    pub output: PathBuf,
}

#[derive(clap::Args)]
pub struct OverviewArgs {
    /// Trade journal (CSV)
    pub journal: PathBuf,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct ChartArgs {
    /// Trade journal (CSV)
    pub journal: PathBuf,

    /// Instrument codes (comma-separated); all instruments when omitted
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub codes: Vec<String>,

    /// Output directory (defaults to chart.output_dir)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ReportArgs {
    /// Closed-position sheet (CSV export)
    pub sheet: PathBuf,

    /// Report to write (defaults to report.output)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ProbeArgs {
    /// Instrument codes to try (comma-separated)
    #[arg(
        short = 'S',
        long,
        value_delimiter = ',',
        default_value = "000001,600000,300001"
    )]
    pub codes: Vec<String>,

    /// Days of history to request
    #[arg(long, default_value = "30")]
    pub days: i64,
}
