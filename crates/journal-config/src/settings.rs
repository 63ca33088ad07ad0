//! Configuration structures.

use journal_data::ColumnLayout;
use journal_quotes::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub quotes: QuoteSettings,
    #[serde(default)]
    pub convert: ColumnLayout,
    #[serde(default)]
    pub chart: ChartSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "trade-journal".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// One HTTP endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointSettings {
    pub url: String,
    pub timeout_secs: u64,
}

/// Quote provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteSettings {
    pub user_agent: String,
    pub eastmoney_kline: EndpointSettings,
    pub eastmoney_info: EndpointSettings,
    pub tencent: EndpointSettings,
    pub yahoo: EndpointSettings,
    /// Back-off for Yahoo throttling
    pub retry: RetryPolicy,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            user_agent: journal_quotes::DEFAULT_USER_AGENT.to_string(),
            eastmoney_kline: EndpointSettings {
                url: journal_quotes::EASTMONEY_KLINE_URL.to_string(),
                timeout_secs: 15,
            },
            eastmoney_info: EndpointSettings {
                url: journal_quotes::EASTMONEY_INFO_URL.to_string(),
                timeout_secs: 10,
            },
            tencent: EndpointSettings {
                url: journal_quotes::TENCENT_QUOTE_URL.to_string(),
                timeout_secs: 10,
            },
            yahoo: EndpointSettings {
                url: journal_quotes::YAHOO_CHART_URL.to_string(),
                timeout_secs: 15,
            },
            retry: RetryPolicy::default(),
        }
    }
}

/// Chart page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Days of price history shown before the first and after the last trade
    pub padding_days: i64,
    pub width: f64,
    pub height: f64,
    pub output_dir: PathBuf,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            padding_days: 30,
            width: 1200.0,
            height: 800.0,
            output_dir: PathBuf::from("charts"),
        }
    }
}

/// Profit/loss report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub output: PathBuf,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from("stock_trades.html"),
        }
    }
}
