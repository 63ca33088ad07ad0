//! Quote and stock metadata providers.
//!
//! Three daily-bar sources are available: Eastmoney (full adjusted
//! history), Tencent (today's snapshot only) and Yahoo Finance (history,
//! heavily throttled). [`PriceResolver`] chains them, [`StockDirectory`]
//! does the same for stock names.

mod directory;
mod eastmoney;
mod http;
mod resolver;
mod tencent;
mod yahoo;

pub use directory::StockDirectory;
pub use eastmoney::{parse_info, parse_klines, EastmoneyClient};
pub use http::{HttpOptions, DEFAULT_USER_AGENT};
pub use resolver::{PriceResolver, ResolvedBars, RetryPolicy};
pub use tencent::{parse_snapshot, snapshot_bar, TencentClient};
pub use yahoo::{parse_chart, YahooClient};

pub use eastmoney::{
    DEFAULT_INFO_URL as EASTMONEY_INFO_URL, DEFAULT_KLINE_URL as EASTMONEY_KLINE_URL,
    REFERER as EASTMONEY_REFERER,
};
pub use tencent::DEFAULT_QUOTE_URL as TENCENT_QUOTE_URL;
pub use yahoo::DEFAULT_CHART_URL as YAHOO_CHART_URL;
