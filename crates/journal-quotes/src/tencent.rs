//! Tencent real-time quote endpoint.
//!
//! Only a snapshot is available here, so the "history" is a single bar
//! dated today. It is enough to place trade markers when the other sources
//! are down.

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use journal_core::error::QuoteError;
use journal_core::traits::{QuoteProvider, StockInfoProvider};
use journal_core::types::{Market, PriceBar, StockInfo};
use reqwest::Client;
use tracing::debug;

use crate::http::{build_client, get_text, HttpOptions};

pub const DEFAULT_QUOTE_URL: &str = "http://qt.gtimg.cn/q=";

/// Tencent snapshot client.
pub struct TencentClient {
    client: Client,
    base_url: String,
}

impl TencentClient {
    pub fn new(options: &HttpOptions) -> Result<Self, QuoteError> {
        Ok(Self {
            client: build_client(options)?,
            base_url: DEFAULT_QUOTE_URL.to_string(),
        })
    }

    pub fn with_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn snapshot(&self, code: &str) -> Result<String, QuoteError> {
        let url = format!("{}{}", self.base_url, Market::tencent_symbol(code));
        debug!("Tencent quote request: {}", url);
        get_text(self.client.get(&url)).await
    }
}

#[async_trait]
impl QuoteProvider for TencentClient {
    async fn fetch_bars(
        &self,
        code: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<PriceBar>, QuoteError> {
        let body = self.snapshot(code).await?;
        let today = Local::now().date_naive();
        Ok(snapshot_bar(&body, today)?.into_iter().collect())
    }

    fn name(&self) -> &str {
        "tencent"
    }
}

#[async_trait]
impl StockInfoProvider for TencentClient {
    async fn fetch_info(&self, code: &str) -> Result<Option<StockInfo>, QuoteError> {
        let body = self.snapshot(code).await?;
        let fields = parse_snapshot(&body)?;
        Ok(fields
            .get(1)
            .filter(|name| !name.is_empty())
            .map(|name| StockInfo::named(*name)))
    }

    fn name(&self) -> &str {
        "tencent"
    }
}

/// Split a `v_sz000001="1~平安银行~000001~10.50~10.40~..."` payload into
/// its `~`-separated fields.
pub fn parse_snapshot(body: &str) -> Result<Vec<&str>, QuoteError> {
    let content = body.trim();
    if !content.contains('~') {
        return Err(QuoteError::Malformed("quote payload has no fields".into()));
    }

    let data = content
        .split("=\"")
        .nth(1)
        .ok_or_else(|| QuoteError::Malformed("quote payload has no value".into()))?
        .trim_end_matches(['"', ';']);

    Ok(data.split('~').collect())
}

/// Build the single bar for `today` from a snapshot. `None` when the
/// payload is too short to carry prices.
///
/// Field 3 is the current price and field 4 the previous close; the bar
/// opens at the previous close and is flat at the current price.
pub fn snapshot_bar(body: &str, today: NaiveDate) -> Result<Option<PriceBar>, QuoteError> {
    let fields = parse_snapshot(body)?;
    if fields.len() < 6 {
        return Ok(None);
    }

    let current = price_field(fields[3])?.unwrap_or(0.0);
    let prev_close = price_field(fields[4])?.unwrap_or(current);

    Ok(Some(PriceBar::new(today, prev_close, current, current, current, 0.0)))
}

fn price_field(raw: &str) -> Result<Option<f64>, QuoteError> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| QuoteError::Malformed(format!("bad price field '{}'", raw)))
}
