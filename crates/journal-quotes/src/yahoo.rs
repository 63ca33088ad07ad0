//! Yahoo Finance chart API.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate};
use journal_core::error::QuoteError;
use journal_core::traits::QuoteProvider;
use journal_core::types::{Market, PriceBar};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::http::{build_client, get_text, HttpOptions};

pub const DEFAULT_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Yahoo Finance daily history client.
///
/// Yahoo throttles aggressively; throttling surfaces as
/// [`QuoteError::RateLimited`] so the resolver can back off and retry.
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(options: &HttpOptions) -> Result<Self, QuoteError> {
        Ok(Self {
            client: build_client(options)?,
            base_url: DEFAULT_CHART_URL.to_string(),
        })
    }

    pub fn with_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl QuoteProvider for YahooClient {
    async fn fetch_bars(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, QuoteError> {
        let symbol = Market::yahoo_symbol(code);
        let url = format!("{}/{}", self.base_url, symbol);
        let (period1, period2) = period_bounds(start, end);
        debug!("Yahoo chart request for {} ({} - {})", symbol, period1, period2);

        let request = self.client.get(&url).query(&[
            ("period1", period1.to_string()),
            ("period2", period2.to_string()),
            ("interval", "1d".to_string()),
            ("events", "history".to_string()),
        ]);

        let body = get_text(request).await?;
        parse_chart(&body, start, end)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

/// Unix bounds covering `[start, end]`; `period2` is exclusive.
fn period_bounds(start: NaiveDate, end: NaiveDate) -> (i64, i64) {
    let midnight = |d: NaiveDate| {
        d.and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or_default()
    };
    (midnight(start), midnight(end + ChronoDuration::days(1)))
}

/// Parse a chart response into daily bars inside `[start, end]`.
///
/// Bars with any missing price are skipped. A missing volume counts as 0.
pub fn parse_chart(body: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceBar>, QuoteError> {
    let response: ChartResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        // Throttled responses are sometimes plain text.
        Err(e) => {
            return Err(match QuoteError::from_message(body.trim()) {
                rate @ QuoteError::RateLimited(_) => rate,
                _ => QuoteError::Malformed(e.to_string()),
            })
        }
    };

    if let Some(error) = response.chart.error {
        let message = error
            .description
            .or(error.code)
            .unwrap_or_else(|| "unknown chart error".to_string());
        return Err(QuoteError::from_message(message));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };

    let offset = result.meta.map(|m| m.gmtoffset).unwrap_or(0);
    let series = result.indicators.quote.into_iter().next().unwrap_or_default();
    let at = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let Some(date) = DateTime::from_timestamp(ts + offset, 0).map(|dt| dt.date_naive()) else {
            continue;
        };
        let (Some(open), Some(high), Some(low), Some(close)) = (
            at(&series.open, i),
            at(&series.high, i),
            at(&series.low, i),
            at(&series.close, i),
        ) else {
            continue;
        };
        let volume = at(&series.volume, i).unwrap_or(0.0);

        let bar = PriceBar::new(date, open, high, low, close, volume);
        if bar.within(start, end) {
            bars.push(bar);
        }
    }

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2024-01-02 and 2024-01-03 09:30 Asia/Shanghai
    const CHART: &str = r#"{"chart":{"result":[{
        "meta":{"symbol":"600000.SS","gmtoffset":28800},
        "timestamp":[1704159000,1704245400,1704331800],
        "indicators":{"quote":[{
            "open":[6.60,6.58,null],
            "high":[6.62,6.64,6.70],
            "low":[6.55,6.56,6.60],
            "close":[6.58,6.61,6.65],
            "volume":[27000000,null,1]
        }]}
    }],"error":null}}"#;

    #[test]
    fn test_parse_chart() {
        let bars = parse_chart(CHART, day(2024, 1, 1), day(2024, 1, 31)).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, day(2024, 1, 2));
        assert_eq!(bars[0].open, 6.60);
        assert_eq!(bars[0].volume, 27000000.0);
        assert_eq!(bars[1].date, day(2024, 1, 3));
        assert_eq!(bars[1].volume, 0.0);
    }

    #[test]
    fn test_parse_chart_range() {
        let bars = parse_chart(CHART, day(2024, 1, 3), day(2024, 1, 3)).unwrap();
        assert_eq!(bars.len(), 1);
    }

    #[test]
    fn test_parse_chart_errors() {
        let delisted = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(matches!(
            parse_chart(delisted, day(2024, 1, 1), day(2024, 1, 31)),
            Err(QuoteError::Request(_))
        ));

        let throttled = "Too Many Requests\r\n";
        assert!(parse_chart(throttled, day(2024, 1, 1), day(2024, 1, 31))
            .unwrap_err()
            .is_rate_limited());

        let empty = r#"{"chart":{"result":[],"error":null}}"#;
        assert!(parse_chart(empty, day(2024, 1, 1), day(2024, 1, 31)).unwrap().is_empty());
    }

    #[test]
    fn test_period_bounds() {
        let (p1, p2) = period_bounds(day(2024, 1, 1), day(2024, 1, 1));
        assert_eq!(p1, 1704067200);
        assert_eq!(p2 - p1, 86_400);
    }
}
