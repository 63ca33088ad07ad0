//! Eastmoney quote and stock info endpoints.
//!
//! The kline endpoint serves forward-adjusted daily bars for the whole
//! listing history; the range filter is applied locally.

use async_trait::async_trait;
use chrono::NaiveDate;
use journal_core::error::QuoteError;
use journal_core::traits::{QuoteProvider, StockInfoProvider};
use journal_core::types::{Market, PriceBar, StockInfo, UNKNOWN_INDUSTRY, UNKNOWN_SECTOR};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::http::{build_client, get_text, HttpOptions};

pub const DEFAULT_KLINE_URL: &str = "http://push2his.eastmoney.com/api/qt/stock/kline/get";
pub const DEFAULT_INFO_URL: &str = "http://push2.eastmoney.com/api/qt/stock/get";
pub const REFERER: &str = "http://quote.eastmoney.com/";

/// Public web token the quote pages send with every request.
const UT: &str = "fa5fd1943c7b386f172d6893dbfba10b";

#[derive(Debug, Deserialize)]
struct KlineResponse {
    data: Option<KlineData>,
}

#[derive(Debug, Deserialize)]
struct KlineData {
    klines: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct InfoResponse {
    data: Option<InfoData>,
}

#[derive(Debug, Deserialize)]
struct InfoData {
    f14: Option<Value>,
    f58: Option<Value>,
    f116: Option<Value>,
    f127: Option<Value>,
}

/// Eastmoney client. Serves both daily bars and stock metadata.
pub struct EastmoneyClient {
    client: Client,
    kline_url: String,
    info_url: String,
}

impl EastmoneyClient {
    pub fn new(options: &HttpOptions) -> Result<Self, QuoteError> {
        Ok(Self {
            client: build_client(options)?,
            kline_url: DEFAULT_KLINE_URL.to_string(),
            info_url: DEFAULT_INFO_URL.to_string(),
        })
    }

    pub fn with_urls(mut self, kline_url: impl Into<String>, info_url: impl Into<String>) -> Self {
        self.kline_url = kline_url.into();
        self.info_url = info_url.into();
        self
    }
}

#[async_trait]
impl QuoteProvider for EastmoneyClient {
    async fn fetch_bars(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, QuoteError> {
        let secid = Market::eastmoney_secid(code);
        debug!("Eastmoney kline request for {}", secid);

        let request = self.client.get(&self.kline_url).query(&[
            ("secid", secid.as_str()),
            ("ut", UT),
            ("fields1", "f1,f2,f3,f4,f5,f6"),
            ("fields2", "f51,f52,f53,f54,f55,f56,f57,f58,f59,f60,f61"),
            ("klt", "101"),
            ("fqt", "1"),
            ("beg", "0"),
            ("end", "20500000"),
        ]);

        let body = get_text(request).await?;
        parse_klines(&body, start, end)
    }

    fn name(&self) -> &str {
        "eastmoney"
    }
}

#[async_trait]
impl StockInfoProvider for EastmoneyClient {
    async fn fetch_info(&self, code: &str) -> Result<Option<StockInfo>, QuoteError> {
        let secid = Market::eastmoney_secid(code);
        let request = self.client.get(&self.info_url).query(&[
            ("ut", UT),
            ("invt", "2"),
            ("fltt", "2"),
            ("fields", "f12,f14,f58,f127,f116"),
            ("secid", secid.as_str()),
        ]);

        let body = get_text(request).await?;
        parse_info(&body)
    }

    fn name(&self) -> &str {
        "eastmoney"
    }
}

/// Parse a kline response, keeping bars inside `[start, end]`.
///
/// Each kline is `date,open,close,high,low,volume,...`. Lines that do not
/// parse are skipped. An empty kline list is a valid "no data" answer.
pub fn parse_klines(body: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceBar>, QuoteError> {
    let response: KlineResponse =
        serde_json::from_str(body).map_err(|e| QuoteError::Malformed(e.to_string()))?;

    let klines = response
        .data
        .and_then(|d| d.klines)
        .ok_or_else(|| QuoteError::Malformed("response has no data.klines".into()))?;

    if klines.is_empty() {
        return Ok(Vec::new());
    }

    let bars: Vec<PriceBar> = klines.iter().filter_map(|line| parse_kline(line)).collect();
    if bars.is_empty() {
        return Err(QuoteError::Malformed(format!(
            "none of {} kline rows could be parsed",
            klines.len()
        )));
    }

    Ok(bars.into_iter().filter(|b| b.within(start, end)).collect())
}

fn parse_kline(line: &str) -> Option<PriceBar> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() < 6 {
        return None;
    }

    let date = NaiveDate::parse_from_str(parts[0], "%Y-%m-%d").ok()?;
    let open = parts[1].parse().ok()?;
    let close = parts[2].parse().ok()?;
    let high = parts[3].parse().ok()?;
    let low = parts[4].parse().ok()?;
    let volume = parts[5].parse().ok()?;

    Some(PriceBar::new(date, open, high, low, close, volume))
}

/// Parse a stock info response. `None` when no name is present.
pub fn parse_info(body: &str) -> Result<Option<StockInfo>, QuoteError> {
    let response: InfoResponse =
        serde_json::from_str(body).map_err(|e| QuoteError::Malformed(e.to_string()))?;

    let Some(data) = response.data else {
        return Ok(None);
    };

    let name = data
        .f14
        .as_ref()
        .and_then(value_text)
        .or_else(|| data.f58.as_ref().and_then(value_text));

    Ok(name.map(|name| StockInfo {
        name,
        sector: data
            .f127
            .as_ref()
            .and_then(value_text)
            .unwrap_or_else(|| UNKNOWN_SECTOR.to_string()),
        industry: data
            .f116
            .as_ref()
            .and_then(value_text)
            .unwrap_or_else(|| UNKNOWN_INDUSTRY.to_string()),
    }))
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const KLINES: &str = r#"{"rc":0,"data":{"code":"000001","market":0,"name":"平安银行","klines":[
        "2024-01-02,9.39,9.21,9.42,9.21,1158366,1075742252.51,2.35,-1.92,-0.18,0.60",
        "2024-01-03,9.19,9.20,9.22,9.15,733610,673673613.00,0.76,-0.11,-0.01,0.38",
        "garbage",
        "2024-01-04,9.19,x,9.19,9.08,864193,787685006.33,1.20,-1.09,-0.10,0.45",
        "2024-01-05,9.17,9.27,9.43,9.16,1186965,1103830012.56,2.95,0.76,0.07,0.61"
    ]}}"#;

    #[test]
    fn test_parse_klines_field_order() {
        let bars = parse_klines(KLINES, day(2024, 1, 1), day(2024, 12, 31)).unwrap();

        assert_eq!(bars.len(), 3);
        let first = bars[0];
        assert_eq!(first.date, day(2024, 1, 2));
        assert_eq!(first.open, 9.39);
        assert_eq!(first.close, 9.21);
        assert_eq!(first.high, 9.42);
        assert_eq!(first.low, 9.21);
        assert_eq!(first.volume, 1158366.0);
    }

    #[test]
    fn test_parse_klines_filters_range() {
        let bars = parse_klines(KLINES, day(2024, 1, 3), day(2024, 1, 4)).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, day(2024, 1, 3));
    }

    #[test]
    fn test_parse_klines_empty_and_missing() {
        let empty = r#"{"data":{"klines":[]}}"#;
        assert!(parse_klines(empty, day(2024, 1, 1), day(2024, 2, 1)).unwrap().is_empty());

        let missing = r#"{"rc":0,"data":null}"#;
        assert!(matches!(
            parse_klines(missing, day(2024, 1, 1), day(2024, 2, 1)),
            Err(QuoteError::Malformed(_))
        ));

        let junk = r#"{"data":{"klines":["bad","rows"]}}"#;
        assert!(parse_klines(junk, day(2024, 1, 1), day(2024, 2, 1)).is_err());

        assert!(parse_klines("<html>", day(2024, 1, 1), day(2024, 2, 1)).is_err());
    }

    #[test]
    fn test_parse_info() {
        let body = r#"{"data":{"f12":"000001","f14":"平安银行","f58":"平安银行","f116":209505877508.0,"f127":"银行"}}"#;
        let info = parse_info(body).unwrap().unwrap();
        assert_eq!(info.name, "平安银行");
        assert_eq!(info.sector, "银行");
        assert_eq!(info.industry, "209505877508.0");

        let fallback = r#"{"data":{"f14":"","f58":"浦发银行"}}"#;
        let info = parse_info(fallback).unwrap().unwrap();
        assert_eq!(info.name, "浦发银行");
        assert_eq!(info.sector, UNKNOWN_SECTOR);
        assert_eq!(info.industry, UNKNOWN_INDUSTRY);

        assert_eq!(parse_info(r#"{"data":null}"#).unwrap(), None);
        assert_eq!(parse_info(r#"{"data":{"f14":"-"}}"#).unwrap().unwrap().name, "-");
    }
}
