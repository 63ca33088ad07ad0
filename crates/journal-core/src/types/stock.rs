//! Stock metadata and exchange code mapping.

use serde::{Deserialize, Serialize};

/// Sector label used when no provider knows better.
pub const UNKNOWN_SECTOR: &str = "未知板块";
/// Industry label used when no provider knows better.
pub const UNKNOWN_INDUSTRY: &str = "未知行业";

/// Listing exchange, inferred from the leading digit of an A-share code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    /// Codes starting with 6
    Shanghai,
    /// Codes starting with 0 or 3
    Shenzhen,
    /// Anything else is passed through unchanged
    Other,
}

impl Market {
    pub fn from_code(code: &str) -> Self {
        match code.chars().next() {
            Some('6') => Market::Shanghai,
            Some('0') | Some('3') => Market::Shenzhen,
            _ => Market::Other,
        }
    }

    /// Eastmoney `secid`, e.g. `1.600000` or `0.000001`.
    pub fn eastmoney_secid(code: &str) -> String {
        match Self::from_code(code) {
            Market::Shanghai => format!("1.{}", code),
            Market::Shenzhen => format!("0.{}", code),
            Market::Other => code.to_string(),
        }
    }

    /// Tencent quote symbol, e.g. `sh600000` or `sz000001`.
    pub fn tencent_symbol(code: &str) -> String {
        match Self::from_code(code) {
            Market::Shanghai => format!("sh{}", code),
            Market::Shenzhen => format!("sz{}", code),
            Market::Other => code.to_string(),
        }
    }

    /// Yahoo Finance ticker, e.g. `600000.SS` or `000001.SZ`.
    pub fn yahoo_symbol(code: &str) -> String {
        match Self::from_code(code) {
            Market::Shanghai => format!("{}.SS", code),
            Market::Shenzhen => format!("{}.SZ", code),
            Market::Other => code.to_string(),
        }
    }
}

/// Display metadata for an instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    pub name: String,
    pub sector: String,
    pub industry: String,
}

impl StockInfo {
    /// Info with a known name and unknown classification.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sector: UNKNOWN_SECTOR.to_string(),
            industry: UNKNOWN_INDUSTRY.to_string(),
        }
    }

    /// Fallback used when every provider fails.
    pub fn placeholder(code: &str) -> Self {
        Self::named(format!("股票{}", code))
    }
}
