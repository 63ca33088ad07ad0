//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar as returned by the quote providers.
/// Uses f64 since bars only feed charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading day
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl PriceBar {
    /// Create a new bar.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Close at or above open. Drawn red on Chinese-market charts.
    #[inline]
    pub fn is_rising(&self) -> bool {
        self.close >= self.open
    }

    /// Whether `date` falls inside `[start, end]`.
    #[inline]
    pub fn within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.date >= start && self.date <= end
    }
}

/// Index of the first bar dated on or after `date`.
pub fn first_on_or_after(bars: &[PriceBar], date: NaiveDate) -> Option<usize> {
    bars.iter().position(|b| b.date >= date)
}
