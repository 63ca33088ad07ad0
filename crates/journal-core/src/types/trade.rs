//! Journal trade types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    /// Parse the numeric journal encoding (1 = buy, 2 = sell).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Direction::Buy),
            "2" => Some(Direction::Sell),
            _ => None,
        }
    }

    /// Parse a broker export label. Only `买` and `B` count as buys;
    /// everything else, blanks included, is a sell.
    pub fn from_broker_label(label: &str) -> Self {
        match label.trim() {
            "买" | "B" => Direction::Buy,
            _ => Direction::Sell,
        }
    }

    /// Numeric journal encoding.
    pub fn code(&self) -> u8 {
        match self {
            Direction::Buy => 1,
            Direction::Sell => 2,
        }
    }

    /// Display label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Buy => "买入",
            Direction::Sell => "卖出",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
        }
    }
}

/// A single journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Trade date
    pub date: NaiveDate,
    /// Six-digit instrument code
    pub instrument_id: String,
    /// Buy or sell
    pub direction: Direction,
    /// Execution price, when the journal carries one
    pub price: Option<Decimal>,
}

impl TradeRecord {
    /// Create a new record.
    pub fn new(
        date: NaiveDate,
        instrument_id: impl Into<String>,
        direction: Direction,
        price: Option<Decimal>,
    ) -> Self {
        Self {
            date,
            instrument_id: instrument_id.into(),
            direction,
            price,
        }
    }

    pub fn is_buy(&self) -> bool {
        self.direction == Direction::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.direction == Direction::Sell
    }
}

/// A buy paired with the sell that closed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedTrade {
    pub buy_date: NaiveDate,
    pub sell_date: NaiveDate,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    /// (sell - buy) / buy * 100
    pub profit_pct: Decimal,
    pub is_profit: bool,
}

impl MatchedTrade {
    /// Pair a buy with a sell. A zero buy price, or a percentage too large
    /// to represent, yields a zero percentage.
    pub fn new(
        buy_date: NaiveDate,
        buy_price: Decimal,
        sell_date: NaiveDate,
        sell_price: Decimal,
    ) -> Self {
        let profit_pct = sell_price
            .checked_sub(buy_price)
            .and_then(|diff| diff.checked_div(buy_price))
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .unwrap_or(Decimal::ZERO);

        Self {
            buy_date,
            sell_date,
            buy_price,
            sell_price,
            profit_pct,
            is_profit: profit_pct > Decimal::ZERO,
        }
    }

    /// Number of calendar days the position was held.
    pub fn holding_days(&self) -> i64 {
        (self.sell_date - self.buy_date).num_days()
    }
}

/// Gross profit percentage divided by gross loss percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfitLossRatio {
    Finite(Decimal),
    /// No losing trades
    Infinite,
}

impl ProfitLossRatio {
    pub fn is_infinite(&self) -> bool {
        matches!(self, ProfitLossRatio::Infinite)
    }
}

impl fmt::Display for ProfitLossRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitLossRatio::Finite(ratio) => write!(f, "{:.2}", ratio),
            ProfitLossRatio::Infinite => write!(f, "∞"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_direction_codes() {
        assert_eq!(Direction::from_code("1"), Some(Direction::Buy));
        assert_eq!(Direction::from_code(" 2 "), Some(Direction::Sell));
        assert_eq!(Direction::from_code("3"), None);
        assert_eq!(Direction::from_code(""), None);
        assert_eq!(Direction::Buy.code(), 1);
        assert_eq!(Direction::Sell.code(), 2);
    }

    #[test]
    fn test_broker_labels() {
        assert_eq!(Direction::from_broker_label("买"), Direction::Buy);
        assert_eq!(Direction::from_broker_label(" B "), Direction::Buy);
        assert_eq!(Direction::from_broker_label("卖"), Direction::Sell);
        assert_eq!(Direction::from_broker_label("S"), Direction::Sell);
        assert_eq!(Direction::from_broker_label(""), Direction::Sell);
    }

    #[test]
    fn test_matched_trade_profit() {
        let win = MatchedTrade::new(day(2), dec!(10), day(5), dec!(12));
        assert_eq!(win.profit_pct, dec!(20));
        assert!(win.is_profit);
        assert_eq!(win.holding_days(), 3);

        let loss = MatchedTrade::new(day(6), dec!(11), day(9), dec!(9));
        assert_eq!(loss.profit_pct.round_dp(2), dec!(-18.18));
        assert!(!loss.is_profit);

        let flat = MatchedTrade::new(day(6), dec!(11), day(9), dec!(11));
        assert!(!flat.is_profit);
    }

    #[test]
    fn test_zero_buy_price_is_flat() {
        let trade = MatchedTrade::new(day(1), Decimal::ZERO, day(2), dec!(5));
        assert_eq!(trade.profit_pct, Decimal::ZERO);
        assert!(!trade.is_profit);
    }

    #[test]
    fn test_unrepresentable_percentage_is_flat() {
        // Ratio fits, times 100 does not
        let tiny_buy = Decimal::new(1, 20);
        let trade = MatchedTrade::new(day(1), tiny_buy, day(2), dec!(10000000));
        assert_eq!(trade.profit_pct, Decimal::ZERO);
        assert!(!trade.is_profit);

        // Ratio itself overflows
        let trade = MatchedTrade::new(day(1), Decimal::new(1, 28), day(2), Decimal::MAX);
        assert_eq!(trade.profit_pct, Decimal::ZERO);

        let trade = MatchedTrade::new(day(1), Decimal::MIN, day(2), Decimal::MAX);
        assert_eq!(trade.profit_pct, Decimal::ZERO);
    }

    #[test]
    fn test_ratio_display() {
        assert_eq!(ProfitLossRatio::Finite(dec!(1.5)).to_string(), "1.50");
        assert_eq!(ProfitLossRatio::Infinite.to_string(), "∞");
    }
}
