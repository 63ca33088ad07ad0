//! Closed-position types for the profit/loss report.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a broker position sheet.
///
/// A closed position spans several rows sharing `name` and `open_date`,
/// one per settlement day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRow {
    /// Instrument name
    pub name: String,
    /// Settlement date of this row
    pub record_date: NaiveDate,
    /// Date the position was opened
    pub open_date: NaiveDate,
    /// Average open price (or the best substitute column)
    pub price: Decimal,
    /// Share count
    pub quantity: u64,
    /// Cumulative profit amount reported on this row
    pub profit: Option<Decimal>,
}

/// A fully closed position, one line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub name: String,
    pub buy_date: NaiveDate,
    pub buy_price: Decimal,
    pub sell_date: NaiveDate,
    pub sell_price: Decimal,
    pub quantity: u64,
    pub profit_amount: Decimal,
    pub profit_pct: Decimal,
}

impl ClosedTrade {
    /// Money put into the position.
    pub fn cost(&self) -> Decimal {
        self.buy_price * Decimal::from(self.quantity)
    }

    pub fn is_profit(&self) -> bool {
        self.profit_amount > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_closed_trade_cost() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let trade = ClosedTrade {
            name: "平安银行".to_string(),
            buy_date: date,
            buy_price: dec!(10.5),
            sell_date: date,
            sell_price: dec!(11),
            quantity: 200,
            profit_amount: dec!(100),
            profit_pct: dec!(4.76),
        };

        assert_eq!(trade.cost(), dec!(2100));
        assert!(trade.is_profit());
    }
}
