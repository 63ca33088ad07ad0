//! Per-instrument journal overview.

use chrono::NaiveDate;
use journal_core::types::{Direction, StockInfo};
use journal_data::TransactionBook;
use serde::{Deserialize, Serialize};

use crate::statistics::{evaluate, evaluate_all, TradeStats};

/// One line of the overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSummary {
    pub code: String,
    pub name: String,
    pub sector: String,
    pub total_trades: usize,
    pub buy_count: usize,
    pub sell_count: usize,
    pub first_trade: Option<NaiveDate>,
    pub last_trade: Option<NaiveDate>,
    /// Absent when nothing could be matched
    pub stats: Option<TradeStats>,
}

impl InstrumentSummary {
    /// Summarize one instrument of the book.
    pub fn build(book: &TransactionBook, code: &str, info: &StockInfo) -> Self {
        let history = book.for_instrument(code);
        let count = |direction: Direction| history.iter().filter(|r| r.direction == direction).count();

        Self {
            code: code.to_string(),
            name: info.name.clone(),
            sector: info.sector.clone(),
            total_trades: history.len(),
            buy_count: count(Direction::Buy),
            sell_count: count(Direction::Sell),
            first_trade: history.first().map(|r| r.date),
            last_trade: history.last().map(|r| r.date),
            stats: evaluate(book, code).map(|p| p.stats),
        }
    }
}

/// Overview of a whole journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalOverview {
    pub instruments: Vec<InstrumentSummary>,
    /// Across all instruments
    pub overall: Option<TradeStats>,
    pub first_trade: Option<NaiveDate>,
    pub last_trade: Option<NaiveDate>,
    pub total_records: usize,
}

impl JournalOverview {
    /// Build from a book and already resolved stock info, given in
    /// `book.instruments()` order.
    pub fn build(book: &TransactionBook, infos: &[(String, StockInfo)]) -> Self {
        let instruments = infos
            .iter()
            .map(|(code, info)| InstrumentSummary::build(book, code, info))
            .collect();
        let range = book.date_range();

        Self {
            instruments,
            overall: evaluate_all(book),
            first_trade: range.map(|(first, _)| first),
            last_trade: range.map(|(_, last)| last),
            total_records: book.len(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_overview() {
        let book = TransactionBook::parse(
            "20240301,000001,1,10\n20240302,000001,2,12\n20240305,000001,1,11\n20240310,600000,1\n",
        )
        .unwrap();
        let infos = vec![
            ("000001".to_string(), StockInfo::named("平安银行")),
            ("600000".to_string(), StockInfo::placeholder("600000")),
        ];
        let overview = JournalOverview::build(&book, &infos);

        assert_eq!(overview.total_records, 4);
        assert_eq!(overview.instruments.len(), 2);

        let first = &overview.instruments[0];
        assert_eq!(first.name, "平安银行");
        assert_eq!(first.total_trades, 3);
        assert_eq!(first.buy_count, 2);
        assert_eq!(first.sell_count, 1);
        assert_eq!(first.last_trade, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(first.stats.as_ref().unwrap().win_rate_pct, dec!(100));

        assert!(overview.instruments[1].stats.is_none());
        assert_eq!(overview.overall.as_ref().unwrap().total_trades, 1);
        assert_eq!(overview.last_trade, NaiveDate::from_ymd_opt(2024, 3, 10));

        let json = overview.to_json().unwrap();
        assert!(json.contains("\"code\": \"000001\""));
    }
}
