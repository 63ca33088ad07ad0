//! Performance statistics over matched trades.

use journal_core::types::{MatchedTrade, ProfitLossRatio};
use journal_data::TransactionBook;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::matcher::match_fifo;

/// Aggregate statistics for a set of matched trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeStats {
    /// Number of matched trades
    pub total_trades: usize,
    /// Trades with a positive return
    pub winning_trades: usize,
    /// Trades with a zero or negative return
    pub losing_trades: usize,
    /// Winning trades as a percentage of all trades
    pub win_rate_pct: Decimal,
    /// Sum of positive trade returns, in percent
    pub gross_profit_pct: Decimal,
    /// Absolute sum of non-positive trade returns, in percent
    pub gross_loss_pct: Decimal,
    /// Gross profit over gross loss
    pub profit_loss_ratio: ProfitLossRatio,
    /// Best single trade return
    pub best_trade_pct: Decimal,
    /// Worst single trade return
    pub worst_trade_pct: Decimal,
}

impl TradeStats {
    /// Compute statistics. `None` when there is nothing to measure.
    pub fn from_matches(trades: &[MatchedTrade]) -> Option<Self> {
        if trades.is_empty() {
            return None;
        }

        let total_trades = trades.len();
        let mut winning_trades = 0;
        let mut gross_profit_pct = Decimal::ZERO;
        let mut gross_loss_pct = Decimal::ZERO;

        for trade in trades {
            if trade.is_profit {
                winning_trades += 1;
                gross_profit_pct += trade.profit_pct;
            } else {
                gross_loss_pct += trade.profit_pct;
            }
        }
        let gross_loss_pct = gross_loss_pct.abs();

        let profit_loss_ratio = if gross_loss_pct.is_zero() {
            ProfitLossRatio::Infinite
        } else {
            ProfitLossRatio::Finite(gross_profit_pct / gross_loss_pct)
        };

        let best_trade_pct = trades.iter().map(|t| t.profit_pct).max().unwrap_or_default();
        let worst_trade_pct = trades.iter().map(|t| t.profit_pct).min().unwrap_or_default();

        Some(Self {
            total_trades,
            winning_trades,
            losing_trades: total_trades - winning_trades,
            win_rate_pct: Decimal::from(winning_trades) / Decimal::from(total_trades) * dec!(100),
            gross_profit_pct,
            gross_loss_pct,
            profit_loss_ratio,
            best_trade_pct,
            worst_trade_pct,
        })
    }
}

/// Matched trades and their statistics for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePerformance {
    pub code: String,
    pub stats: TradeStats,
    pub trades: Vec<MatchedTrade>,
}

/// Match one instrument's trades and measure them.
///
/// Returns `None` when the instrument has no priced trades or nothing
/// could be matched.
pub fn evaluate(book: &TransactionBook, code: &str) -> Option<TradePerformance> {
    let history = book.for_instrument(code);
    let trades = match_fifo(history);
    let stats = TradeStats::from_matches(&trades)?;

    Some(TradePerformance {
        code: code.to_string(),
        stats,
        trades,
    })
}

/// Statistics across every instrument in the book, each matched on its own.
pub fn evaluate_all(book: &TransactionBook) -> Option<TradeStats> {
    let trades: Vec<MatchedTrade> = book
        .instruments()
        .iter()
        .flat_map(|code| match_fifo(book.for_instrument(code)))
        .collect();
    TradeStats::from_matches(&trades)
}
