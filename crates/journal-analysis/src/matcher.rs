//! FIFO buy/sell matching.

use journal_core::types::{Direction, MatchedTrade, TradeRecord};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use tracing::trace;

/// Pair sells with the oldest open buy.
///
/// `trades` must already be in date order (see
/// `TransactionBook::for_instrument`). Records without a price are skipped.
/// A sell that finds no open buy is dropped.
pub fn match_fifo<'a, I>(trades: I) -> Vec<MatchedTrade>
where
    I: IntoIterator<Item = &'a TradeRecord>,
{
    let mut open_buys: VecDeque<(chrono::NaiveDate, Decimal)> = VecDeque::new();
    let mut matched = Vec::new();

    for trade in trades {
        let Some(price) = trade.price else {
            continue;
        };

        match trade.direction {
            Direction::Buy => open_buys.push_back((trade.date, price)),
            Direction::Sell => match open_buys.pop_front() {
                Some((buy_date, buy_price)) => {
                    matched.push(MatchedTrade::new(buy_date, buy_price, trade.date, price));
                }
                None => trace!(
                    "Unmatched sell of {} on {} dropped",
                    trade.instrument_id,
                    trade.date
                ),
            },
        }
    }

    matched
}
