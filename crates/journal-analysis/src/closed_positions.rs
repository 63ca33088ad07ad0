//! Collapse position-sheet rows into closed trades.

use chrono::NaiveDate;
use journal_core::error::ReportError;
use journal_core::types::{ClosedTrade, PositionRow};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Group rows by (name, open date) and turn each group into one closed
/// trade, sorted by profit percentage, best first.
///
/// Within a group, the earliest row supplies the buy price and quantity;
/// the latest row supplies the sell date, sell price and realized profit.
/// Groups whose final row carries no profit are skipped.
pub fn collapse_positions(rows: &[PositionRow]) -> Result<Vec<ClosedTrade>, ReportError> {
    let mut groups: BTreeMap<(&str, NaiveDate), Vec<&PositionRow>> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.name.as_str(), row.open_date))
            .or_default()
            .push(row);
    }
    info!("Found {} positions in {} rows", groups.len(), rows.len());

    let mut trades = Vec::with_capacity(groups.len());
    for ((name, open_date), mut group) in groups {
        group.sort_by_key(|r| r.record_date);
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };

        let Some(profit) = last.profit else {
            warn!("Position {} opened {} has no profit amount, skipping", name, open_date);
            continue;
        };

        let cost = first.price * Decimal::from(first.quantity);
        let profit_pct = if cost.is_zero() {
            Decimal::ZERO
        } else {
            profit / cost * dec!(100)
        };

        trades.push(ClosedTrade {
            name: name.to_string(),
            buy_date: open_date,
            buy_price: first.price.round_dp(2),
            sell_date: last.record_date,
            sell_price: last.price.round_dp(2),
            quantity: first.quantity,
            profit_amount: profit.round_dp(2),
            profit_pct: profit_pct.round_dp(2),
        });
    }

    if trades.is_empty() {
        return Err(ReportError::NoTrades);
    }

    trades.sort_by(|a, b| b.profit_pct.cmp(&a.profit_pct));
    Ok(trades)
}
