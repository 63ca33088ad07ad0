//! Plain-text summaries for the terminal.

use journal_core::types::StockInfo;

use crate::overview::JournalOverview;
use crate::statistics::{TradePerformance, TradeStats};

const RULE_HEAVY: &str = "═══════════════════════════════════════════════════════════\n";
const RULE_LIGHT: &str = "───────────────────────────────────────────────────────────\n";

fn push_stats(s: &mut String, stats: &TradeStats) {
    s.push_str(&format!("  Matched Trades:      {}\n", stats.total_trades));
    s.push_str(&format!("  Winning Trades:      {}\n", stats.winning_trades));
    s.push_str(&format!("  Losing Trades:       {}\n", stats.losing_trades));
    s.push_str(&format!("  Win Rate:            {:.2}%\n", stats.win_rate_pct));
    s.push_str(&format!("  Profit/Loss Ratio:   {}\n", stats.profit_loss_ratio));
    s.push_str(&format!("  Best Trade:          {:.2}%\n", stats.best_trade_pct));
    s.push_str(&format!("  Worst Trade:         {:.2}%\n", stats.worst_trade_pct));
}

/// Text summary for one instrument.
pub fn performance_summary(info: &StockInfo, performance: &TradePerformance) -> String {
    let mut s = String::new();

    s.push_str(RULE_HEAVY);
    s.push_str(&format!("  {} ({})\n", info.name, performance.code));
    s.push_str(RULE_HEAVY);
    s.push('\n');

    s.push_str("STATISTICS\n");
    s.push_str(RULE_LIGHT);
    push_stats(&mut s, &performance.stats);
    s.push('\n');

    s.push_str("TRADES\n");
    s.push_str(RULE_LIGHT);
    for trade in &performance.trades {
        s.push_str(&format!(
            "  {} @ {:<8} -> {} @ {:<8} {:>8.2}%\n",
            trade.buy_date, trade.buy_price, trade.sell_date, trade.sell_price, trade.profit_pct
        ));
    }
    s.push('\n');

    s.push_str(RULE_HEAVY);
    s
}

impl JournalOverview {
    /// Text table with one line per instrument and overall statistics.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str(RULE_HEAVY);
        s.push_str("                     JOURNAL OVERVIEW                       \n");
        s.push_str(RULE_HEAVY);
        s.push('\n');

        s.push_str(&format!("  Records:             {}\n", self.total_records));
        s.push_str(&format!("  Instruments:         {}\n", self.instruments.len()));
        if let (Some(first), Some(last)) = (self.first_trade, self.last_trade) {
            s.push_str(&format!("  Period:              {} - {}\n", first, last));
        }
        s.push('\n');

        s.push_str("INSTRUMENTS\n");
        s.push_str(RULE_LIGHT);
        s.push_str("  Code    Name          Trades  Buy  Sell  Win Rate  P/L    Last Trade\n");
        for item in &self.instruments {
            let (win_rate, ratio) = match &item.stats {
                Some(stats) => (
                    format!("{:.2}%", stats.win_rate_pct),
                    stats.profit_loss_ratio.to_string(),
                ),
                None => ("-".to_string(), "-".to_string()),
            };
            let last = item
                .last_trade
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            s.push_str(&format!(
                "  {:<7} {:<12}  {:>6}  {:>3}  {:>4}  {:>8}  {:<5}  {}\n",
                item.code, item.name, item.total_trades, item.buy_count, item.sell_count, win_rate, ratio, last
            ));
        }
        s.push('\n');

        s.push_str("OVERALL\n");
        s.push_str(RULE_LIGHT);
        match &self.overall {
            Some(stats) => push_stats(&mut s, stats),
            None => s.push_str("  No matched trades\n"),
        }
        s.push('\n');

        s.push_str(RULE_HEAVY);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::evaluate;
    use journal_data::TransactionBook;

    fn book() -> TransactionBook {
        TransactionBook::parse("20240301,000001,1,10\n20240302,000001,2,12\n20240303,000001,1,11\n20240304,000001,2,9\n")
            .unwrap()
    }

    #[test]
    fn test_performance_summary() {
        let book = book();
        let performance = evaluate(&book, "000001").unwrap();
        let summary = performance_summary(&StockInfo::named("平安银行"), &performance);

        assert!(summary.contains("平安银行 (000001)"));
        assert!(summary.contains("Win Rate:            50.00%"));
        assert!(summary.contains("Profit/Loss Ratio:   1.10"));
        assert!(summary.contains("20.00%"));
    }

    #[test]
    fn test_overview_summary() {
        let book = book();
        let overview = JournalOverview::build(&book, &[("000001".to_string(), StockInfo::named("平安银行"))]);
        let summary = overview.summary();

        assert!(summary.contains("JOURNAL OVERVIEW"));
        assert!(summary.contains("Records:             4"));
        assert!(summary.contains("2024-03-01 - 2024-03-04"));
        assert!(summary.contains("50.00%"));
    }
}
