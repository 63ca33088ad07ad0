//! Profit/loss report for closed positions.

use askama::Template;
use chrono::NaiveDateTime;
use journal_core::error::ReportError;
use journal_core::types::ClosedTrade;
use rust_decimal::Decimal;
use std::path::Path;
use tracing::info;

use crate::html::{render, write_page};

const TITLE: &str = "股票交易盈亏报告";
const COLUMNS: [&str; 8] = [
    "股票名称",
    "买入日期",
    "买入价格",
    "卖出日期",
    "卖出价格",
    "数量",
    "盈亏金额",
    "盈亏百分比",
];

struct ReportRow<'a> {
    name: &'a str,
    buy_date: String,
    buy_price: String,
    sell_date: String,
    sell_price: String,
    quantity: u64,
    profit: String,
    profit_class: &'static str,
    pct: String,
    pct_class: &'static str,
}

impl<'a> From<&'a ClosedTrade> for ReportRow<'a> {
    fn from(trade: &'a ClosedTrade) -> Self {
        Self {
            name: &trade.name,
            buy_date: trade.buy_date.format("%Y-%m-%d").to_string(),
            buy_price: format!("{:.2}", trade.buy_price),
            sell_date: trade.sell_date.format("%Y-%m-%d").to_string(),
            sell_price: format!("{:.2}", trade.sell_price),
            quantity: trade.quantity,
            profit: format!("{:.2}", trade.profit_amount),
            profit_class: sign_class(trade.profit_amount),
            pct: format!("{:.2}", trade.profit_pct),
            pct_class: sign_class(trade.profit_pct),
        }
    }
}

#[derive(Template)]
#[template(path = "pl_report.html")]
struct PlReportTemplate<'a> {
    title: &'a str,
    generated: String,
    columns: &'a [&'a str],
    rows: Vec<ReportRow<'a>>,
}

/// Render the report. `trades` are expected in display order.
pub fn render_pl_report(trades: &[ClosedTrade], generated_at: NaiveDateTime) -> Result<String, ReportError> {
    let template = PlReportTemplate {
        title: TITLE,
        generated: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        columns: &COLUMNS,
        rows: trades.iter().map(ReportRow::from).collect(),
    };
    render(&template)
}

/// Render and write the report.
pub fn write_pl_report(
    trades: &[ClosedTrade],
    path: &Path,
    generated_at: NaiveDateTime,
) -> Result<(), ReportError> {
    if trades.is_empty() {
        return Err(ReportError::NoTrades);
    }
    write_page(path, &render_pl_report(trades, generated_at)?)?;
    info!("Wrote profit/loss report with {} trades to {}", trades.len(), path.display());
    Ok(())
}

// Zero counts as a loss.
fn sign_class(value: Decimal) -> &'static str {
    if value > Decimal::ZERO {
        "positive"
    } else {
        "negative"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn generated() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn trade(name: &str, profit: Decimal, pct: Decimal) -> ClosedTrade {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        ClosedTrade {
            name: name.to_string(),
            buy_date: date,
            buy_price: dec!(10),
            sell_date: date,
            sell_price: dec!(10.5),
            quantity: 100,
            profit_amount: profit,
            profit_pct: pct,
        }
    }

    #[test]
    fn test_render_report() {
        let trades = vec![
            trade("平安银行", dec!(50), dec!(5)),
            trade("<script>", dec!(0), dec!(0)),
        ];
        let html = render_pl_report(&trades, generated()).unwrap();

        assert!(html.contains("<title>股票交易盈亏报告</title>"));
        assert!(html.contains("生成日期: 2024-06-01 09:30:00"));
        assert!(html.contains("<th>盈亏百分比</th>"));
        assert!(html.contains("<span class=\"positive\">5.00%</span>"));
        assert!(html.contains("<span class=\"negative\">0.00</span>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<td><script>"));
        assert!(html.contains("function searchTable()"));

        let first = html.find("平安银行").unwrap();
        let second = html.find("&lt;script&gt;").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock_trades.html");

        write_pl_report(&[trade("平安银行", dec!(-20), dec!(-2))], &path, generated()).unwrap();
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<span class=\"negative\">-2.00%</span>"));

        assert!(matches!(
            write_pl_report(&[], &path, generated()),
            Err(ReportError::NoTrades)
        ));
    }
}
