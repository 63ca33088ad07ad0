//! Per-instrument chart page: candlesticks, trade statistics and tables.

use askama::Template;
use journal_analysis::TradePerformance;
use journal_core::error::ReportError;
use journal_core::types::{Direction, PriceBar, StockInfo, TradeRecord};
use rust_decimal::Decimal;
use std::path::Path;
use tracing::info;

use crate::chart_svg::{candlestick_svg, place_markers, ChartSize};
use crate::html::{render, write_page};

struct Metric {
    label: &'static str,
    value: String,
}

struct MatchedRow {
    buy_date: String,
    buy_price: String,
    sell_date: String,
    sell_price: String,
    pct: String,
    class: &'static str,
    status: &'static str,
}

struct JournalRow {
    date: String,
    action: &'static str,
    price: String,
}

#[derive(Template)]
#[template(path = "chart_page.html")]
struct ChartPageTemplate<'a> {
    title: String,
    code: &'a str,
    info: &'a StockInfo,
    source: &'a str,
    chart_title: String,
    /// Empty when there are no bars
    svg: String,
    metrics: Vec<Metric>,
    matched: Vec<MatchedRow>,
    journal: Vec<JournalRow>,
}

/// Everything the chart page shows for one instrument.
pub struct ChartPage<'a> {
    pub code: &'a str,
    pub info: &'a StockInfo,
    /// The instrument's journal entries, in date order
    pub trades: &'a [&'a TradeRecord],
    /// Daily bars; empty when no provider had data
    pub bars: &'a [PriceBar],
    /// Provider that supplied `bars`
    pub source: Option<&'a str>,
    pub performance: Option<&'a TradePerformance>,
    pub size: ChartSize,
}

impl ChartPage<'_> {
    pub fn render(&self) -> Result<String, ReportError> {
        let svg = if self.bars.is_empty() {
            String::new()
        } else {
            let markers = place_markers(self.bars, self.trades.iter().copied());
            candlestick_svg(self.bars, &markers, self.size)
        };

        let template = ChartPageTemplate {
            title: format!("股票 {} K线图及交易记录", self.code),
            code: self.code,
            info: self.info,
            source: self.source.unwrap_or("无"),
            chart_title: format!("股票 {} K线图", self.code),
            svg,
            metrics: self.metrics(),
            matched: self.performance.map(matched_rows).unwrap_or_default(),
            journal: self.trades.iter().map(|t| journal_row(t)).collect(),
        };
        render(&template)
    }

    /// Render and write the page.
    pub fn write(&self, path: &Path) -> Result<(), ReportError> {
        write_page(path, &self.render()?)?;
        info!("Wrote chart page for {} to {}", self.code, path.display());
        Ok(())
    }

    fn metrics(&self) -> Vec<Metric> {
        let buys = self.trades.iter().filter(|t| t.direction == Direction::Buy).count();
        let mut metrics = vec![
            Metric {
                label: "总交易次数",
                value: self.trades.len().to_string(),
            },
            Metric {
                label: "买入次数",
                value: buys.to_string(),
            },
            Metric {
                label: "卖出次数",
                value: (self.trades.len() - buys).to_string(),
            },
        ];

        if let Some(performance) = self.performance {
            let stats = &performance.stats;
            let ratio = if stats.profit_loss_ratio.is_infinite() {
                "∞ (无亏损)".to_string()
            } else {
                stats.profit_loss_ratio.to_string()
            };
            metrics.push(Metric {
                label: "胜率",
                value: format!("{:.1}%", stats.win_rate_pct),
            });
            metrics.push(Metric {
                label: "盈亏率",
                value: ratio,
            });
        }
        metrics
    }
}

fn matched_rows(performance: &TradePerformance) -> Vec<MatchedRow> {
    performance
        .trades
        .iter()
        .map(|trade| {
            let (class, status) = if trade.is_profit {
                ("profit", "盈利")
            } else {
                ("loss", "亏损")
            };
            MatchedRow {
                buy_date: trade.buy_date.format("%Y-%m-%d").to_string(),
                buy_price: format!("{:.2}", trade.buy_price),
                sell_date: trade.sell_date.format("%Y-%m-%d").to_string(),
                sell_price: format!("{:.2}", trade.sell_price),
                pct: signed_pct(trade.profit_pct),
                class,
                status,
            }
        })
        .collect()
}

fn journal_row(trade: &TradeRecord) -> JournalRow {
    JournalRow {
        date: trade.date.format("%Y-%m-%d").to_string(),
        action: trade.direction.label(),
        price: trade
            .price
            .map(|p| format!("{:.2}", p))
            .unwrap_or_else(|| "无价格数据".to_string()),
    }
}

fn signed_pct(pct: Decimal) -> String {
    if pct > Decimal::ZERO {
        format!("+{:.2}", pct)
    } else {
        format!("{:.2}", pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use journal_analysis::evaluate;
    use journal_data::TransactionBook;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn book() -> TransactionBook {
        TransactionBook::parse("20240102,000001,1,10\n20240103,000001,2,12\n20240104,000001,1\n").unwrap()
    }

    fn bars() -> Vec<PriceBar> {
        vec![
            PriceBar::new(day(2), 10.0, 10.5, 9.8, 10.2, 100.0),
            PriceBar::new(day(3), 10.2, 12.3, 10.1, 12.0, 300.0),
            PriceBar::new(day(4), 12.0, 12.1, 11.0, 11.2, 200.0),
        ]
    }

    #[test]
    fn test_render_with_bars() {
        let book = book();
        let trades = book.for_instrument("000001");
        let performance = evaluate(&book, "000001").unwrap();
        let info = StockInfo::named("平安银行");
        let bars = bars();

        let page = ChartPage {
            code: "000001",
            info: &info,
            trades: &trades,
            bars: &bars,
            source: Some("eastmoney"),
            performance: Some(&performance),
            size: ChartSize::default(),
        };
        let html = page.render().unwrap();

        assert!(html.contains("<title>股票 000001 K线图及交易记录</title>"));
        assert!(html.contains("数据来源: eastmoney"));
        assert!(html.contains("<svg"));
        assert!(html.contains("股票 000001 K线图</div>"));
        assert!(html.contains("∞ (无亏损)"));
        assert!(html.contains("100.0%"));
        assert!(html.contains("+20.00%"));
        assert!(html.contains("盈利"));
        assert!(html.contains("无价格数据"));
        assert_eq!(html.matches("class=\"marker-").count(), 3);
    }

    #[test]
    fn test_render_without_bars_still_has_stats() {
        let book = book();
        let trades = book.for_instrument("000001");
        let info = StockInfo::placeholder("000001");

        let page = ChartPage {
            code: "000001",
            info: &info,
            trades: &trades,
            bars: &[],
            source: None,
            performance: None,
            size: ChartSize::default(),
        };
        let html = page.render().unwrap();

        assert!(!html.contains("<svg"));
        assert!(html.contains("无法获取行情数据"));
        assert!(html.contains("<div class=\"value\">3</div>"));
        assert!(html.contains("无价格数据，无法计算胜率和盈亏率"));
    }

    #[test]
    fn test_names_are_escaped() {
        let info = StockInfo::named("<b>A&B</b>");
        let page = ChartPage {
            code: "000001",
            info: &info,
            trades: &[],
            bars: &[],
            source: Some("<i>"),
            performance: None,
            size: ChartSize::default(),
        };
        let html = page.render().unwrap();

        assert!(html.contains("&lt;b&gt;A&amp;B&lt;/b&gt;"));
        assert!(html.contains("数据来源: &lt;i&gt;"));
        assert!(!html.contains("<b>A&B</b>"));
    }

    #[test]
    fn test_write_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts").join("000001.html");
        let info = StockInfo::placeholder("000001");

        let page = ChartPage {
            code: "000001",
            info: &info,
            trades: &[],
            bars: &[],
            source: None,
            performance: None,
            size: ChartSize::default(),
        };
        page.write(&path).unwrap();
        assert!(path.exists());
    }
}
