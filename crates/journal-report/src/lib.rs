//! Static HTML output: per-instrument chart pages and the closed-position
//! profit/loss report. Pages are askama templates; charts are inline SVG.

mod chart_page;
mod chart_svg;
mod html;
mod pl_report;

pub use chart_page::ChartPage;
pub use chart_svg::{candlestick_svg, place_markers, ChartSize, TradeMarker};
pub use pl_report::{render_pl_report, write_pl_report};
