//! Core data types for the trade journal.

mod ohlcv;
mod position;
mod stock;
mod trade;

pub use ohlcv::{first_on_or_after, PriceBar};
pub use position::{ClosedTrade, PositionRow};
pub use stock::{Market, StockInfo, UNKNOWN_INDUSTRY, UNKNOWN_SECTOR};
pub use trade::{Direction, MatchedTrade, ProfitLossRatio, TradeRecord};
