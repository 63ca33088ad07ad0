//! Core types and traits for the trade journal.
//!
//! This crate provides the foundational building blocks including:
//! - Journal types (TradeRecord, MatchedTrade, Direction)
//! - Market data types (PriceBar) and stock metadata (StockInfo, Market)
//! - Closed-position rows used by the profit/loss report
//! - Provider traits for quotes and stock metadata

pub mod types;
pub mod traits;
pub mod error;

pub use error::{DataError, QuoteError, ReportError};
pub use types::*;
pub use traits::*;
