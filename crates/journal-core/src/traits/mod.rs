//! Core traits for the trade journal.

mod quote_source;

pub use quote_source::{QuoteProvider, StockInfoProvider};
