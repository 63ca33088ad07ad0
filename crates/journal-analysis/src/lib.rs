//! Trade matching, statistics and summaries.

mod closed_positions;
mod matcher;
mod overview;
mod report;
mod statistics;

pub use closed_positions::collapse_positions;
pub use matcher::match_fifo;
pub use overview::{InstrumentSummary, JournalOverview};
pub use report::performance_summary;
pub use statistics::{evaluate, evaluate_all, TradePerformance, TradeStats};
