//! Quote provider trait definitions.

use crate::error::QuoteError;
use crate::types::{PriceBar, StockInfo};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait for historical daily bar providers.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetch daily bars.
    ///
    /// # Arguments
    /// * `code` - Six-digit instrument code
    /// * `start` - First day of the range (inclusive)
    /// * `end` - Last day of the range (inclusive)
    ///
    /// # Returns
    /// Bars ordered from oldest to newest; an empty vector means the
    /// provider had nothing for this instrument.
    async fn fetch_bars(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, QuoteError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

/// Trait for stock metadata providers.
#[async_trait]
pub trait StockInfoProvider: Send + Sync {
    /// Look up display metadata. `Ok(None)` means the provider answered
    /// but did not know the instrument.
    async fn fetch_info(&self, code: &str) -> Result<Option<StockInfo>, QuoteError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}
