//! Readers and writers for journal files.

mod cache;
mod converter;
mod dates;
mod positions;
mod transactions;

pub use cache::InfoCache;
pub use converter::{convert_file, convert_text, ColumnLayout, ConversionSummary, JOURNAL_HEADER};
pub use dates::parse_trade_date;
pub use positions::{clean_header, PositionSheet};
pub use transactions::{normalize_code, TransactionBook};

use journal_core::error::DataError;
use std::path::Path;

/// Read a text file, accepting UTF-8 with or without a byte-order mark.
pub fn read_utf8(path: &Path) -> Result<String, DataError> {
    if !path.exists() {
        return Err(DataError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes);

    String::from_utf8(bytes.to_vec()).map_err(|_| DataError::Encoding(path.display().to_string()))
}

/// Load a trade journal.
pub fn load_journal(path: &Path) -> Result<TransactionBook, DataError> {
    TransactionBook::load(path)
}
