//! Error types for the trade journal.

use thiserror::Error;

/// Errors raised while reading or converting journal files.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported encoding in {0}: only UTF-8 input is accepted")]
    Encoding(String),

    #[error("Column '{column}' not found. Available columns: {available}")]
    MissingColumn { column: String, available: String },

    #[error("No valid trade records")]
    NoValidRecords,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Quote provider errors.
///
/// Every variant is treated as "no data" by the resolver; the distinction
/// only matters for logging and for deciding whether a retry is worthwhile.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Malformed payload: {0}")]
    Malformed(String),

    #[error("Request error: {0}")]
    Request(String),
}

impl QuoteError {
    /// Whether the provider asked us to slow down.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, QuoteError::RateLimited(_))
    }

    /// Classify a free-form provider message, promoting rate-limit wording.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("rate limit") || lower.contains("too many requests") {
            QuoteError::RateLimited(message)
        } else {
            QuoteError::Request(message)
        }
    }
}

/// Report rendering errors.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No closed trades to report")]
    NoTrades,

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
