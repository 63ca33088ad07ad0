//! Trade journal reader.
//!
//! Journals are the converter's output or a hand-kept file:
//! `date,code,direction[,price]`, with or without a header row.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use journal_core::error::DataError;
use journal_core::types::{Direction, TradeRecord};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

use crate::dates::parse_trade_date;
use crate::read_utf8;

/// All journal entries loaded from one file.
#[derive(Debug, Clone, Default)]
pub struct TransactionBook {
    records: Vec<TradeRecord>,
}

impl TransactionBook {
    /// Build a book from already parsed records.
    pub fn from_records(records: Vec<TradeRecord>) -> Self {
        Self { records }
    }

    /// Load a journal file.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = read_utf8(path)?;
        let book = Self::parse(&text)?;
        info!("Loaded {} trade records from {}", book.len(), path.display());
        Ok(book)
    }

    /// Parse journal text.
    pub fn parse(text: &str) -> Result<Self, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let mut records = Vec::new();

        for (index, result) in reader.records().enumerate() {
            let row = result.map_err(|e| DataError::Csv(e.to_string()))?;

            if index == 0 && is_header(&row) {
                debug!("Skipping journal header row");
                continue;
            }

            if let Some(record) = parse_row(&row)? {
                records.push(record);
            }
        }

        if records.is_empty() {
            return Err(DataError::NoValidRecords);
        }

        Ok(Self { records })
    }

    /// All records in file order.
    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct instrument codes, sorted.
    pub fn instruments(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.instrument_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Records for one instrument, ordered by date. Same-day records keep
    /// their file order.
    pub fn for_instrument(&self, code: &str) -> Vec<&TradeRecord> {
        let mut trades: Vec<&TradeRecord> = self
            .records
            .iter()
            .filter(|r| r.instrument_id == code)
            .collect();
        trades.sort_by_key(|r| r.date);
        trades
    }

    /// First and last trade date across the whole book.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.date).min()?;
        let last = self.records.iter().map(|r| r.date).max()?;
        Some((first, last))
    }

    /// Whether any record carries an execution price.
    pub fn has_prices(&self) -> bool {
        self.records.iter().any(|r| r.price.is_some())
    }
}

/// Pad a code to six digits, the way A-share codes are written.
pub fn normalize_code(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let raw = raw.strip_suffix(".0").unwrap_or(raw);
    if raw.is_empty() {
        return None;
    }
    Some(format!("{:0>6}", raw))
}

/// A first row is a header when its first cell is neither a digit run nor
/// a date.
fn is_header(row: &StringRecord) -> bool {
    let first = row.get(0).unwrap_or("");
    let numeric = !first.is_empty() && first.chars().all(|c| c.is_ascii_digit());
    !numeric && parse_trade_date(first).is_none()
}

fn parse_row(row: &StringRecord) -> Result<Option<TradeRecord>, DataError> {
    let date_raw = row.get(0).unwrap_or("");
    let code_raw = row.get(1).unwrap_or("");
    let direction_raw = row.get(2).unwrap_or("");

    if date_raw.is_empty() || code_raw.is_empty() || direction_raw.is_empty() {
        return Ok(None);
    }

    let date = parse_trade_date(date_raw)
        .ok_or_else(|| DataError::ParseError(format!("Could not parse date: {}", date_raw)))?;

    let Some(code) = normalize_code(code_raw) else {
        return Ok(None);
    };

    let Some(direction) = Direction::from_code(direction_raw) else {
        debug!("Dropping row with direction '{}'", direction_raw);
        return Ok(None);
    };

    let price = row
        .get(3)
        .filter(|p| !p.is_empty())
        .and_then(|p| p.parse::<Decimal>().ok());

    Ok(Some(TradeRecord::new(date, code, direction, price)))
}
