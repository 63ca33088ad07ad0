//! Broker export to journal import conversion.
//!
//! The broker export has one header row and many columns; only the trade
//! date, the suffixed security code, the buy/sell label and the execution
//! price are kept. Output is the four-column journal layout with the
//! direction encoded as 1 (buy) or 2 (sell).

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use journal_core::error::DataError;
use journal_core::types::Direction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::dates::parse_trade_date;
use crate::read_utf8;

/// Header row written to converted journals.
pub const JOURNAL_HEADER: [&str; 4] = ["日期", "股票代码", "买卖类型", "成交价"];

/// Zero-based column positions in the broker export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub date: usize,
    pub code: usize,
    pub direction: usize,
    pub price: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            date: 0,
            code: 3,
            direction: 4,
            price: 7,
        }
    }
}

/// Outcome of a conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConversionSummary {
    /// Data rows read (header excluded)
    pub rows_read: usize,
    /// Rows written to the journal
    pub rows_written: usize,
}

impl ConversionSummary {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_written
    }
}

struct ConvertedRow {
    date: NaiveDate,
    code: String,
    direction: Direction,
    price: Decimal,
}

/// Convert a broker export file into a journal file.
pub fn convert_file(
    input: &Path,
    output: &Path,
    layout: &ColumnLayout,
) -> Result<ConversionSummary, DataError> {
    let text = read_utf8(input)?;
    let (journal, summary) = convert_text(&text, layout)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, journal)?;

    info!(
        "Converted {} of {} rows from {} into {}",
        summary.rows_written,
        summary.rows_read,
        input.display(),
        output.display()
    );
    Ok(summary)
}

/// Convert broker export text into journal text.
pub fn convert_text(
    text: &str,
    layout: &ColumnLayout,
) -> Result<(String, ConversionSummary), DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(JOURNAL_HEADER)
        .map_err(|e| DataError::Csv(e.to_string()))?;

    let mut summary = ConversionSummary::default();

    for result in reader.records() {
        let row = result.map_err(|e| DataError::Csv(e.to_string()))?;
        summary.rows_read += 1;

        let Some(converted) = convert_row(&row, layout) else {
            debug!("Dropping incomplete export row {}", summary.rows_read);
            continue;
        };

        writer
            .write_record([
                converted.date.format("%Y%m%d").to_string(),
                converted.code,
                converted.direction.code().to_string(),
                converted.price.normalize().to_string(),
            ])
            .map_err(|e| DataError::Csv(e.to_string()))?;
        summary.rows_written += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DataError::Csv(e.to_string()))?;
    let journal = String::from_utf8(bytes).map_err(|e| DataError::Csv(e.to_string()))?;

    Ok((journal, summary))
}

fn convert_row(row: &StringRecord, layout: &ColumnLayout) -> Option<ConvertedRow> {
    let date = parse_trade_date(row.get(layout.date)?)?;
    let code = extract_code(row.get(layout.code)?)?;
    let direction = Direction::from_broker_label(row.get(layout.direction).unwrap_or(""));
    let price = clean_price(row.get(layout.price)?)?;

    Some(ConvertedRow {
        date,
        code,
        direction,
        price,
    })
}

/// Take the digit run in front of the exchange suffix (`000001.XSHE`).
/// Codes without a `digits.` part are rejected.
fn extract_code(raw: &str) -> Option<String> {
    let mut run = String::new();
    for c in raw.chars() {
        if c.is_ascii_digit() {
            run.push(c);
        } else if c == '.' && !run.is_empty() {
            return Some(run);
        } else {
            run.clear();
        }
    }
    None
}

/// Keep only digits and dots, then parse.
fn clean_price(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const EXPORT: &str = "\
成交日期,时间,名称,代码,方向,数量,金额,成交价
2024-01-03,09:31,平安银行,000001.XSHE,买,100,1050,10.50
2024/01/05,10:02,浦发银行,600000.XSHG,卖,200,1600,¥8.00
2024-01-08,10:02,浦发银行,600000.XSHG,B,200,1600,
2024-01-09,10:02,坏数据,600000,买,200,1600,8
not-a-date,10:02,浦发银行,600000.XSHG,买,200,1600,8
";

    #[test]
    fn test_convert_export() {
        let (journal, summary) = convert_text(EXPORT, &ColumnLayout::default()).unwrap();

        assert_eq!(summary.rows_read, 5);
        assert_eq!(summary.rows_written, 2);
        assert_eq!(summary.rows_dropped(), 3);

        let lines: Vec<&str> = journal.lines().collect();
        assert_eq!(lines[0], "日期,股票代码,买卖类型,成交价");
        assert_eq!(lines[1], "20240103,000001,1,10.5");
        assert_eq!(lines[2], "20240105,600000,2,8");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_custom_layout() {
        let export = "h1,h2,h3,h4\n300750.XSHE,S,20240201,188.8\n";
        let layout = ColumnLayout {
            date: 2,
            code: 0,
            direction: 1,
            price: 3,
        };
        let (journal, summary) = convert_text(export, &layout).unwrap();

        assert_eq!(summary.rows_written, 1);
        assert!(journal.contains("20240201,300750,2,188.8"));
    }

    #[test]
    fn test_extract_code() {
        assert_eq!(extract_code("000001.XSHE").as_deref(), Some("000001"));
        assert_eq!(extract_code("SZ300750.SZ").as_deref(), Some("300750"));
        assert_eq!(extract_code("600000"), None);
        assert_eq!(extract_code(".XSHG"), None);
    }

    #[test]
    fn test_clean_price() {
        assert_eq!(clean_price("10.50"), Some(dec!(10.50)));
        assert_eq!(clean_price("¥8.00元"), Some(dec!(8.00)));
        assert_eq!(clean_price("--"), None);
        assert_eq!(clean_price("1.2.3"), None);
    }

    #[test]
    fn test_convert_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("transaction.csv");
        let output = dir.path().join("out").join("journal.csv");
        std::fs::write(&input, EXPORT).unwrap();

        let summary = convert_file(&input, &output, &ColumnLayout::default()).unwrap();
        assert_eq!(summary.rows_written, 2);

        let book = crate::TransactionBook::load(&output).unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(book.records()[1].direction, Direction::Sell);
        assert_eq!(book.records()[1].price, Some(dec!(8)));
    }
}
