//! Position sheet reader for the profit/loss report.
//!
//! Brokers label the same columns differently from one export to the next,
//! so columns are located by cleaned header text rather than position.

use csv::{ReaderBuilder, StringRecord, Trim};
use journal_core::error::DataError;
use journal_core::types::PositionRow;
use rust_decimal::Decimal;
use std::path::Path;
use tracing::{debug, info};

use crate::dates::parse_trade_date;
use crate::read_utf8;

const NAME_COLUMN: &str = "品种";
const RECORD_DATE_COLUMN: &str = "日期";
const OPEN_DATE_COLUMN: &str = "开仓日期";
const OPEN_DATE_KEYWORDS: [&str; 3] = ["开仓", "建仓", "买入"];
const PRICE_COLUMNS: [&str; 4] = ["开仓均价", "开仓价", "收盘价", "收盘价结算价"];
const PROFIT_KEYWORD: &str = "盈亏";
const QUANTITY_COLUMNS: [&str; 2] = ["可用数量", "数量"];

/// Strip whitespace and punctuation from a header cell, keeping ASCII
/// letters, digits, underscores and CJK ideographs.
pub fn clean_header(raw: &str) -> String {
    raw.chars()
        .filter(|c| {
            c.is_ascii_alphanumeric() || *c == '_' || ('\u{4e00}'..='\u{9fa5}').contains(c)
        })
        .collect()
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SheetColumns {
    name: usize,
    record_date: usize,
    open_date: usize,
    price: usize,
    profit: usize,
    quantity: usize,
}

impl SheetColumns {
    fn resolve(headers: &[String]) -> Result<Self, DataError> {
        let available = headers.join(", ");
        let missing = |column: &str| DataError::MissingColumn {
            column: column.to_string(),
            available: available.clone(),
        };
        let exact = |wanted: &str| headers.iter().position(|h| h == wanted);

        let name = exact(NAME_COLUMN).ok_or_else(|| missing(NAME_COLUMN))?;
        let record_date = exact(RECORD_DATE_COLUMN).ok_or_else(|| missing(RECORD_DATE_COLUMN))?;

        let open_date = exact(OPEN_DATE_COLUMN)
            .or_else(|| {
                headers.iter().position(|h| {
                    h.contains(RECORD_DATE_COLUMN)
                        && OPEN_DATE_KEYWORDS.iter().any(|k| h.contains(k))
                })
            })
            .or_else(|| {
                headers
                    .iter()
                    .position(|h| OPEN_DATE_KEYWORDS.iter().any(|k| h.contains(k)))
            })
            .ok_or_else(|| missing(OPEN_DATE_COLUMN))?;

        let price = PRICE_COLUMNS
            .iter()
            .find_map(|c| exact(*c))
            .ok_or_else(|| missing(PRICE_COLUMNS[0]))?;

        let profit = headers
            .iter()
            .position(|h| h.contains(PROFIT_KEYWORD))
            .ok_or_else(|| missing(PROFIT_KEYWORD))?;

        let quantity = QUANTITY_COLUMNS
            .iter()
            .find_map(|c| exact(*c))
            .ok_or_else(|| missing(QUANTITY_COLUMNS[1]))?;

        info!(
            "Position sheet columns: name='{}' date='{}' open='{}' price='{}' profit='{}' quantity='{}'",
            headers[name],
            headers[record_date],
            headers[open_date],
            headers[price],
            headers[profit],
            headers[quantity]
        );

        Ok(Self {
            name,
            record_date,
            open_date,
            price,
            profit,
            quantity,
        })
    }
}

/// Rows read from a position sheet export.
#[derive(Debug, Clone, Default)]
pub struct PositionSheet {
    rows: Vec<PositionRow>,
}

impl PositionSheet {
    /// Load a CSV export of the position sheet.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = read_utf8(path)?;
        let sheet = Self::parse(&text)?;
        info!("Loaded {} position rows from {}", sheet.rows.len(), path.display());
        Ok(sheet)
    }

    /// Parse sheet text.
    pub fn parse(text: &str) -> Result<Self, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| DataError::Csv(e.to_string()))?
            .iter()
            .map(clean_header)
            .collect();
        let columns = SheetColumns::resolve(&headers)?;

        let mut rows = Vec::new();
        let mut skipped = 0usize;

        for result in reader.records() {
            let record = result.map_err(|e| DataError::Csv(e.to_string()))?;
            match parse_row(&record, &columns)? {
                Some(row) => rows.push(row),
                None => skipped += 1,
            }
        }

        debug!("Kept {} position rows, skipped {}", rows.len(), skipped);
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[PositionRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<PositionRow> {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn parse_row(record: &StringRecord, columns: &SheetColumns) -> Result<Option<PositionRow>, DataError> {
    let cell = |index: usize| record.get(index).unwrap_or("");

    let name = cell(columns.name);
    if name.is_empty() {
        return Ok(None);
    }
    let Some(quantity) = clean_quantity(cell(columns.quantity)) else {
        return Ok(None);
    };
    let Some(price) = clean_price(cell(columns.price)) else {
        return Ok(None);
    };

    let Some(record_date) = required_date(cell(columns.record_date))? else {
        return Ok(None);
    };
    let Some(open_date) = required_date(cell(columns.open_date))? else {
        return Ok(None);
    };

    if price <= Decimal::ZERO {
        return Ok(None);
    }

    Ok(Some(PositionRow {
        name: name.to_string(),
        record_date,
        open_date,
        price,
        quantity,
        profit: clean_amount(cell(columns.profit)),
    }))
}

/// Blank dates skip the row; anything else must parse.
fn required_date(raw: &str) -> Result<Option<chrono::NaiveDate>, DataError> {
    if raw.is_empty() {
        return Ok(None);
    }
    parse_trade_date(raw)
        .map(Some)
        .ok_or_else(|| DataError::ParseError(format!("Could not parse date: {}", raw)))
}

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

fn clean_quantity(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Signed money amount; thousands separators and currency marks are dropped.
fn clean_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const SHEET: &str = "\
日期,品种, 开仓 日期 ,开仓均价,数量,可用数量,盈亏(逐笔浮盈)
2024-03-01,平安银行,2024-02-20,10.50,0,200,120.00
2024-03-04,平安银行,2024-02-20,10.50,0,200,\"1,250.50\"
2024-03-04,浦发银行,2024-03-01,-,0,100,-30
2024-03-05,,2024-03-01,8.0,0,100,-30
2024-03-05,万科A,,8.0,0,100,-30
";

    #[test]
    fn test_clean_header() {
        assert_eq!(clean_header(" 开仓 日期 "), "开仓日期");
        assert_eq!(clean_header("盈亏(逐笔浮盈)"), "盈亏逐笔浮盈");
        assert_eq!(clean_header("Close_Price ($)"), "Close_Price");
    }

    #[test]
    fn test_parse_sheet() {
        let sheet = PositionSheet::parse(SHEET).unwrap();
        let rows = sheet.rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "平安银行");
        assert_eq!(rows[0].open_date, NaiveDate::from_ymd_opt(2024, 2, 20).unwrap());
        assert_eq!(rows[0].quantity, 200);
        assert_eq!(rows[0].price, dec!(10.50));
        assert_eq!(rows[1].profit, Some(dec!(1250.50)));
    }

    #[test]
    fn test_open_date_fallback_prefers_date_columns() {
        let headers: Vec<String> = ["日期", "品种", "开仓均价", "建仓日期", "数量", "盈亏"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let columns = SheetColumns::resolve(&headers).unwrap();

        assert_eq!(columns.open_date, 3);
        assert_eq!(columns.price, 2);
        assert_eq!(columns.quantity, 4);
    }

    #[test]
    fn test_price_column_priority() {
        let headers: Vec<String> = ["日期", "品种", "开仓日期", "收盘价", "开仓价", "数量", "浮动盈亏"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let columns = SheetColumns::resolve(&headers).unwrap();

        assert_eq!(columns.price, 4);
        assert_eq!(columns.profit, 6);
    }

    #[test]
    fn test_missing_profit_column() {
        let text = "日期,品种,开仓日期,开仓均价,数量\n";
        let err = PositionSheet::parse(text).unwrap_err();
        match err {
            DataError::MissingColumn { column, available } => {
                assert_eq!(column, "盈亏");
                assert!(available.contains("开仓均价"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_date_is_an_error() {
        let text = "日期,品种,开仓日期,开仓均价,数量,盈亏\nsoon,平安银行,2024-02-20,10,100,5\n";
        assert!(matches!(
            PositionSheet::parse(text),
            Err(DataError::ParseError(_))
        ));
    }

    #[test]
    fn test_value_cleaning() {
        assert_eq!(clean_quantity("1,000股"), Some(1000));
        assert_eq!(clean_quantity("-"), None);
        assert_eq!(clean_amount("-1,234.5元"), Some(dec!(-1234.5)));
        assert_eq!(clean_amount("-"), None);
        assert_eq!(clean_price("--"), None);
    }
}
