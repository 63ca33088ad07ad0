//! Date parsing shared by the readers.

use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 4] = ["%Y%m%d", "%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y%m%d %H:%M:%S",
];

/// Parse the date formats brokers put in their exports.
///
/// A time-of-day part is accepted and discarded. Spreadsheet exports
/// sometimes turn `20240103` into `20240103.0`; the fraction is ignored.
pub fn parse_trade_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let raw = raw.strip_suffix(".0").unwrap_or(raw);

    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, format) {
            return Some(d);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trade_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 3);

        assert_eq!(parse_trade_date("20240103"), expected);
        assert_eq!(parse_trade_date("2024-01-03"), expected);
        assert_eq!(parse_trade_date("2024/01/03"), expected);
        assert_eq!(parse_trade_date("2024/1/3"), expected);
        assert_eq!(parse_trade_date(" 2024-01-03 09:31:02 "), expected);
        assert_eq!(parse_trade_date("20240103.0"), expected);
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_trade_date(""), None);
        assert_eq!(parse_trade_date("日期"), None);
        assert_eq!(parse_trade_date("2024-13-40"), None);
    }
}
