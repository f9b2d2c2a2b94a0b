//! Parsing and serialization for transaction dates and amounts.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

/// Date format for transactions, e.g. "2024-01-31".
pub(crate) const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` date.
pub(crate) fn parse_date(text: &str) -> Result<Date, time::error::Parse> {
    Date::parse(text.trim(), DATE_FORMAT)
}

/// Parse a monetary amount such as "-45.99".
///
/// Returns `None` for text that is not a finite number.
pub(crate) fn parse_amount(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

pub(crate) mod date_format {
    //! Serializes a [time::Date] as `YYYY-MM-DD`.
    //!
    //! The default serde representation of [time::Date] is not a calendar
    //! date string, which is what clients send and expect.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::{DATE_FORMAT, parse_date};

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date.format(DATE_FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_date(&s).map_err(serde::de::Error::custom)
    }
}

pub(crate) mod amount_format {
    //! Deserializes an amount from either a JSON number or a numeric string.
    //!
    //! Browser forms submit amounts as strings, e.g. `"2000.00"`.
    use serde::{Deserialize, Deserializer};

    use super::parse_amount;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(amount) => Ok(amount),
            RawAmount::Text(text) => parse_amount(&text).ok_or_else(|| {
                serde::de::Error::custom(format!("\"{text}\" is not a valid amount"))
            }),
        }
    }
}

#[cfg(test)]
mod format_tests {
    use time::macros::date;

    use super::{parse_amount, parse_date};

    #[test]
    fn parses_iso_date() {
        assert_eq!(parse_date("2024-01-01").unwrap(), date!(2024 - 01 - 01));
        assert_eq!(parse_date(" 2024-12-31 ").unwrap(), date!(2024 - 12 - 31));
    }

    #[test]
    fn rejects_other_date_formats() {
        assert!(parse_date("01/01/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn parses_amounts() {
        assert_eq!(parse_amount("100"), Some(100.0));
        assert_eq!(parse_amount("-45.99"), Some(-45.99));
        assert_eq!(parse_amount(" 2000.00 "), Some(2000.0));
    }

    #[test]
    fn rejects_non_numeric_amounts() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("ten dollars"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
    }
}
