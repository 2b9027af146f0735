//! Release date format shared by every wire payload
//!
//! Dates travel as `DD.MM.YYYY` strings (e.g. `16.09.2021`) and are stored
//! in the database as a DATE column.

use crate::{Error, Result};
use chrono::NaiveDate;

/// chrono format string for `DD.MM.YYYY`
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Example shown to clients in format errors
pub const DATE_EXAMPLE: &str = "16.09.2021";

/// Parse a `DD.MM.YYYY` date, naming `field` in the error
///
/// Day and month must be zero-padded and the year must have four digits;
/// chrono alone would also take `1.9.2021` or `16.09.21`.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    parse_strict(value.trim()).ok_or_else(|| {
        Error::Validation(format!(
            "invalid {} format: {}, right format '{}'",
            field, value, DATE_EXAMPLE
        ))
    })
}

/// True when `value` is exactly `DD.MM.YYYY` in shape (digits, dots at 2 and 5)
fn has_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == DATE_EXAMPLE.len()
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'.',
            _ => b.is_ascii_digit(),
        })
}

fn parse_strict(value: &str) -> Option<NaiveDate> {
    if !has_date_shape(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Render a date as `DD.MM.YYYY`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// serde adapter for `Option<NaiveDate>` fields rendered as `DD.MM.YYYY`
pub mod optional {
    use super::{format_date, parse_strict, DATE_EXAMPLE};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&format_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(s) if !s.trim().is_empty() => parse_strict(s.trim()).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid date {}, expected {}", s, DATE_EXAMPLE))
            }),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotted_date() {
        let date = parse_date("releaseDate", "16.09.2021").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 9, 16).unwrap());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let date = parse_date("releaseDate", "  16.07.2006 ").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2006, 7, 16).unwrap());
    }

    #[test]
    fn test_iso_date_rejected() {
        let err = parse_date("release_date_before", "2021-09-16").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("release_date_before"));
        assert!(err.to_string().contains(DATE_EXAMPLE));
    }

    #[test]
    fn test_impossible_date_rejected() {
        assert!(parse_date("releaseDate", "31.02.2021").is_err());
    }

    #[test]
    fn test_unpadded_and_short_dates_rejected() {
        for bad in ["16.09.21", "1.9.2021", "16.9.2021", "1.09.2021", "16.09.+2021", "16.09.-202"] {
            let err = parse_date("releaseDate", bad).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{}", bad);
        }
    }

    #[test]
    fn test_wrong_separator_rejected() {
        assert!(parse_date("releaseDate", "16/09/2021").is_err());
        assert!(parse_date("releaseDate", "16.09.2021.").is_err());
    }

    #[test]
    fn test_optional_adapter_is_strict() {
        #[derive(serde::Deserialize)]
        struct Dated {
            #[serde(with = "optional", default)]
            date: Option<NaiveDate>,
        }

        let ok: Dated = serde_json::from_str(r#"{"date": "07.09.2009"}"#).unwrap();
        assert_eq!(ok.date, NaiveDate::from_ymd_opt(2009, 9, 7));

        let blank: Dated = serde_json::from_str(r#"{"date": ""}"#).unwrap();
        assert_eq!(blank.date, None);

        assert!(serde_json::from_str::<Dated>(r#"{"date": "7.9.2009"}"#).is_err());
    }

    #[test]
    fn test_format_round_trip() {
        let date = NaiveDate::from_ymd_opt(2006, 7, 16).unwrap();
        assert_eq!(format_date(date), "16.07.2006");
    }
}
