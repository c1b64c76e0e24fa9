//! Order-date parsing and recovery.
//!
//! Vendor exports write dates in whatever format their backend likes, so the
//! parser tries a list of common layouts. Dates are stored normalized:
//! `YYYY-MM-DD` for plain dates and `YYYY-MM-DDTHH:MM:SSZ` when a time of day
//! was present. Naive timestamps are treated as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const STORED_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const STORED_DATE_FORMAT: &str = "%Y-%m-%d";

/// 14-digit `YYYYMMDDhhmmss` timestamp, as LCSC puts in export filenames
static FILENAME_TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})(\d{2})(\d{2})\d{6}").expect("valid timestamp pattern"));

/// Standalone `20YYMMDD` token
static FILENAME_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\D)(20\d{2})(\d{2})(\d{2})(?:\D|$)").expect("valid date pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParsedDate {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl ParsedDate {
    fn to_stored(self) -> String {
        match self {
            Self::Date(d) => d.format(STORED_DATE_FORMAT).to_string(),
            Self::DateTime(dt) => dt.format(STORED_DATETIME_FORMAT).to_string(),
        }
    }

    fn timestamp(self) -> NaiveDateTime {
        match self {
            Self::Date(d) => d.and_time(chrono::NaiveTime::MIN),
            Self::DateTime(dt) => dt,
        }
    }
}

fn parse_any(raw: &str) -> Option<ParsedDate> {
    let s = raw.trim().trim_matches('"').trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(ParsedDate::DateTime(dt.naive_utc()));
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(ParsedDate::DateTime(dt));
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(ParsedDate::Date)
}

/// Parse a date cell from a vendor export into its stored form.
///
/// # Examples
///
/// ```
/// use partscout::utils::dates::parse_date;
///
/// assert_eq!(parse_date("2024-03-05").as_deref(), Some("2024-03-05"));
/// assert_eq!(parse_date("03/05/2024 14:30").as_deref(), Some("2024-03-05T14:30:00Z"));
/// assert_eq!(parse_date("last tuesday"), None);
/// ```
#[must_use]
pub fn parse_date(raw: &str) -> Option<String> {
    parse_any(raw).map(ParsedDate::to_stored)
}

/// Parse a stored (or legacy) order date into a sortable timestamp
#[must_use]
pub fn parse_stored(stored: &str) -> Option<NaiveDateTime> {
    parse_any(stored).map(ParsedDate::timestamp)
}

/// Recover an order date from an export filename.
///
/// Tries a 14-digit `YYYYMMDDhhmmss` timestamp first, then a standalone
/// `20YYMMDD` token. Matches that are not real calendar dates are ignored.
#[must_use]
pub fn date_from_filename(filename: &str) -> Option<String> {
    let from_captures = |caps: regex::Captures<'_>| {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    };

    FILENAME_TIMESTAMP
        .captures(filename)
        .and_then(from_captures)
        .or_else(|| FILENAME_DATE.captures(filename).and_then(from_captures))
        .map(|d| d.format(STORED_DATE_FORMAT).to_string())
}

/// Today's local date
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_common_layouts() {
        assert_eq!(parse_date("2024-03-05").as_deref(), Some("2024-03-05"));
        assert_eq!(parse_date("2024/3/5").as_deref(), Some("2024-03-05"));
        assert_eq!(parse_date("3/5/2024").as_deref(), Some("2024-03-05"));
        assert_eq!(parse_date("Mar 5, 2024").as_deref(), Some("2024-03-05"));
        assert_eq!(parse_date("5 March 2024").as_deref(), Some("2024-03-05"));
        assert_eq!(
            parse_date("2024-03-05 09:41:07").as_deref(),
            Some("2024-03-05T09:41:07Z")
        );
        assert_eq!(
            parse_date("03/05/2024 02:15:00 PM").as_deref(),
            Some("2024-03-05T14:15:00Z")
        );
        assert_eq!(
            parse_date("2024-03-05T09:41:07+02:00").as_deref(),
            Some("2024-03-05T07:41:07Z")
        );
    }

    #[test]
    fn test_parse_strips_quotes() {
        assert_eq!(parse_date("\"2024-03-05\"").as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("Invalid Date"), None);
        assert_eq!(parse_date("2024-13-45"), None);
    }

    #[test]
    fn test_stored_round_trip_orders() {
        let older = parse_stored("2024-03-05").unwrap();
        let newer = parse_stored("2024-03-05T10:00:00Z").unwrap();
        assert!(newer > older);
    }

    #[test]
    fn test_filename_timestamp() {
        assert_eq!(
            date_from_filename("LCSC_Exported__20240305101112.csv").as_deref(),
            Some("2024-03-05")
        );
    }

    #[test]
    fn test_filename_standalone_date() {
        assert_eq!(
            date_from_filename("digikey_order_20231130.csv").as_deref(),
            Some("2023-11-30")
        );
        // Embedded in a longer digit run is not standalone
        assert_eq!(date_from_filename("invoice_9202311301.csv"), None);
    }

    #[test]
    fn test_filename_without_date() {
        assert_eq!(date_from_filename("parts.csv"), None);
        assert_eq!(date_from_filename("order_20231399.csv"), None);
    }
}
