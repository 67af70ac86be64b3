//! Normalization of host-supplied date strings.
//!
//! The host formats dates with its own locale conventions (`5/20/2026 11:59 PM`)
//! but some call sites pass ISO strings instead. Both end up as a civil
//! [`Timestamp`] with no timezone attached.

use std::sync::OnceLock;

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use regex::Regex;

/// Civil date and time as displayed by the calendar.
pub type Timestamp = NaiveDateTime;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a host date string into a timestamp.
///
/// Returns `None` for absent, blank or unparseable input; never panics.
pub fn normalize(input: Option<&str>) -> Option<Timestamp> {
    let text = input?.trim();
    if text.is_empty() {
        return None;
    }

    parse_direct(text).or_else(|| parse_meridiem(text))
}

/// Locale-free formats: RFC 3339, ISO 8601 variants and numeric US dates.
fn parse_direct(text: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// `M/D/YYYY H:MM AM|PM`, ASCII digits only.
fn meridiem_re() -> Option<&'static Regex> {
    static MERIDIEM_RE: OnceLock<Option<Regex>> = OnceLock::new();
    MERIDIEM_RE
        .get_or_init(|| {
            Regex::new(r"(?i)^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})\s+([0-9]{1,2}):([0-9]{2})\s+(AM|PM)$")
                .map_err(|e| tracing::error!("Invalid date pattern: {}", e))
                .ok()
        })
        .as_ref()
}

/// Strict `M/D/YYYY H:MM AM|PM`, built from explicit numeric fields.
fn parse_meridiem(text: &str) -> Option<Timestamp> {
    let caps = meridiem_re()?.captures(text)?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let (month, day, year) = (field(1)?, field(2)?, field(3)?);
    let hour = to_24_hour(field(4)?, caps.get(6)?.as_str())?;
    let minute = field(5)?;

    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?.and_hms_opt(hour, minute, 0)
}

/// `12 AM` is midnight, `12 PM` is noon.
fn to_24_hour(hour: u32, meridiem: &str) -> Option<u32> {
    if meridiem.eq_ignore_ascii_case("AM") {
        Some(if hour == 12 { 0 } else { hour })
    } else if meridiem.eq_ignore_ascii_case("PM") {
        Some(if hour == 12 { 12 } else { hour + 12 })
    } else {
        None
    }
}

/// Advance by whole calendar days, keeping the wall-clock time.
pub fn add_days(ts: Timestamp, days: u64) -> Option<Timestamp> {
    ts.checked_add_days(Days::new(days))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::{Datelike, Timelike};

    fn civil(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_meridiem_format() {
        let ts = normalize(Some("5/20/2026 11:59 PM")).unwrap();
        assert_eq!(ts.year(), 2026);
        assert_eq!(ts.month(), 5);
        assert_eq!(ts.day(), 20);
        assert_eq!(ts.hour(), 23);
        assert_eq!(ts.minute(), 59);
    }

    #[test]
    fn test_midnight_and_noon() {
        assert_eq!(normalize(Some("6/13/2025 12:00 AM")), Some(civil(2025, 6, 13, 0, 0)));
        assert_eq!(normalize(Some("6/13/2025 12:00 PM")), Some(civil(2025, 6, 13, 12, 0)));
        assert_eq!(normalize(Some("6/13/2025 1:30 pm")), Some(civil(2025, 6, 13, 13, 30)));
        assert_eq!(normalize(Some("06/03/2025 09:05 am")), Some(civil(2025, 6, 3, 9, 5)));
    }

    #[test]
    fn test_absent_blank_and_garbage() {
        assert_eq!(normalize(None), None);
        assert_eq!(normalize(Some("")), None);
        assert_eq!(normalize(Some("   ")), None);
        assert_eq!(normalize(Some("garbage")), None);
    }

    #[test]
    fn test_strict_meridiem_rejects_loose_input() {
        // single-digit minute
        assert_eq!(normalize(Some("5/20/2026 11:5 PM")), None);
        // two-digit year
        assert_eq!(normalize(Some("5/20/26 11:59 PM")), None);
        // unknown meridiem
        assert_eq!(normalize(Some("5/20/2026 11:59 XM")), None);
        // impossible calendar day
        assert_eq!(normalize(Some("2/30/2026 10:00 AM")), None);
    }

    #[test]
    fn test_meridiem_edge_inputs() {
        // surrounding and repeated whitespace
        assert_eq!(
            normalize(Some(" 5/20/2026  11:59   pm ")),
            Some(civil(2026, 5, 20, 23, 59))
        );
        // 24-hour hour with a meridiem
        assert_eq!(normalize(Some("1/1/2026 13:00 PM")), None);
        // signed year
        assert_eq!(normalize(Some("1/1/+2026 1:00 AM")), None);
        // non-ASCII digits
        assert_eq!(normalize(Some("\u{665}/20/2026 11:59 PM")), None);
    }

    #[test]
    fn test_iso_formats() {
        assert_eq!(
            normalize(Some("2025-07-15T10:00:00")),
            Some(civil(2025, 7, 15, 10, 0))
        );
        assert_eq!(normalize(Some("2025-07-15T10:00")), Some(civil(2025, 7, 15, 10, 0)));
        assert_eq!(normalize(Some("2025-07-15")), Some(civil(2025, 7, 15, 0, 0)));
        assert_eq!(
            normalize(Some("2025-07-15T10:00:00+02:00")),
            Some(civil(2025, 7, 15, 8, 0))
        );
        assert_eq!(
            normalize(Some("2025-07-15T10:00:00.000Z")),
            Some(civil(2025, 7, 15, 10, 0))
        );
    }

    #[test]
    fn test_plain_us_date() {
        assert_eq!(normalize(Some("7/18/2025")), Some(civil(2025, 7, 18, 0, 0)));
        assert_eq!(normalize(Some("7/18/2025 14:45")), Some(civil(2025, 7, 18, 14, 45)));
    }

    #[test]
    fn test_add_days_crosses_month() {
        let ts = civil(2025, 7, 31, 23, 59);
        assert_eq!(add_days(ts, 1), Some(civil(2025, 8, 1, 23, 59)));
    }
}
