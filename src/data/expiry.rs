//! Expiry date parsing and day counting
//!
//! Two textual forms show up on CALLS rows:
//! - ISO dates, `2025-08-15`, optionally quoted. This form is authoritative.
//! - Broker dates, `Aug 15 '25`, sometimes followed by a suffix such as
//!   `w (Weekly)`.
//!
//! Dates are calendar dates (`NaiveDate`), so there is no timezone that
//! could shift the day.

use chrono::{Local, NaiveDate};

/// Parse expiry text into a calendar date, `None` when unrecognized
pub fn parse_expiry_date(text: &str) -> Option<NaiveDate> {
    let cleaned = text.trim();
    if cleaned.is_empty() {
        return None;
    }

    parse_iso(cleaned).or_else(|| parse_broker(cleaned))
}

/// `YYYY-MM-DD`, optionally wrapped in single or double quotes
fn parse_iso(text: &str) -> Option<NaiveDate> {
    let unquoted = text
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();
    NaiveDate::parse_from_str(unquoted, "%Y-%m-%d").ok()
}

/// `Mon DD 'YY [suffix...]`; only the first three words are read
fn parse_broker(text: &str) -> Option<NaiveDate> {
    let mut words = text.split_whitespace();
    let (month, day, year) = (words.next()?, words.next()?, words.next()?);

    let year = match year.strip_prefix('\'') {
        Some(short) => format!("20{}", short),
        None => year.to_string(),
    };

    NaiveDate::parse_from_str(&format!("{} {} {}", month, day, year), "%b %d %Y").ok()
}

/// Signed calendar days from `today` to `expiry`
pub fn days_between(expiry: NaiveDate, today: NaiveDate) -> i64 {
    (expiry - today).num_days()
}

/// Days from the local calendar date to `expiry`
pub fn days_to_expiry(expiry: Option<NaiveDate>) -> Option<i64> {
    expiry.map(|d| days_between(d, today()))
}

/// Today's local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso() {
        let d = parse_expiry_date("2025-08-15").unwrap();
        assert_eq!((d.year(), d.month0(), d.day()), (2025, 7, 15));

        assert_eq!(parse_expiry_date("'2025-08-15'"), Some(ymd(2025, 8, 15)));
        assert_eq!(parse_expiry_date("\"2025-12-31\""), Some(ymd(2025, 12, 31)));
        assert_eq!(parse_expiry_date("  2025-01-02 "), Some(ymd(2025, 1, 2)));
        assert_eq!(parse_expiry_date("2025-02-30"), None);
    }

    #[test]
    fn test_broker_format() {
        assert_eq!(parse_expiry_date("Aug 15 '25"), Some(ymd(2025, 8, 15)));
        assert_eq!(parse_expiry_date("Sep 19 '25"), Some(ymd(2025, 9, 19)));
        assert_eq!(parse_expiry_date("Sep 26 '25 w (Weekly)"), Some(ymd(2025, 9, 26)));
        assert_eq!(parse_expiry_date("Jan 16 2026"), Some(ymd(2026, 1, 16)));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_expiry_date("not-a-date"), None);
        assert_eq!(parse_expiry_date(""), None);
        assert_eq!(parse_expiry_date("   "), None);
        assert_eq!(parse_expiry_date("Foo 15 '25"), None);
        assert_eq!(parse_expiry_date("Aug 15"), None);
    }

    #[test]
    fn test_days_between() {
        let today = ymd(2025, 8, 1);
        assert_eq!(days_between(today, today), 0);
        assert_eq!(days_between(ymd(2025, 8, 15), today), 14);
        assert_eq!(days_between(ymd(2025, 7, 27), today), -5);
        // Across a DST change the count stays whole days
        assert_eq!(days_between(ymd(2025, 11, 3), ymd(2025, 10, 31)), 3);
    }

    #[test]
    fn test_days_to_expiry() {
        let now = today();
        assert_eq!(days_to_expiry(Some(now)), Some(0));
        assert_eq!(days_to_expiry(Some(now + Duration::days(10))), Some(10));
        assert_eq!(days_to_expiry(Some(now - Duration::days(5))), Some(-5));
        assert_eq!(days_to_expiry(None), None);
    }
}
