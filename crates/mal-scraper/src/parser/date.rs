//! Partial date parsing for list exports.
//!
//! The site writes unknown date components as `00`: `2020-05-00` when the
//! day is unknown, `2020-00-00` when only the year is known and `0000-00-00`
//! when nothing is known.

use chrono::{Datelike, NaiveDate};
use shared::{DatePrecision, WatchDate};

/// Parse a list date, degrading from day to month to year precision.
///
/// Returns `None` for anything that matches none of the three forms,
/// including the all-zero placeholder.
pub fn parse_date(raw: &str) -> Option<WatchDate> {
    let raw = raw.trim();

    let full = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| (date, DatePrecision::Day));

    let month = || {
        let prefix = raw.strip_suffix("-00")?;
        NaiveDate::parse_from_str(&format!("{}-01", prefix), "%Y-%m-%d")
            .ok()
            .map(|date| (date, DatePrecision::Month))
    };

    let year = || {
        let prefix = raw.strip_suffix("-00-00")?;
        NaiveDate::parse_from_str(&format!("{}-01-01", prefix), "%Y-%m-%d")
            .ok()
            .map(|date| (date, DatePrecision::Year))
    };

    full.or_else(month)
        .or_else(year)
        .filter(|(date, _)| date.year() >= 1)
        .map(|(date, precision)| WatchDate { date, precision })
}
