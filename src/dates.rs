//! Date formatting.
//!
//! All dates arrive as unix seconds and are rendered in UTC with chrono
//! strftime formats from `[dates]`. Out-of-range timestamps render as an
//! empty string rather than failing the page.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// ISO-8601 form used in the `isosent`/`isoreceived` comments.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn to_utc(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Whether `format` parses as a chrono strftime format.
pub fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Render `secs` with `format`. Callers validate the format up front.
pub fn format(secs: i64, format: &str) -> String {
    match to_utc(secs) {
        Some(dt) if is_valid_format(format) => dt.format(format).to_string(),
        _ => String::new(),
    }
}

pub fn iso(secs: i64) -> String {
    format(secs, ISO_FORMAT)
}

/// `(year, month)` with month in 1..=12.
pub fn year_month(secs: i64) -> Option<(i32, u32)> {
    to_utc(secs).map(|dt| (dt.year(), dt.month()))
}

/// Month name and year: `May 2024`.
pub fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_default()
}
