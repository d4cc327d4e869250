//! Thai calendar rendering — Buddhist-era years and Thai month names.

use crate::period::Period;
use chrono::{DateTime, Datelike, FixedOffset, Utc};

/// Gregorian year + 543 = Buddhist-era year.
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

pub const THAI_MONTHS: [&str; 12] = [
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
];

pub fn buddhist_year(gregorian_year: i32) -> i32 {
    gregorian_year + BUDDHIST_ERA_OFFSET
}

/// Thai month name for a 1-based month number.
pub fn thai_month_name(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    THAI_MONTHS.get(idx).copied()
}

/// `"DD <month> YYYY"` in the Buddhist era, day zero-padded.
pub fn format_local_date<D: Datelike>(date: &D) -> String {
    // chrono months are always 1..=12
    let month = thai_month_name(date.month()).unwrap_or_default();
    format!("{:02} {} {}", date.day(), month, buddhist_year(date.year()))
}

/// Shift a UTC instant into the local offset, then format its date.
pub fn format_local_timestamp(at: &DateTime<Utc>, offset: &FixedOffset) -> String {
    format_local_date(&at.with_timezone(offset))
}

/// `"<month> YYYY"` label for a `YYYYMM` key.
/// Anything that is not a valid period key is returned unchanged.
pub fn format_period_label(key: &str) -> String {
    match Period::parse(key) {
        Ok(p) => period_label(p),
        Err(_) => key.to_string(),
    }
}

pub fn period_label(period: Period) -> String {
    let month = thai_month_name(period.month()).unwrap_or_default();
    format!("{} {}", month, buddhist_year(period.year()))
}
