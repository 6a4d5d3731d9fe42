use crate::schema::ExpenseRecord;
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeSet;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Parses a date written day-first, e.g. "05/01/2023" is the 5th of January.
///
/// Accepted layouts:
/// - `dd/mm/yyyy`, `dd-mm-yyyy`, `dd.mm.yyyy`
/// - `dd/mm/yy` (two-digit years follow chrono's `%y` century rule)
/// - `yyyy-mm-dd` (a leading four-digit year is unambiguous)
///
/// Any of these may be followed by a time of day (`HH:MM` or `HH:MM:SS`),
/// which is validated and then dropped.
pub fn parse_day_first_date(text: &str) -> Option<NaiveDate> {
    let mut tokens = text.split_whitespace();
    let date_part = tokens.next()?;

    if let Some(time_part) = tokens.next() {
        if tokens.next().is_some() || !is_time_of_day(time_part) {
            return None;
        }
    }

    let sep = date_part.chars().find(|c| matches!(c, '/' | '-' | '.'))?;
    let segments: Vec<&str> = date_part.split(sep).collect();
    if segments.len() != 3 {
        return None;
    }

    let format = match (segments[0].len(), segments[2].len()) {
        (4, _) => format!("%Y{sep}%m{sep}%d"),
        (_, 4) => format!("%d{sep}%m{sep}%Y"),
        (_, 2) => format!("%d{sep}%m{sep}%y"),
        _ => return None,
    };

    NaiveDate::parse_from_str(date_part, &format).ok()
}

fn is_time_of_day(text: &str) -> bool {
    NaiveTime::parse_from_str(text, "%H:%M:%S").is_ok()
        || NaiveTime::parse_from_str(text, "%H:%M").is_ok()
}

/// Parses a signed amount, tolerating thousands separators.
/// Non-finite results ("NaN", "inf") are rejected.
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Rounds to 2 decimal places. Results that round to zero are always +0.0.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

pub fn month_abbreviation(month: u32) -> Option<&'static str> {
    let idx = month.checked_sub(1)? as usize;
    MONTH_ABBREVIATIONS.get(idx).copied()
}

/// Sorted, de-duplicated invoice years.
pub fn distinct_years(records: &[ExpenseRecord]) -> Vec<i32> {
    records
        .iter()
        .map(|r| r.invoice_year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
