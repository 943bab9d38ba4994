//! Free-form date normalization.
//!
//! Accepted forms, tried in order:
//!
//! 1. `YYYY-MM-DD`
//! 2. `M/D/YYYY` or `MM/DD/YYYY`
//! 3. `M-D-YYYY` or `MM-DD-YYYY`
//!
//! Every candidate is validated by building an actual calendar date, so
//! `02-30-2025` is rejected. Dates are calendar dates, never instants.

use chrono::NaiveDate;

/// Parse `input` into a calendar date, or `None` when it matches no
/// accepted form or names a day that does not exist.
pub fn normalize_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    parse_iso(trimmed)
        .or_else(|| parse_us(trimmed, '/'))
        .or_else(|| parse_us(trimmed, '-'))
}

/// Like [`normalize_date`] but returns the canonical `YYYY-MM-DD` string.
pub fn normalize_date_string(input: &str) -> Option<String> {
    normalize_date(input).map(|date| date.format("%Y-%m-%d").to_string())
}

fn parse_iso(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split('-');
    let year = digits(parts.next()?, 4, 4)?;
    let month = digits(parts.next()?, 2, 2)?;
    let day = digits(parts.next()?, 2, 2)?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

fn parse_us(s: &str, separator: char) -> Option<NaiveDate> {
    let mut parts = s.split(separator);
    let month = digits(parts.next()?, 1, 2)?;
    let day = digits(parts.next()?, 1, 2)?;
    let year = digits(parts.next()?, 4, 4)?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

/// Parse an all-ASCII-digit field whose length is within `min..=max`.
fn digits(field: &str, min: usize, max: usize) -> Option<u32> {
    if field.len() < min || field.len() > max || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
