//! Cell normalizer: turns one raw cell into a typed amount or a UTC instant.
//!
//! Every function here returns `Option`; a `None` means the row is skipped,
//! never that the document fails.

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::grid::Cell;
use crate::util::re;

/// Days between the spreadsheet epoch (1899-12-30) and the Unix epoch.
pub const SPREADSHEET_EPOCH_OFFSET_DAYS: f64 = 25569.0;
const MS_PER_DAY: f64 = 86_400_000.0;

re!(re_split_date,
    r"^\s*(\d{1,4})[./\-\s]+(\d{1,2})[./\-\s]+(\d{1,4})(?:[\sT,]+(\d{1,2}):(\d{2})(?::(\d{2}))?)?\s*$");

// ── Dates ─────────────────────────────────────────────────────────────────────

/// Resolves a date cell to an absolute instant.
///
/// `offset` is the wall-clock offset of the statement; text dates without an
/// explicit zone are read in it and shifted to UTC.
pub fn parse_date(cell: &Cell, offset: FixedOffset) -> Option<DateTime<Utc>> {
    match cell {
        Cell::Empty => None,
        Cell::Number(serial) => from_day_serial(*serial),
        Cell::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            parse_date_text(text, offset)
        }
    }
}

/// Spreadsheet day serial → UTC instant. Fractional days keep the time of day.
pub fn from_day_serial(serial: f64) -> Option<DateTime<Utc>> {
    if !serial.is_finite() || serial <= 0.0 {
        return None;
    }
    let ms = ((serial - SPREADSHEET_EPOCH_OFFSET_DAYS) * MS_PER_DAY).round();
    if ms.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(ms as i64)
}

fn parse_date_text(text: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let attempts: [fn(&str) -> Option<Parsed>; 2] = [parse_generic, parse_split];
    let parsed = attempts.iter().find_map(|attempt| attempt(text))?;
    match parsed {
        Parsed::Instant(dt) => Some(dt),
        Parsed::WallClock(naive) => offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

enum Parsed {
    /// The text carried its own zone.
    Instant(DateTime<Utc>),
    WallClock(NaiveDateTime),
}

/// Unambiguous ISO-like forms. Day/month order is never guessed here.
fn parse_generic(text: &str) -> Option<Parsed> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(Parsed::Instant(dt.with_timezone(&Utc)));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(Parsed::WallClock(naive));
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|d| Parsed::WallClock(d.and_time(NaiveTime::MIN)))
}

/// Three numeric parts split on `.`, `/`, `-` or whitespace. A first part
/// above 1900 reads as year-first, anything else as day-first.
fn parse_split(text: &str) -> Option<Parsed> {
    let caps = re_split_date().captures(text)?;
    let num = |i: usize| -> Option<u32> { caps.get(i)?.as_str().parse().ok() };

    let (first, second, third) = (num(1)?, num(2)?, num(3)?);
    let (year, month, day) = if first > 1900 {
        (first, second, third)
    } else {
        let year = if third < 100 { 2000 + third } else { third };
        (year, second, first)
    };

    let date = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?;
    let time = match (num(4), num(5)) {
        (Some(h), Some(m)) => NaiveTime::from_hms_opt(h, m, num(6).unwrap_or(0))?,
        _ => NaiveTime::MIN,
    };
    Some(Parsed::WallClock(date.and_time(time)))
}

/// Builds the statement offset from minutes east of UTC; out-of-range values
/// fall back to UTC.
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or(Utc.fix())
}

/// Calendar day of an instant, on the statement's wall clock.
pub fn local_day(dt: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    dt.with_timezone(&offset).date_naive()
}

/// Absolute time distance between two instants.
pub fn time_gap(a: DateTime<Utc>, b: DateTime<Utc>) -> Duration {
    (a - b).abs()
}

// ── Amounts ───────────────────────────────────────────────────────────────────

/// Signed amount of a cell; zero and unparseable values are `None`.
pub fn parse_amount(cell: &Cell) -> Option<Decimal> {
    let value = match cell {
        Cell::Empty => return None,
        Cell::Number(n) => Decimal::from_f64(*n)?,
        Cell::Text(text) => parse_amount_text(text)?,
    };
    (!value.is_zero()).then_some(value)
}

fn parse_amount_text(raw: &str) -> Option<Decimal> {
    // Anything after the last digit or trailing minus is a currency label, "р." included.
    let cleaned: String = raw
        .trim_end_matches(|c: char| !c.is_ascii_digit() && !matches!(c, '-' | '\u{2212}'))
        .chars()
        .map(|c| if c == '\u{2212}' { '-' } else { c })
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '+' | '-'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    // Every dot but the last one is a grouping separator.
    let normalized = match cleaned.rfind('.') {
        Some(last) => {
            let (head, tail) = cleaned.split_at(last);
            format!("{}{}", head.replace('.', ""), tail)
        }
        None => cleaned,
    };

    let mut s = normalized.as_str();
    let mut negative = false;
    if let Some(rest) = s.strip_suffix('-') {
        negative = true;
        s = rest;
    }
    if let Some(rest) = s.strip_prefix('-') {
        if negative {
            return None;
        }
        negative = true;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }
    if s.is_empty() || s.contains(['+', '-']) {
        return None;
    }

    let value = Decimal::from_str(s).ok()?;
    Some(if negative { -value } else { value })
}
