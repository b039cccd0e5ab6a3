use std::borrow::Cow;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Utc, Weekday};

use crate::error::{Error, Result};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
const BODY_TEMPLATE: &[u8] = b"dddd-dd-ddTdd:dd:dd";

/// Position of a calendar day inside the 54 x 7 year grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateKey {
    pub year: i32,
    /// Adjusted ISO week, `0..=53`.
    pub week: u32,
    /// ISO weekday, Monday = 1 .. Sunday = 7.
    pub weekday: u32,
}

impl DateKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            week: adjusted_iso_week(date),
            weekday: iso_weekday(date),
        }
    }

    pub fn week_index(&self) -> usize {
        self.week as usize
    }

    /// Zero-based column, Monday = 0.
    pub fn day_index(&self) -> usize {
        (self.weekday - 1) as usize
    }
}

/// Creates a calendar date, `None` if the components are out of range.
pub fn create_utc_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Checks the exact `YYYY-MM-DDThh:mm:ss±hh:mm` layout before any value parsing.
/// A trailing `Z` stands in for `+00:00`.
fn has_strict_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    if bytes.len() != 20 && bytes.len() != 25 {
        return false;
    }
    let (body, offset) = bytes.split_at(BODY_TEMPLATE.len());

    let body_ok = body
        .iter()
        .zip(BODY_TEMPLATE)
        .all(|(b, t)| if *t == b'd' { b.is_ascii_digit() } else { b == t });

    let offset_ok = match offset {
        [b'Z'] => true,
        [sign, h1, h2, b':', m1, m2] => {
            matches!(*sign, b'+' | b'-')
                && [h1, h2, m1, m2].iter().all(|d| d.is_ascii_digit())
        }
        _ => false,
    };

    body_ok && offset_ok
}

/// Parses a strict ISO-8601 timestamp, keeping its offset.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>> {
    let invalid = || Error::InvalidFormat {
        input: raw.to_string(),
    };

    if !has_strict_shape(raw) {
        return Err(invalid());
    }

    let normalized: Cow<str> = match raw.strip_suffix('Z') {
        Some(body) => Cow::Owned(format!("{body}+00:00")),
        None => Cow::Borrowed(raw),
    };

    let instant = DateTime::parse_from_str(&normalized, TIMESTAMP_FORMAT).map_err(|_| invalid())?;
    // chrono reads second 60 as a leap second, carried in the nanoseconds.
    if instant.nanosecond() >= 1_000_000_000 {
        return Err(invalid());
    }
    Ok(instant)
}

/// Non-raising form of [`parse_timestamp`].
pub fn is_valid_timestamp(raw: &str) -> bool {
    parse_timestamp(raw).is_ok()
}

/// Normalizes a timestamp to the UTC calendar date it falls on.
pub fn to_canonical_date(raw: &str) -> Result<NaiveDate> {
    let instant = parse_timestamp(raw)?;
    Ok(instant.with_timezone(&Utc).date_naive())
}

/// Monday = 1 .. Sunday = 7.
pub fn iso_weekday(date: NaiveDate) -> u32 {
    date.weekday().number_from_monday()
}

/// Number of ISO-8601 weeks in the ISO week-numbering year `year`.
pub fn iso_weeks_in_year(year: i32) -> u32 {
    match NaiveDate::from_isoywd_opt(year, 53, Weekday::Mon) {
        Some(_) => 53,
        None => 52,
    }
}

/// ISO week number remapped onto the frame of the date's own calendar year.
///
/// - January days that belong to the previous ISO year's last week map to `0`.
/// - December days that belong to week 1 of the next ISO year map to
///   `iso_weeks_in_year(year) + 1`, counted for the calendar year so the
///   result never exceeds 53.
pub fn adjusted_iso_week(date: NaiveDate) -> u32 {
    let week = date.iso_week().week();
    match date.month() {
        1 if week > 50 => 0,
        12 if week < 10 => iso_weeks_in_year(date.year()) + 1,
        _ => week,
    }
}
