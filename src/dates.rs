//! Calendar and time-of-day helpers shared by the derivation layer.
//!
//! Records carry a calendar date plus a 24-hour `HH:MM` time; sorting and
//! future/past comparisons combine the two into a single instant. The current
//! time is always an explicit parameter, never read inline.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::store::StoreError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

const SECS_PER_DAY: i64 = 86_400;

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| StoreError::InvalidField {
        field: "date".into(),
        value: raw.into(),
    })
}

/// Parses a 24-hour `HH:MM` time; accepts `HH:MM:SS` for lenience, dropping
/// the seconds. Record times carry minute precision end to end.
pub fn parse_time(raw: &str) -> Result<NaiveTime, StoreError> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map(truncate_to_minute)
        .map_err(|_| StoreError::InvalidField {
            field: "time".into(),
            value: raw.into(),
        })
}

/// Drops the seconds from a wall-clock reading before it lands in a record.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Parses a date string and a time string into one comparable instant.
pub fn combine_date_time(date: &str, time: &str) -> Result<NaiveDateTime, StoreError> {
    Ok(parse_date(date)?.and_time(parse_time(time)?))
}

/// Combines typed record fields into a sortable instant.
pub fn instant(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(time)
}

/// True iff both instants fall on the same calendar date, time ignored.
pub fn is_same_calendar_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date()
}

/// Whole days until `target`'s midnight, rounded up; negative once past.
///
/// A refill date later today yields 0, tomorrow yields 1, yesterday -1.
pub fn days_until(target: NaiveDate, now: NaiveDateTime) -> i64 {
    let secs = (target.and_time(NaiveTime::MIN) - now).num_seconds();
    secs.div_euclid(SECS_PER_DAY) + i64::from(secs.rem_euclid(SECS_PER_DAY) > 0)
}
