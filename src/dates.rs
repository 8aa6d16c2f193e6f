//! Date/Time Classification
//!
//! Normalises the date and time strings carried by salon records and measures
//! them against the current instant in the salon's own timezone.

use jiff::{
    Timestamp,
    civil::{Date, Time},
    tz::TimeZone,
};
use thiserror::Error;

/// Date or time input that cannot be classified.
#[derive(Debug, Clone, Error)]
pub enum InvalidDateError {
    /// The value is not a calendar date.
    #[error("`{input}` is not a calendar date")]
    Date {
        /// Raw value as received.
        input: String,

        /// Parser failure.
        #[source]
        source: jiff::Error,
    },

    /// The value is not a 24-hour clock time.
    #[error("`{input}` is not a clock time")]
    Time {
        /// Raw value as received.
        input: String,

        /// Parser failure.
        #[source]
        source: jiff::Error,
    },

    /// The date and time cannot be placed on the timeline in the salon timezone.
    #[error("{date} {time} cannot be resolved in the salon timezone")]
    OutOfRange {
        /// Calendar date.
        date: Date,

        /// Clock time.
        time: Time,

        /// Timezone conversion failure.
        #[source]
        source: jiff::Error,
    },
}

/// Parse a calendar date, keeping only the date portion of date-time strings.
///
/// Accepts `YYYY-MM-DD` as well as values such as `2024-01-20T00:00:00Z`,
/// `2024-01-20T10:00:00-05:00` or `2024-01-20 10:00:00`. Any embedded time or
/// offset is informational only and is discarded, so the date never drifts
/// across a day boundary.
///
/// # Errors
///
/// Returns [`InvalidDateError::Date`] when the date portion is not a valid
/// calendar date.
pub fn parse_calendar_date(input: &str) -> Result<Date, InvalidDateError> {
    let trimmed = input.trim();

    let calendar = trimmed
        .split_once(['T', 't', ' '])
        .map_or(trimmed, |(date, _marker)| date);

    calendar
        .parse::<Date>()
        .map_err(|source| InvalidDateError::Date {
            input: input.to_owned(),
            source,
        })
}

/// Parse a salon-local clock time (`HH:MM` or `HH:MM:SS`, 24-hour).
///
/// # Errors
///
/// Returns [`InvalidDateError::Time`] when the value is not a clock time.
pub fn parse_clock_time(input: &str) -> Result<Time, InvalidDateError> {
    input
        .trim()
        .parse::<Time>()
        .map_err(|source| InvalidDateError::Time {
            input: input.to_owned(),
            source,
        })
}

/// The salon's calendar date at `now`.
pub fn local_today(now: Timestamp, timezone: &TimeZone) -> Date {
    now.to_zoned(timezone.clone()).date()
}

/// Whole calendar days from `today` to `target`.
///
/// Negative when `target` is in the past. Both sides are dates, so the result
/// is the midnight-to-midnight delta rounded to days, and stays exact across
/// daylight saving transitions.
pub fn days_between(today: Date, target: Date) -> i32 {
    (target - today).get_days()
}

/// Day delta between a raw date string and the salon's current date.
///
/// The time of day of `now` never changes the result.
///
/// # Errors
///
/// Returns [`InvalidDateError::Date`] when `target` cannot be parsed.
pub fn day_delta(target: &str, now: Timestamp, timezone: &TimeZone) -> Result<i32, InvalidDateError> {
    let target = parse_calendar_date(target)?;

    Ok(days_between(local_today(now, timezone), target))
}

/// The instant at which a salon-local `date` and `time` occur.
///
/// Times skipped by a daylight saving gap resolve forward, repeated times
/// resolve to their first occurrence.
///
/// # Errors
///
/// Returns [`InvalidDateError::OutOfRange`] when the combination falls
/// outside the supported timeline.
pub fn scheduled_instant(
    date: Date,
    time: Time,
    timezone: &TimeZone,
) -> Result<Timestamp, InvalidDateError> {
    date.to_datetime(time)
        .to_zoned(timezone.clone())
        .map(|zoned| zoned.timestamp())
        .map_err(|source| InvalidDateError::OutOfRange { date, time, source })
}
