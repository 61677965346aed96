use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use rand::Rng;
use serde::{Serialize, Serializer};

use crate::error::ValidationError;

/// Every generated interval fits into this many days after the base date.
pub const INTERVAL_WINDOW_DAYS: u32 = 365;
/// Upper bound on the up-front allocation for generated samples.
pub(crate) const MAX_PREALLOCATED_SAMPLES: usize = 4096;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A `start/end` pair rendered as `<start>Z/<end>Z`.
///
/// The trailing `Z` is appended literally; timestamps are naive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeInterval {
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end.signed_duration_since(self.start)
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Z/{}Z",
            self.start.format(TIMESTAMP_FORMAT),
            self.end.format(TIMESTAMP_FORMAT)
        )
    }
}

impl Serialize for TimeInterval {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalParams {
    pub start_date: NaiveDateTime,
    pub min_duration_days: u32,
    pub max_duration_days: u32,
}

impl Default for IntervalParams {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            min_duration_days: 5,
            max_duration_days: 31,
        }
    }
}

impl IntervalParams {
    /// Checks the duration bounds against the one-year window.
    ///
    /// # Errors
    ///
    /// Returns an error when `min` is zero, `min > max`, or `max` exceeds the
    /// window.
    pub const fn validate(&self) -> Result<(), ValidationError> {
        if self.min_duration_days == 0 {
            return Err(ValidationError::MinDurationZero);
        }
        if self.min_duration_days > self.max_duration_days {
            return Err(ValidationError::DurationRangeInverted {
                min: self.min_duration_days,
                max: self.max_duration_days,
            });
        }
        if self.max_duration_days > INTERVAL_WINDOW_DAYS {
            return Err(ValidationError::DurationExceedsWindow {
                max: self.max_duration_days,
                window: INTERVAL_WINDOW_DAYS,
            });
        }
        Ok(())
    }
}

/// 2024-11-01T00:00:00.
#[must_use]
pub fn default_start_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 11, 1)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
}

/// Parses a base date given as `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`.
///
/// # Errors
///
/// Returns an error when the value matches neither form.
pub fn parse_start_date(value: &str) -> Result<NaiveDateTime, ValidationError> {
    let trimmed = value.trim();
    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT) {
        return Ok(datetime);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_err| ValidationError::InvalidDate {
            value: value.to_owned(),
        })
}

fn add_days(base: NaiveDateTime, days: u32) -> Result<NaiveDateTime, ValidationError> {
    base.checked_add_signed(TimeDelta::days(i64::from(days)))
        .ok_or_else(|| ValidationError::DateOutOfRange {
            value: base.format(TIMESTAMP_FORMAT).to_string(),
            days,
        })
}

/// Generates `count` intervals starting `0..=365 - max` days after the base
/// date and lasting `min..=max` days.
///
/// # Errors
///
/// Returns an error for invalid duration bounds or when a date overflows.
pub fn generate_time_intervals_with<R>(
    rng: &mut R,
    count: usize,
    params: &IntervalParams,
) -> Result<Vec<TimeInterval>, ValidationError>
where
    R: Rng + ?Sized,
{
    params.validate()?;
    let latest_offset = INTERVAL_WINDOW_DAYS.saturating_sub(params.max_duration_days);

    let mut intervals = Vec::with_capacity(count.min(MAX_PREALLOCATED_SAMPLES));
    for _ in 0..count {
        let offset = rng.gen_range(0..=latest_offset);
        let duration = rng.gen_range(params.min_duration_days..=params.max_duration_days);
        let start = add_days(params.start_date, offset)?;
        let end = add_days(start, duration)?;
        intervals.push(TimeInterval { start, end });
    }
    Ok(intervals)
}

/// Same as [`generate_time_intervals_with`] using the thread-local random source.
///
/// # Errors
///
/// Returns an error for invalid duration bounds or when a date overflows.
pub fn generate_time_intervals(
    count: usize,
    params: &IntervalParams,
) -> Result<Vec<TimeInterval>, ValidationError> {
    generate_time_intervals_with(&mut rand::thread_rng(), count, params)
}
