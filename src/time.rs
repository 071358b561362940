//! Calendar parts derived from epoch timestamps
//!
//! Pure functions of `(epoch seconds, time zone)`. Day-of-week follows the
//! Sunday=1 .. Saturday=7 numbering, and the `weekday` flag is
//! `day_of_week % 7 < 2`, which holds on Saturday and Sunday.

use chrono::{DateTime, Datelike, Timelike};
use chrono_tz::Tz;

/// Calendar breakdown of one event timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeParts {
    /// Epoch seconds the parts were derived from
    pub epoch_seconds: i64,
    pub hour: i32,
    /// Day of month
    pub day: i32,
    /// ISO week of year
    pub week: i32,
    pub month: i32,
    pub year: i32,
    pub weekday: bool,
}

impl TimeParts {
    /// Derive parts for an epoch timestamp in the given zone
    ///
    /// Returns `None` for timestamps chrono cannot represent.
    pub fn derive(epoch_seconds: i64, tz: Tz) -> Option<Self> {
        let local = to_local(epoch_seconds, tz)?;
        Some(Self {
            epoch_seconds,
            hour: local.hour() as i32,
            day: local.day() as i32,
            week: local.iso_week().week() as i32,
            month: local.month() as i32,
            year: local.year(),
            weekday: weekday_flag(day_of_week(&local)),
        })
    }

    /// Timestamp in microseconds, the unit written to Parquet
    pub fn micros(&self) -> i64 {
        self.epoch_seconds.saturating_mul(1_000_000)
    }
}

/// Convert epoch seconds into a zoned timestamp
pub fn to_local(epoch_seconds: i64, tz: Tz) -> Option<DateTime<Tz>> {
    DateTime::from_timestamp(epoch_seconds, 0).map(|utc| utc.with_timezone(&tz))
}

/// Day of week numbered Sunday=1 .. Saturday=7
pub fn day_of_week<D: Datelike>(date: &D) -> u32 {
    date.weekday().number_from_sunday()
}

/// `day_of_week % 7 < 2`: true for Saturday (7) and Sunday (1)
pub fn weekday_flag(day_of_week: u32) -> bool {
    day_of_week % 7 < 2
}
