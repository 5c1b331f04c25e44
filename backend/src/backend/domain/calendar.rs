//! Calendar helpers for the journal.
//!
//! Month lengths, local-midnight normalization of save timestamps and the
//! clock abstraction used by the services. Statistics and generation only
//! ever see plain `NaiveDate`s produced here.

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc};

/// Get the number of days in a given month and year
pub fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Check if a year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Calendar day (in `tz`) on which an epoch-millis timestamp falls
pub fn local_day<Tz: TimeZone>(timestamp_millis: i64, tz: &Tz) -> Option<NaiveDate> {
    tz.timestamp_millis_opt(timestamp_millis)
        .single()
        .map(|dt| dt.date_naive())
}

/// Short local date as shown to the user, e.g. `05/01/2026`
pub fn format_display_date(date: NaiveDate) -> String {
    format!("{:02}/{:02}/{:04}", date.day(), date.month(), date.year())
}

/// First day of the journey for a target year
pub fn journey_start(target_year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(target_year, 1, 1)
}

/// Whether the journey has started: today is on or after January 1 of the
/// target year, or the lock has been lifted in configuration
pub fn journey_unlocked(today: NaiveDate, target_year: i32, force_unlock: bool) -> bool {
    force_unlock || journey_start(target_year).map_or(false, |start| today >= start)
}

/// Source of "now" for services. Everything date-related goes through the
/// same time zone so "today" and answer dates agree.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;

    /// Calendar day of an epoch-millis timestamp in the clock's time zone
    fn local_date(&self, timestamp_millis: i64) -> Option<NaiveDate>;

    fn today(&self) -> NaiveDate {
        let now = self.now_millis();
        self.local_date(now)
            .or_else(|| DateTime::from_timestamp_millis(now).map(|dt| dt.date_naive()))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Wall clock in the host's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn local_date(&self, timestamp_millis: i64) -> Option<NaiveDate> {
        local_day(timestamp_millis, &Local)
    }
}

/// A clock frozen at one instant in a fixed offset. Used by tests and tools.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now_millis: i64,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn new(now_millis: i64, offset: FixedOffset) -> Self {
        Self { now_millis, offset }
    }

    /// Clock at noon UTC of the given date
    pub fn at_noon_utc(date: NaiveDate) -> Self {
        let now_millis = date
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default();
        Self::new(now_millis, Utc.fix())
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.now_millis
    }

    fn local_date(&self, timestamp_millis: i64) -> Option<NaiveDate> {
        local_day(timestamp_millis, &self.offset)
    }
}
