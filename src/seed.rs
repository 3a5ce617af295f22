//! Weekly seed derivation
//!
//! Everyone playing during the same calendar week (Sunday through Saturday)
//! gets the same corridor. The seed is a plain string so it can be shown in
//! the UI and typed back in for a replay.

use std::fmt;

use serde::{Deserialize, Serialize};

const MS_PER_DAY: i64 = 86_400_000;

/// A date reduced to the three fields week numbering needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
    pub year: i32,
    /// Days since January 1st of `year` (0-based)
    pub day_of_year: u32,
    /// Day of the week, 0 = Sunday
    pub weekday: u32,
}

impl CalendarDate {
    /// Calendar date for a Unix timestamp, shifted into a local time zone
    pub fn from_unix_millis(unix_ms: i64, utc_offset_minutes: i32) -> Self {
        let local_ms = unix_ms + i64::from(utc_offset_minutes) * 60_000;
        let days = local_ms.div_euclid(MS_PER_DAY);
        let year = year_from_days(days);
        let jan_1 = days_from_civil_jan_1(year);
        Self {
            year,
            day_of_year: (days - jan_1) as u32,
            weekday: weekday_from_days(days),
        }
    }

    /// Current date in UTC
    #[cfg(not(target_arch = "wasm32"))]
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let unix_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as i64);
        Self::from_unix_millis(unix_ms, 0)
    }

    /// Current date on the browser's local clock
    #[cfg(target_arch = "wasm32")]
    pub fn now() -> Self {
        let date = js_sys::Date::new_0();
        // getTimezoneOffset is UTC minus local, in minutes
        let offset = -(date.get_timezone_offset() as i32);
        Self::from_unix_millis(date.get_time() as i64, offset)
    }

    /// Weekday January 1st fell on
    pub fn jan_1_weekday(&self) -> u32 {
        (self.weekday + 7 - self.day_of_year % 7) % 7
    }

    /// 1-based week of the year. Weeks start on Sunday; the partial week
    /// containing January 1st is week 1.
    pub fn week_number(&self) -> u32 {
        (self.jan_1_weekday() + 1 + self.day_of_year).div_ceil(7)
    }
}

/// Opaque run seed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(String);

impl Seed {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Seed shared by every run in the calendar week containing `date`
    pub fn weekly(date: CalendarDate) -> Self {
        Self(format!("week_{}_{}", date.year, date.week_number()))
    }

    /// Seed for the current week
    pub fn this_week() -> Self {
        let seed = Self::weekly(CalendarDate::now());
        log::info!("Derived weekly seed: {}", seed);
        seed
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Seed {
    fn from(value: String) -> Self {
        Self(value)
    }
}

fn weekday_from_days(days: i64) -> u32 {
    // 1970-01-01 was a Thursday
    (days + 4).rem_euclid(7) as u32
}

/// Proleptic Gregorian year containing the given day count since 1970-01-01
fn year_from_days(days: i64) -> i32 {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400;
    (if month <= 2 { year + 1 } else { year }) as i32
}

/// Day count since 1970-01-01 of January 1st of `year`
fn days_from_civil_jan_1(year: i32) -> i64 {
    // March-based year: January belongs to the previous one
    let y = i64::from(year) - 1;
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let doy = 306;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}
