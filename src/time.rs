//! Calendar values and pattern-driven time formatting.
//!
//! [`DateTime`] is a broken-down UTC time. [`UnixTime`] wraps seconds since
//! the epoch and converts on demand. [`format_time`] renders either through
//! a strftime-style pattern such as the active time locale's
//! `time_format`.
//!
//! Supported conversions: `%Y %y %C %m %d %e %H %I %M %S %p %r %T %R %D %F
//! %a %A %b %h %B %j %u %w %n %t %%`. Anything else is copied verbatim.

use core::fmt::{self, Write};

const SECS_PER_DAY: i64 = 86_400;

/// Latest year [`DateTime::new`] accepts; every such date fits in
/// [`UnixTime`].
pub const MAX_YEAR: i64 = i64::MAX / SECS_PER_DAY / 366;

/// Earliest year [`DateTime::new`] accepts.
pub const MIN_YEAR: i64 = -MAX_YEAR;

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Broken-down UTC time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    /// Full year (e.g. 2024). May be negative for proleptic dates.
    pub year: i64,
    /// Month (1-12).
    pub month: u8,
    /// Day of month (1-31).
    pub day: u8,
    /// Hour (0-23).
    pub hour: u8,
    /// Minute (0-59).
    pub minute: u8,
    /// Second (0-59).
    pub second: u8,
    /// Day of week (0 = Sunday).
    pub weekday: u8,
    /// Day of year (0-365).
    pub yearday: u16,
}

impl DateTime {
    /// Build a validated calendar value, deriving weekday and day of year.
    ///
    /// Returns `None` if any field is out of range for the given month, or
    /// the year lies outside [`MIN_YEAR`]..=[`MAX_YEAR`].
    #[must_use]
    pub fn new(year: i64, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Option<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return None;
        }
        if !(1..=12).contains(&month) || hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        if day == 0 || day > days_in_month(year, month) {
            return None;
        }

        let days = days_from_civil(year, month, day)?;
        let start = days_from_civil(year, 1, 1)?;
        Some(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            weekday: weekday_from_days(days),
            yearday: (days - start) as u16,
        })
    }

    /// Convert seconds since 1970-01-01T00:00:00Z.
    #[must_use]
    pub fn from_unix(secs: i64) -> Self {
        let days = secs.div_euclid(SECS_PER_DAY);
        let rem = secs.rem_euclid(SECS_PER_DAY);
        let (year, month, day) = civil_from_days(days);

        Self {
            year,
            month,
            day,
            hour: (rem / 3600) as u8,
            minute: ((rem % 3600) / 60) as u8,
            second: (rem % 60) as u8,
            weekday: weekday_from_days(days),
            yearday: days_from_civil(year, 1, 1).map_or(0, |start| (days - start) as u16),
        }
    }

    /// Seconds since the epoch for this value.
    ///
    /// Saturates at the `i64` bounds for hand-built values whose year is
    /// too far out to represent.
    #[must_use]
    pub fn to_unix(&self) -> i64 {
        let clock =
            i64::from(self.hour) * 3600 + i64::from(self.minute) * 60 + i64::from(self.second);
        let saturated = if self.year < 1970 { i64::MIN } else { i64::MAX };

        days_from_civil(self.year, self.month, self.day)
            .and_then(|days| days.checked_mul(SECS_PER_DAY))
            .and_then(|secs| secs.checked_add(clock))
            .unwrap_or(saturated)
    }

    fn hour12(&self) -> u8 {
        match self.hour % 12 {
            0 => 12,
            h => h,
        }
    }

    fn weekday_name(&self) -> &'static str {
        WEEKDAY_NAMES[usize::from(self.weekday % 7)]
    }

    fn month_name(&self) -> &'static str {
        MONTH_NAMES[usize::from(self.month.clamp(1, 12) - 1)]
    }
}

/// Seconds since the Unix epoch, printed as a calendar time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnixTime(pub i64);

impl From<UnixTime> for DateTime {
    fn from(time: UnixTime) -> Self {
        DateTime::from_unix(time.0)
    }
}

impl From<DateTime> for UnixTime {
    fn from(time: DateTime) -> Self {
        UnixTime(time.to_unix())
    }
}

#[must_use]
pub const fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[must_use]
pub const fn days_in_month(year: i64, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
///
/// `None` if the count does not fit in an `i64`.
fn days_from_civil(year: i64, month: u8, day: u8) -> Option<i64> {
    let month = i64::from(month);
    let year = if month <= 2 { year.checked_sub(1)? } else { year };
    let era = year.div_euclid(400);
    let yoe = year.rem_euclid(400);
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era.checked_mul(146_097)?.checked_add(doe - 719_468)
}

/// Inverse of [`days_from_civil`].
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

fn weekday_from_days(days: i64) -> u8 {
    // 1970-01-01 was a Thursday
    (days + 4).rem_euclid(7) as u8
}

/// Render `time` through a strftime-style `pattern`.
///
/// Errors only if `out` does.
pub fn format_time<W: Write>(out: &mut W, pattern: &str, time: &DateTime) -> fmt::Result {
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.write_char(c)?;
            continue;
        }

        let Some(spec) = chars.next() else {
            return out.write_char('%');
        };
        match spec {
            'Y' => write!(out, "{}", time.year)?,
            'y' => write!(out, "{:02}", time.year.rem_euclid(100))?,
            'C' => write!(out, "{:02}", time.year.div_euclid(100))?,
            'm' => write!(out, "{:02}", time.month)?,
            'd' => write!(out, "{:02}", time.day)?,
            'e' => write!(out, "{:2}", time.day)?,
            'H' => write!(out, "{:02}", time.hour)?,
            'I' => write!(out, "{:02}", time.hour12())?,
            'M' => write!(out, "{:02}", time.minute)?,
            'S' => write!(out, "{:02}", time.second)?,
            'p' => out.write_str(if time.hour < 12 { "AM" } else { "PM" })?,
            'r' => format_time(out, "%I:%M:%S %p", time)?,
            'T' => format_time(out, "%H:%M:%S", time)?,
            'R' => format_time(out, "%H:%M", time)?,
            'D' => format_time(out, "%m/%d/%y", time)?,
            'F' => format_time(out, "%Y-%m-%d", time)?,
            'a' => out.write_str(&time.weekday_name()[..3])?,
            'A' => out.write_str(time.weekday_name())?,
            'b' | 'h' => out.write_str(&time.month_name()[..3])?,
            'B' => out.write_str(time.month_name())?,
            'j' => write!(out, "{:03}", time.yearday.saturating_add(1))?,
            'u' => write!(out, "{}", if time.weekday == 0 { 7 } else { time.weekday })?,
            'w' => write!(out, "{}", time.weekday)?,
            'n' => out.write_char('\n')?,
            't' => out.write_char('\t')?,
            '%' => out.write_char('%')?,
            other => {
                out.write_char('%')?;
                out.write_char(other)?;
            }
        }
    }
    Ok(())
}
