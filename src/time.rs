//! # Time keeping: Julian Day, sidereal time and civil zones
//!
//! All astronomy in this crate runs on UTC [`Epoch`]s. Civil (zoned) times only appear at the
//! edges: when a configuration is read ([`civil_to_utc`]) and when an output row is labelled
//! ([`utc_to_civil`]).
//!
//! ```text
//! civil "2026-02-24T09:30:00" @ Asia/Kolkata ──civil_to_utc──▶ Epoch (UTC)
//!                                                              │
//!                                         julian_day_of ◀──────┘
//!                                               │
//!                       greenwich_mean_sidereal_time ──(+ east longitude)──▶ local_sidereal_time
//! ```
use std::str::FromStr;

use chrono::{DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use chrono_tz::Tz;
use hifitime::Epoch;

use crate::angles::wrap_360;
use crate::constants::{
    Degree, JulianDay, DAYS_PER_JULIAN_CENTURY, GMST_AT_J2000, GMST_RATE_PER_DAY, GMST_T2,
    GMST_T3_DIVISOR, J2000_JD,
};
use crate::skyplan_errors::SkyplanError;

/// Accepted layouts for naive civil timestamps.
const CIVIL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Julian Day of a proleptic Gregorian calendar date and time of day.
///
/// The integer part is the standard Julian Day Number obtained by day counting from
/// March-based years (`a = (14 - month) div 12`, `y = year + 4800 - a`, `m = month + 12a - 3`),
/// and the fractional part is `(hour - 12)/24 + minute/1440 + second/86400`, so that the day
/// starts at noon.
///
/// No range check is performed: an out-of-range month or day gives a mathematically defined
/// but astronomically meaningless value.
///
/// Argument
/// --------
/// * `year`, `month`, `day`: Gregorian calendar date (month 1–12)
/// * `hour`, `minute`: UTC time of day
/// * `second`: seconds, including any sub-second part
///
/// Return
/// ------
/// * the Julian Day as a float
pub fn julian_day(
    year: i32,
    month: i32,
    day: i32,
    hour: i32,
    minute: i32,
    second: f64,
) -> JulianDay {
    let a = (14 - month).div_euclid(12);
    let y = year as i64 + 4800 - a as i64;
    let m = (month + 12 * a - 3) as i64;

    let jdn = day as i64 + (153 * m + 2).div_euclid(5) + 365 * y + y.div_euclid(4)
        - y.div_euclid(100)
        + y.div_euclid(400)
        - 32045;

    jdn as f64 + (hour - 12) as f64 / 24.0 + minute as f64 / 1440.0 + second / 86400.0
}

/// Julian Day of a UTC epoch, computed from its Gregorian UTC components.
pub fn julian_day_of(epoch: &Epoch) -> JulianDay {
    let (year, month, day, hour, minute, second, nanos) = epoch.to_gregorian_utc();
    julian_day(
        year,
        month as i32,
        day as i32,
        hour as i32,
        minute as i32,
        second as f64 + nanos as f64 * 1e-9,
    )
}

/// Julian Day of the midnight (0h UT) preceding `jd`.
#[inline]
pub fn preceding_midnight(jd: JulianDay) -> JulianDay {
    (jd + 0.5).floor() - 0.5
}

/// Greenwich Mean Sidereal Time, in degrees within [0, 360).
///
/// Evaluates the IAU mean sidereal time polynomial
/// `280.46061837 + 360.98564736629·(JD − 2451545) + 0.000387933·T² − T³/38710000`,
/// where the linear term uses the full Julian Day and `T` counts Julian centuries from
/// J2000.0 to the **preceding midnight** of `jd`.
///
/// Argument
/// --------
/// * `jd`: Julian Day (UTC)
///
/// Return
/// ------
/// * GMST in degrees, reduced modulo 360
pub fn greenwich_mean_sidereal_time(jd: JulianDay) -> Degree {
    let t = (preceding_midnight(jd) - J2000_JD) / DAYS_PER_JULIAN_CENTURY;

    let gmst = GMST_AT_J2000 + GMST_RATE_PER_DAY * (jd - J2000_JD) + GMST_T2 * (t * t)
        - (t * t * t) / GMST_T3_DIVISOR;

    wrap_360(gmst)
}

/// Local Mean Sidereal Time at an east-positive longitude, in degrees within [0, 360).
///
/// The epoch must already be UTC; zone conversion is the caller's job (see
/// [`civil_to_utc`]).
///
/// Arguments
/// ---------
/// * `east_longitude`: observer longitude in degrees, east positive
/// * `epoch`: instant of observation (UTC)
pub fn local_sidereal_time(east_longitude: Degree, epoch: &Epoch) -> Degree {
    let gmst = greenwich_mean_sidereal_time(julian_day_of(epoch));
    wrap_360(gmst + wrap_360(east_longitude))
}

/// Parse an ISO 8601 instant such as `"2026-02-24T04:00:00 UTC"` into an epoch.
///
/// Strings without a time scale suffix are read as UTC.
pub fn parse_utc_epoch(date: &str) -> Result<Epoch, SkyplanError> {
    Epoch::from_str(date.trim())
        .map_err(|e| SkyplanError::TimeConversionError(format!("'{date}': {e}")))
}

/// Resolve an IANA zone name (`"Asia/Kolkata"`, `"UTC"`, …).
pub fn parse_zone(name: &str) -> Result<Tz, SkyplanError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| SkyplanError::TimeConversionError(format!("unknown time zone '{name}': {e}")))
}

/// Parse a naive civil timestamp (`YYYY-MM-DDTHH:MM:SS` or with a space separator).
pub fn parse_naive(date: &str) -> Result<NaiveDateTime, SkyplanError> {
    let trimmed = date.trim();
    CIVIL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| {
            SkyplanError::TimeConversionError(format!(
                "'{date}' is not a YYYY-MM-DDTHH:MM:SS timestamp"
            ))
        })
}

/// Localize a naive civil time in `zone` and convert it to a UTC epoch.
///
/// Fails with [`SkyplanError::TimeConversionError`] when the wall-clock time is ambiguous
/// (repeated during a daylight-saving fold) or does not exist (skipped by a gap). No offset is
/// ever guessed.
pub fn civil_to_utc(naive: &NaiveDateTime, zone: Tz) -> Result<Epoch, SkyplanError> {
    let zoned = match zone.from_local_datetime(naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(first, second) => {
            return Err(SkyplanError::TimeConversionError(format!(
                "{naive} is ambiguous in {zone} (offsets {} and {})",
                first.offset(),
                second.offset()
            )))
        }
        LocalResult::None => {
            return Err(SkyplanError::TimeConversionError(format!(
                "{naive} does not exist in {zone}"
            )))
        }
    };
    epoch_from_naive_utc(&zoned.naive_utc())
}

/// Build a UTC epoch from a naive date-time already expressed in UTC.
pub fn epoch_from_naive_utc(utc: &NaiveDateTime) -> Result<Epoch, SkyplanError> {
    Epoch::maybe_from_gregorian_utc(
        utc.year(),
        utc.month() as u8,
        utc.day() as u8,
        utc.hour() as u8,
        utc.minute() as u8,
        utc.second() as u8,
        utc.nanosecond(),
    )
    .map_err(|e| SkyplanError::TimeConversionError(format!("{utc} UTC: {e}")))
}

/// Express a UTC epoch as a zoned civil date-time, for display only.
///
/// Fails when the epoch falls on a leap second, which civil calendars cannot label.
pub fn utc_to_civil(epoch: &Epoch, zone: Tz) -> Result<DateTime<Tz>, SkyplanError> {
    let (year, month, day, hour, minute, second, nanos) = epoch.to_gregorian_utc();
    let naive = NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .and_then(|date| date.and_hms_nano_opt(hour as u32, minute as u32, second as u32, nanos))
        .ok_or_else(|| {
            SkyplanError::TimeConversionError(format!("{epoch} has no civil representation"))
        })?;
    Ok(zone.from_utc_datetime(&naive))
}
