//! Wall-clock formatting capability and the arithmetic built on top of it.
//!
//! The scanner never asks a time zone for its offset directly. Everything is
//! derived from one primitive: format an instant as a local wall-clock string.
//! The helpers here turn those strings back into numbers:
//!
//! - [`seconds_of_day`] reads the `HH:MM:SS` field as seconds since local
//!   midnight, which is all the binary search needs.
//! - [`reinterpret_as_utc`] reads the whole string as if it were a UTC
//!   date-time; subtracting the real instant yields the offset.

use jiff::{
    civil::DateTime,
    fmt::strtime,
    tz::TimeZone,
    Timestamp,
};

use crate::{
    error::{FormatterResultExt, Result, ScanError},
    models::{EpochMillis, OffsetMinutes, TimeZoneId},
};

/// Layout of every wall-clock string: local date, a space, then 24-hour time.
pub const WALL_CLOCK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Maps a UTC instant to a local wall-clock string for one fixed zone.
///
/// Implementations must be pure: the same instant always yields the same
/// string, and the output follows [`WALL_CLOCK_FORMAT`].
pub trait WallClockFormatter {
    /// The zone this formatter is bound to.
    fn zone(&self) -> &TimeZoneId;

    /// Formats `instant` as local wall-clock time.
    fn format(&self, instant: EpochMillis) -> Result<String>;
}

impl<F: WallClockFormatter + ?Sized> WallClockFormatter for &F {
    fn zone(&self) -> &TimeZoneId {
        (**self).zone()
    }

    fn format(&self, instant: EpochMillis) -> Result<String> {
        (**self).format(instant)
    }
}

/// A [`WallClockFormatter`] backed by the IANA time zone database.
#[derive(Debug, Clone)]
pub struct ZoneFormatter {
    id: TimeZoneId,
    tz: TimeZone,
}

impl ZoneFormatter {
    /// Looks up `name` in the time zone database.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::UnknownZone` if the database has no such zone.
    pub fn new(name: &str) -> Result<Self> {
        let tz = TimeZone::get(name).map_err(|source| ScanError::UnknownZone {
            name: name.to_string(),
            source,
        })?;
        Ok(Self {
            id: TimeZoneId::new(name),
            tz,
        })
    }
}

impl WallClockFormatter for ZoneFormatter {
    fn zone(&self) -> &TimeZoneId {
        &self.id
    }

    fn format(&self, instant: EpochMillis) -> Result<String> {
        let zone = self.id.as_str();
        let timestamp = Timestamp::from_millisecond(instant).formatter_context(zone, instant)?;
        strtime::format(WALL_CLOCK_FORMAT, self.tz.to_datetime(timestamp))
            .formatter_context(zone, instant)
    }
}

/// Returns the `HH:MM:SS` part of a wall-clock string.
pub fn time_of_day<'s>(zone: &TimeZoneId, wall_clock: &'s str) -> Result<&'s str> {
    match wall_clock.rsplit_once(' ') {
        Some((_, time)) if time.len() == 8 => Ok(time),
        _ => Err(ScanError::formatter(zone.as_str()).malformed(wall_clock)),
    }
}

/// Parses the time-of-day field into seconds since local midnight.
pub fn seconds_of_day(zone: &TimeZoneId, wall_clock: &str) -> Result<i64> {
    let malformed = || ScanError::formatter(zone.as_str()).malformed(wall_clock);
    let time = time_of_day(zone, wall_clock)?;
    let bytes = time.as_bytes();
    if bytes[2] != b':' || bytes[5] != b':' {
        return Err(malformed());
    }

    let field = |range: std::ops::Range<usize>, max: i64| -> Result<i64> {
        let digits = &time[range];
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let value: i64 = digits.parse().map_err(|_| malformed())?;
        if value > max {
            return Err(malformed());
        }
        Ok(value)
    };

    Ok(field(0..2, 23)? * 3600 + field(3..5, 59)? * 60 + field(6..8, 59)?)
}

/// Reads a wall-clock string as if it were a UTC date-time.
pub fn reinterpret_as_utc(zone: &TimeZoneId, wall_clock: &str) -> Result<EpochMillis> {
    let malformed = || ScanError::formatter(zone.as_str()).malformed(wall_clock);
    let civil = DateTime::strptime(WALL_CLOCK_FORMAT, wall_clock).map_err(|_| malformed())?;
    let zoned = civil.to_zoned(TimeZone::UTC).map_err(|_| malformed())?;
    Ok(zoned.timestamp().as_millisecond())
}

/// Rounds a millisecond delta to the nearest whole minute, halves rounding up.
pub fn round_to_minutes(delta: i64) -> i64 {
    let minutes = delta.div_euclid(MILLIS_PER_MINUTE);
    minutes + i64::from(delta.rem_euclid(MILLIS_PER_MINUTE) >= MILLIS_PER_MINUTE / 2)
}

/// The zone's UTC offset at `instant`, derived from the formatter alone.
///
/// Sub-second precision lost by the formatter is absorbed by rounding, so any
/// millisecond inside a second gives the same answer.
///
/// # Errors
///
/// Propagates formatter failures, and returns `ScanError::MalformedWallClock`
/// when the wall-clock reading is too far from `instant` to be an offset.
pub fn offset_minutes_at<F>(formatter: &F, instant: EpochMillis) -> Result<OffsetMinutes>
where
    F: WallClockFormatter + ?Sized,
{
    let zone = formatter.zone();
    let wall_clock = formatter.format(instant)?;
    let local = reinterpret_as_utc(zone, &wall_clock)?;
    local
        .checked_sub(instant)
        .map(round_to_minutes)
        .and_then(|minutes| OffsetMinutes::try_from(minutes).ok())
        .ok_or_else(|| ScanError::formatter(zone.as_str()).malformed(wall_clock))
}
