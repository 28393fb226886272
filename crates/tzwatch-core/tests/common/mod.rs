#![allow(dead_code)]

use jiff::{fmt::strtime, tz::TimeZone, Timestamp};
use tzwatch_core::{
    wallclock::WALL_CLOCK_FORMAT, EpochMillis, OffsetMinutes, ScanError, TimeZoneId,
    WallClockFormatter,
};

/// Parses an RFC 3339 timestamp into epoch milliseconds.
pub fn ms(s: &str) -> EpochMillis {
    s.parse::<Timestamp>()
        .expect("Failed to parse timestamp")
        .as_millisecond()
}

/// A formatter driven by an explicit transition table.
///
/// `changes` holds `(first instant of the new offset, new offset)` pairs in
/// ascending order.
pub struct RuleFormatter {
    zone: TimeZoneId,
    initial: OffsetMinutes,
    changes: Vec<(EpochMillis, OffsetMinutes)>,
}

impl RuleFormatter {
    pub fn new(zone: &str, initial: OffsetMinutes, changes: &[(&str, OffsetMinutes)]) -> Self {
        Self {
            zone: TimeZoneId::new(zone),
            initial,
            changes: changes.iter().map(|&(at, offset)| (ms(at), offset)).collect(),
        }
    }

    pub fn offset_at(&self, instant: EpochMillis) -> OffsetMinutes {
        self.changes
            .iter()
            .take_while(|&&(at, _)| at <= instant)
            .last()
            .map_or(self.initial, |&(_, offset)| offset)
    }
}

impl WallClockFormatter for RuleFormatter {
    fn zone(&self) -> &TimeZoneId {
        &self.zone
    }

    fn format(&self, instant: EpochMillis) -> tzwatch_core::Result<String> {
        let local = instant + i64::from(self.offset_at(instant)) * 60_000;
        let timestamp = Timestamp::from_millisecond(local)
            .map_err(|e| ScanError::formatter(self.zone.as_str()).at(instant, e))?;
        strtime::format(WALL_CLOCK_FORMAT, TimeZone::UTC.to_datetime(timestamp))
            .map_err(|e| ScanError::formatter(self.zone.as_str()).at(instant, e))
    }
}

/// A formatter that always fails, like an unknown zone would.
pub struct FailingFormatter(pub TimeZoneId);

impl WallClockFormatter for FailingFormatter {
    fn zone(&self) -> &TimeZoneId {
        &self.0
    }

    fn format(&self, instant: EpochMillis) -> tzwatch_core::Result<String> {
        Err(ScanError::formatter(self.0.as_str()).at(instant, "zone not available"))
    }
}

/// A formatter whose output is not a wall-clock string.
pub struct GarbageFormatter(pub TimeZoneId);

impl WallClockFormatter for GarbageFormatter {
    fn zone(&self) -> &TimeZoneId {
        &self.0
    }

    fn format(&self, _instant: EpochMillis) -> tzwatch_core::Result<String> {
        Ok("half past nine".to_string())
    }
}
