//! Data models produced by the scanner and the grouper.
//!
//! Every value here is transient: it is derived for one query and handed to
//! the caller, never cached. Offsets are always computed from an instant and
//! are never stored apart from the instant they apply to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch, UTC.
pub type EpochMillis = i64;

/// Signed minutes east of UTC.
pub type OffsetMinutes = i32;

/// An opaque time zone identifier such as `"Europe/Paris"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeZoneId(String);

impl TimeZoneId {
    /// Wraps a zone name without validating it.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the zone name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimeZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TimeZoneId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TimeZoneId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A change of UTC offset.
///
/// `instant` is the last millisecond that still carries `offset_before`;
/// `offset_after` holds from `instant + 1` on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub instant: EpochMillis,
    pub offset_before: OffsetMinutes,
    pub offset_after: OffsetMinutes,
}

impl Transition {
    /// First millisecond of the new offset.
    pub fn takes_effect(&self) -> EpochMillis {
        self.instant + 1
    }

    /// Signed change in minutes, positive when clocks move forward.
    pub fn shift_minutes(&self) -> OffsetMinutes {
        self.offset_after - self.offset_before
    }
}

/// Zones sharing the same offset at the origin of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetGroup {
    pub offset_minutes: OffsetMinutes,
    pub members: Vec<TimeZoneId>,
}

/// Per-location result of a grouping query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationOffsetView {
    pub zone: TimeZoneId,
    /// Key of the [`OffsetGroup`] this location belongs to.
    pub offset_group: OffsetMinutes,
    pub next_transition: Option<EpochMillis>,
    pub next_offset: Option<OffsetMinutes>,
}

impl LocationOffsetView {
    /// The upcoming transition as a full [`Transition`], if one was found.
    pub fn transition(&self) -> Option<Transition> {
        match (self.next_transition, self.next_offset) {
            (Some(instant), Some(offset_after)) => Some(Transition {
                instant,
                offset_before: self.offset_group,
                offset_after,
            }),
            _ => None,
        }
    }
}

/// A location whose derivation failed; presented as "offset unknown".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationFailure {
    pub zone: TimeZoneId,
    pub reason: String,
}

/// Result of grouping a set of locations at one origin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingReport {
    pub origin: EpochMillis,
    pub horizon_months: u32,
    /// Ordered by ascending offset.
    pub groups: Vec<OffsetGroup>,
    /// In the order the locations were supplied.
    pub views: Vec<LocationOffsetView>,
    pub failures: Vec<LocationFailure>,
}

impl GroupingReport {
    /// Looks up the view for a zone.
    pub fn view(&self, zone: &str) -> Option<&LocationOffsetView> {
        self.views.iter().find(|v| v.zone.as_str() == zone)
    }

    /// Looks up the group holding a zone.
    pub fn group_of(&self, zone: &str) -> Option<&OffsetGroup> {
        let key = self.view(zone)?.offset_group;
        self.groups.iter().find(|g| g.offset_minutes == key)
    }

    /// Folds another partial report computed at the same origin into this
    /// one. Views and failures are appended; groups with equal offsets merge.
    pub fn merge(&mut self, other: GroupingReport) {
        self.views.extend(other.views);
        self.failures.extend(other.failures);
        for group in other.groups {
            match self
                .groups
                .iter_mut()
                .find(|g| g.offset_minutes == group.offset_minutes)
            {
                Some(existing) => existing.members.extend(group.members),
                None => self.groups.push(group),
            }
        }
        self.groups.sort_by_key(|g| g.offset_minutes);
    }
}
