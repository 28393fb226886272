//! Parameter structures for tzwatch operations
//!
//! These structures are shared across interfaces (the CLI today) and carry no
//! framework-specific derives beyond serde. Interface layers define their own
//! wrappers (clap arguments, for instance) and convert into these via `From`.
//!
//! Every optional field has a documented default:
//!
//! - `origin`: now, rounded down to a 5-minute boundary
//! - `horizon_months`: [`DEFAULT_HORIZON_MONTHS`]
//! - `zones`: every zone the survey was built with

use serde::{Deserialize, Serialize};

use crate::{
    calendar::now_origin,
    models::EpochMillis,
};

/// How far ahead the next transition is searched, in months.
pub const DEFAULT_HORIZON_MONTHS: u32 = 28;

fn default_horizon() -> u32 {
    DEFAULT_HORIZON_MONTHS
}

/// Parameters for grouping zones by their current offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOffsets {
    /// Reference instant in epoch milliseconds
    #[serde(default)]
    pub origin: Option<EpochMillis>,
    /// Look-ahead window for the next transition
    #[serde(default = "default_horizon")]
    pub horizon_months: u32,
    /// Restrict the query to these zones
    #[serde(default)]
    pub zones: Option<Vec<String>>,
}

impl Default for GroupOffsets {
    fn default() -> Self {
        Self {
            origin: None,
            horizon_months: DEFAULT_HORIZON_MONTHS,
            zones: None,
        }
    }
}

impl GroupOffsets {
    /// The explicit origin, or now rounded down to 5 minutes.
    pub fn resolved_origin(&self) -> EpochMillis {
        self.origin.unwrap_or_else(now_origin)
    }
}

/// Parameters for finding the next transition of a single zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextTransition {
    /// The zone to scan
    pub zone: String,
    /// Reference instant in epoch milliseconds
    #[serde(default)]
    pub origin: Option<EpochMillis>,
    /// Look-ahead window
    #[serde(default = "default_horizon")]
    pub horizon_months: u32,
}

impl NextTransition {
    /// Parameters for `zone` with every other field defaulted.
    pub fn for_zone(zone: impl Into<String>) -> Self {
        Self {
            zone: zone.into(),
            origin: None,
            horizon_months: DEFAULT_HORIZON_MONTHS,
        }
    }

    pub fn resolved_origin(&self) -> EpochMillis {
        self.origin.unwrap_or_else(now_origin)
    }
}

/// Parameters for listing every transition of a zone in a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTransitions {
    /// The zone to scan
    pub zone: String,
    /// Start of the range; defaults to now (not rounded)
    #[serde(default)]
    pub from: Option<EpochMillis>,
    /// End of the range; defaults to about 14 months after `from`
    #[serde(default)]
    pub until: Option<EpochMillis>,
}
