//! Core library for locating time zone offset transitions.
//!
//! The crate finds the instants at which a zone's UTC offset changes using a
//! single capability: formatting an instant as local wall-clock time. It
//! never reads transition tables itself; the [`WallClockFormatter`] is the only
//! source of truth, backed in production by the IANA database via `jiff`.
//!
//! # Architecture
//!
//! - [`scanner`]: month-boundary coarse scan and the binary search that pins a
//!   transition down to the last millisecond of the old offset
//! - [`grouper`]: offsets at an origin, next transitions, grouping by offset
//! - [`wallclock`]: the formatter trait and wall-clock string arithmetic
//! - [`registry`]: interned zone set built once and shared by reference
//! - [`survey`]: async facade running the above on tokio's blocking pool
//!
//! # Quick Start
//!
//! ```rust
//! use tzwatch_core::{find_transition, ZoneFormatter};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let paris = ZoneFormatter::new("Europe/Paris")?;
//! // 2024-03-01T00:00:00Z .. 2024-04-01T00:00:00Z
//! let instant = find_transition(&paris, 1_709_251_200_000, 1_711_929_600_000)?;
//! assert_eq!(instant, 1_711_846_799_999); // 2024-03-31T00:59:59.999Z
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! Grouping many zones at once goes through [`Survey`]:
//!
//! ```rust
//! use tzwatch_core::{params::GroupOffsets, CancelToken, SurveyBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let survey = SurveyBuilder::new()
//!     .with_zones(Some(["Europe/Paris", "Africa/Lagos", "Asia/Tokyo"]))
//!     .build()
//!     .await?;
//!
//! let report = survey
//!     .group(&GroupOffsets::default(), &CancelToken::new())
//!     .await?;
//! for group in &report.groups {
//!     println!("{} minutes: {} zones", group.offset_minutes, group.members.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod calendar;
pub mod cancel;
pub mod error;
pub mod grouper;
pub mod models;
pub mod params;
pub mod registry;
pub mod scanner;
pub mod survey;
pub mod wallclock;

// Re-export commonly used types
pub use cancel::CancelToken;
pub use error::{Result, ScanError};
pub use grouper::OffsetGrouper;
pub use models::{
    EpochMillis, GroupingReport, LocationFailure, LocationOffsetView, OffsetGroup,
    OffsetMinutes, TimeZoneId, Transition,
};
pub use params::{GroupOffsets, ListTransitions, NextTransition};
pub use registry::ZoneRegistry;
pub use scanner::{find_transition, next_transition, scan_for_change, transitions, ChangeScan};
pub use survey::{Survey, SurveyBuilder};
pub use wallclock::{offset_minutes_at, WallClockFormatter, ZoneFormatter};
