//! Month-boundary sampling in UTC.
//!
//! Transitions are at least a month apart in practice, so first-of-month
//! instants make safe coarse-scan samples: each adjacent pair brackets at
//! most one change.

use jiff::{civil::Date, tz::TimeZone, Timestamp, ToSpan};

use crate::{
    error::{Result, ScanError},
    models::EpochMillis,
};

/// Origins are rounded down to this granularity.
pub const ORIGIN_GRANULARITY_MS: EpochMillis = 5 * 60 * 1000;

/// Rounds an instant down to a 5-minute boundary.
pub fn round_origin(instant: EpochMillis) -> EpochMillis {
    instant - instant.rem_euclid(ORIGIN_GRANULARITY_MS)
}

/// The current time rounded down to a 5-minute boundary.
pub fn now_origin() -> EpochMillis {
    round_origin(Timestamp::now().as_millisecond())
}

fn utc_date(instant: EpochMillis) -> Result<Date> {
    let timestamp = Timestamp::from_millisecond(instant).map_err(|e| {
        ScanError::invalid_input("instant").with_reason(format!("{instant} is out of range: {e}"))
    })?;
    Ok(timestamp.to_zoned(TimeZone::UTC).date())
}

/// First instant of the UTC month that lies `months` away from `date`'s month.
fn month_start(date: Date, months: i32) -> Result<EpochMillis> {
    let out_of_range = |e: jiff::Error| {
        ScanError::invalid_input("months").with_reason(format!("month boundary out of range: {e}"))
    };
    let first = date
        .first_of_month()
        .checked_add(months.months())
        .map_err(out_of_range)?;
    let zoned = first.to_zoned(TimeZone::UTC).map_err(out_of_range)?;
    Ok(zoned.timestamp().as_millisecond())
}

/// First-of-month instants from `lead` months before `first`'s month up to and
/// including `trail` months after `last`'s month.
pub fn month_boundaries(
    first: EpochMillis,
    last: EpochMillis,
    lead: u32,
    trail: u32,
) -> Result<Vec<EpochMillis>> {
    let start = utc_date(first)?;
    let end = utc_date(last)?;
    let span = (i32::from(end.year()) - i32::from(start.year())) * 12
        + (i32::from(end.month()) - i32::from(start.month()));
    let lead = i32::try_from(lead)
        .map_err(|_| ScanError::invalid_input("lead").with_reason("too many months"))?;
    let trail = i32::try_from(trail)
        .map_err(|_| ScanError::invalid_input("trail").with_reason("too many months"))?;

    (-lead..=span + trail)
        .map(|months| month_start(start, months))
        .collect()
}

/// First-of-month instants from `origin`'s month through `origin`'s month plus
/// `horizon_months`, inclusive.
pub fn month_samples(origin: EpochMillis, horizon_months: u32) -> Result<Vec<EpochMillis>> {
    month_boundaries(origin, origin, 0, horizon_months)
}
