//! Transition search: a coarse month-by-month scan followed by a binary search
//! on elapsed seconds.
//!
//! # Searching without an offset primitive
//!
//! The only question the formatter answers is "what does the local clock read
//! at this instant?". Between two instants `step` seconds apart the local clock
//! advances by exactly `step` seconds unless the offset changed in between, so
//!
//! ```text
//! (z1 - z_mid + step) mod 86400 == 0   <=>   no transition in [t1, mid]
//! ```
//!
//! where `z1` and `z_mid` are seconds since local midnight. Reducing modulo a
//! whole day makes the test insensitive to which side of midnight either sample
//! falls on, without any calendar arithmetic.
//!
//! The search assumes exactly one transition in the window. That is what
//! [`ChangeScan`] guarantees by bracketing on adjacent month boundaries; a
//! window holding zero or several transitions yields an unspecified instant.

use log::{debug, warn};

use crate::{
    calendar::{month_boundaries, month_samples},
    error::{Result, ScanError},
    models::{EpochMillis, Transition},
    wallclock::{offset_minutes_at, seconds_of_day, time_of_day, WallClockFormatter},
};

const SECONDS_PER_DAY: i64 = 86_400;

/// Span covered by [`transitions`] when no end is given, a little over 14
/// months.
pub const DEFAULT_TRANSITION_SPAN_MS: EpochMillis = 36_816_413_000;

/// Two adjacent samples whose time-of-day strings differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    /// Index of the later sample.
    pub index: usize,
    pub start: EpochMillis,
    pub end: EpochMillis,
}

/// Rounds to the nearest whole second.
fn to_seconds(field: &str, instant: EpochMillis) -> Result<i64> {
    instant
        .checked_add(500)
        .map(|rounded| rounded.div_euclid(1000))
        .ok_or_else(|| {
            ScanError::invalid_input(field).with_reason(format!("{instant} is out of range"))
        })
}

/// Finds the offset change inside `[window_start, window_end]`.
///
/// Returns the last millisecond that still carries the old offset. The caller
/// must have established that the window holds exactly one transition.
///
/// # Errors
///
/// Returns `ScanError::InvalidWindow` if the endpoints, rounded to whole
/// seconds, are not at least one second apart, `ScanError::InvalidInput` if
/// an endpoint cannot be rounded, and propagates formatter failures.
pub fn find_transition<F>(
    formatter: &F,
    window_start: EpochMillis,
    window_end: EpochMillis,
) -> Result<EpochMillis>
where
    F: WallClockFormatter + ?Sized,
{
    let zone = formatter.zone();
    let mut t1 = to_seconds("window_start", window_start)?;
    let mut t2 = to_seconds("window_end", window_end)?;
    if t2 <= t1 {
        return Err(ScanError::InvalidWindow {
            start: window_start,
            end: window_end,
        });
    }

    let mut z1 = seconds_of_day(zone, &formatter.format(t1 * 1000)?)?;
    loop {
        let step = (t2 - t1) >> 1;
        if step == 0 {
            break;
        }
        let mid = t1 + step;
        let z_mid = seconds_of_day(zone, &formatter.format(mid * 1000)?)?;
        if (z1 - z_mid + step).rem_euclid(SECONDS_PER_DAY) != 0 {
            t2 = mid;
        } else {
            t1 = mid;
            z1 = z_mid;
        }
    }

    Ok(t2 * 1000 - 1)
}

/// Lazily walks a sample sequence and yields every adjacent pair whose
/// time-of-day strings differ.
///
/// Samples are formatted on demand, so stopping after the first bracket costs
/// only the samples up to it. After an error the scan is fused.
pub struct ChangeScan<'a, F: ?Sized> {
    formatter: &'a F,
    samples: &'a [EpochMillis],
    next_index: usize,
    previous: Option<String>,
}

impl<'a, F> ChangeScan<'a, F>
where
    F: WallClockFormatter + ?Sized,
{
    /// Starts a scan over `samples`, which must be in ascending order.
    pub fn new(formatter: &'a F, samples: &'a [EpochMillis]) -> Self {
        Self {
            formatter,
            samples,
            next_index: 0,
            previous: None,
        }
    }

    fn sample_time(&self, index: usize) -> Result<String> {
        let wall_clock = self.formatter.format(self.samples[index])?;
        Ok(time_of_day(self.formatter.zone(), &wall_clock)?.to_string())
    }

    fn advance(&mut self) -> Result<Option<Bracket>> {
        if self.previous.is_none() && self.next_index == 0 && !self.samples.is_empty() {
            self.previous = Some(self.sample_time(0)?);
            self.next_index = 1;
        }

        while self.next_index < self.samples.len() {
            let index = self.next_index;
            let current = self.sample_time(index)?;
            self.next_index += 1;
            let changed = self.previous.as_deref() != Some(current.as_str());
            self.previous = Some(current);
            if changed {
                return Ok(Some(Bracket {
                    index,
                    start: self.samples[index - 1],
                    end: self.samples[index],
                }));
            }
        }
        Ok(None)
    }
}

impl<F> Iterator for ChangeScan<'_, F>
where
    F: WallClockFormatter + ?Sized,
{
    type Item = Result<Bracket>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(bracket) => bracket.map(Ok),
            Err(e) => {
                self.next_index = self.samples.len();
                Some(Err(e))
            }
        }
    }
}

/// Index of the first sample whose time of day differs from its predecessor.
pub fn scan_for_change<F>(formatter: &F, samples: &[EpochMillis]) -> Result<Option<usize>>
where
    F: WallClockFormatter + ?Sized,
{
    ChangeScan::new(formatter, samples)
        .next()
        .transpose()
        .map(|bracket| bracket.map(|b| b.index))
}

/// Describes the transition ending at `instant` using offsets on both sides.
///
/// Returns `None` when both sides carry the same offset, which only happens
/// when a bracket held more than one change.
fn describe<F>(formatter: &F, instant: EpochMillis) -> Result<Option<Transition>>
where
    F: WallClockFormatter + ?Sized,
{
    let offset_before = offset_minutes_at(formatter, instant)?;
    let after = instant
        .checked_add(1)
        .ok_or_else(|| ScanError::invalid_input("instant").with_reason("out of range"))?;
    let offset_after = offset_minutes_at(formatter, after)?;
    if offset_before == offset_after {
        warn!(
            "{}: bracket ending at {} held no net offset change, skipping",
            formatter.zone(),
            instant
        );
        return Ok(None);
    }
    Ok(Some(Transition {
        instant,
        offset_before,
        offset_after,
    }))
}

/// The first transition strictly after `origin` within `horizon_months`.
///
/// A bracket can contain `origin` itself, so transitions found at or before
/// `origin` are skipped and the scan moves on to later brackets.
pub fn next_transition<F>(
    formatter: &F,
    origin: EpochMillis,
    horizon_months: u32,
) -> Result<Option<Transition>>
where
    F: WallClockFormatter + ?Sized,
{
    let samples = month_samples(origin, horizon_months)?;
    for bracket in ChangeScan::new(formatter, &samples) {
        let bracket = bracket?;
        let instant = find_transition(formatter, bracket.start, bracket.end)?;
        if instant <= origin {
            debug!(
                "{}: transition at {} precedes origin {}",
                formatter.zone(),
                instant,
                origin
            );
            continue;
        }
        if let Some(transition) = describe(formatter, instant)? {
            return Ok(Some(transition));
        }
    }
    debug!(
        "{}: no transition within {} months of {}",
        formatter.zone(),
        horizon_months,
        origin
    );
    Ok(None)
}

/// Every transition in `[from, until]`, in chronological order.
///
/// `until` defaults to [`DEFAULT_TRANSITION_SPAN_MS`] after `from`. Samples
/// run from the month before `from`'s month through the month after
/// `until`'s, so transitions close to either end are still bracketed.
///
/// # Errors
///
/// Returns `ScanError::InvalidInput` if `until` precedes `from`, or if the
/// default end lies beyond the representable range.
pub fn transitions<F>(
    formatter: &F,
    from: EpochMillis,
    until: Option<EpochMillis>,
) -> Result<Vec<Transition>>
where
    F: WallClockFormatter + ?Sized,
{
    let until = match until {
        Some(until) => until,
        None => from
            .checked_add(DEFAULT_TRANSITION_SPAN_MS)
            .ok_or_else(|| ScanError::invalid_input("from").with_reason("out of range"))?,
    };
    if until < from {
        return Err(ScanError::invalid_input("until").with_reason("must not precede 'from'"));
    }

    let samples = month_boundaries(from, until, 1, 1)?;
    let mut found = Vec::new();
    for bracket in ChangeScan::new(formatter, &samples) {
        let bracket = bracket?;
        let instant = find_transition(formatter, bracket.start, bracket.end)?;
        if instant < from || instant > until {
            continue;
        }
        if let Some(transition) = describe(formatter, instant)? {
            found.push(transition);
        }
    }
    debug!(
        "{}: {} transitions in [{}, {}]",
        formatter.zone(),
        found.len(),
        from,
        until
    );
    Ok(found)
}
