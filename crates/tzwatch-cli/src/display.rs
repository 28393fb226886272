//! Markdown formatting for survey results.
//!
//! Offsets print the way clocks are usually labelled: `GMT`, `GMT+1`,
//! `GMT+5:30`, `GMT-3:30`. Transitions show the local wall clock on both
//! sides of the change, read back through the zone's own formatter.

use std::fmt::{self, Write};

use anyhow::Result;
use jiff::Timestamp;
use tzwatch_core::{
    EpochMillis, GroupingReport, OffsetMinutes, Transition, WallClockFormatter, ZoneRegistry,
};

/// An offset in minutes, displayed as a GMT label.
pub struct GmtOffset(pub OffsetMinutes);

impl fmt::Display for GmtOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.0;
        write!(f, "GMT")?;
        if minutes == 0 {
            return Ok(());
        }
        let sign = if minutes < 0 { '-' } else { '+' };
        let abs = minutes.unsigned_abs();
        write!(f, "{sign}{}", abs / 60)?;
        if abs % 60 != 0 {
            write!(f, ":{:02}", abs % 60)?;
        }
        Ok(())
    }
}

/// An instant displayed in RFC 3339 form, UTC.
pub struct UtcTime(pub EpochMillis);

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Timestamp::from_millisecond(self.0) {
            Ok(ts) => write!(f, "{ts}"),
            Err(_) => write!(f, "{}ms", self.0),
        }
    }
}

/// Time left until an instant, e.g. `in 12d 3h 5m`.
pub struct Countdown {
    pub from: EpochMillis,
    pub to: EpochMillis,
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = (self.to - self.from).max(0) / 60_000;
        let (days, hours, minutes) = (minutes / 1440, minutes / 60 % 24, minutes % 60);
        if days > 0 {
            write!(f, "in {days}d {hours}h {minutes}m")
        } else if hours > 0 {
            write!(f, "in {hours}h {minutes}m")
        } else {
            write!(f, "in {minutes}m")
        }
    }
}

/// One transition as seen on the local clock: last old second, first new
/// second, and both offsets.
pub struct LocalChange {
    before: String,
    after: String,
    offset_before: OffsetMinutes,
    offset_after: OffsetMinutes,
}

impl LocalChange {
    /// Reads the wall clock on both sides of `transition`.
    pub fn read<F>(formatter: &F, transition: &Transition) -> Result<Self>
    where
        F: WallClockFormatter + ?Sized,
    {
        Ok(Self {
            before: formatter.format(transition.instant)?,
            after: formatter.format(transition.takes_effect())?,
            offset_before: transition.offset_before,
            offset_after: transition.offset_after,
        })
    }
}

impl fmt::Display for LocalChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let after_time = self
            .after
            .rsplit_once(' ')
            .map_or(self.after.as_str(), |(_, t)| t);
        write!(
            f,
            "`{}` ⟶ `{after_time}` ({} ⟶ {})",
            self.before,
            GmtOffset(self.offset_before),
            GmtOffset(self.offset_after)
        )
    }
}

/// Writes a grouping report, one section per offset.
pub fn write_groups<W: Write>(
    out: &mut W,
    report: &GroupingReport,
    registry: &ZoneRegistry,
) -> Result<()> {
    writeln!(out, "# Offsets at {}", UtcTime(report.origin))?;
    writeln!(out)?;

    for group in &report.groups {
        let count = group.members.len();
        let noun = if count == 1 { "zone" } else { "zones" };
        writeln!(out, "## {} ({count} {noun})", GmtOffset(group.offset_minutes))?;
        writeln!(out)?;
        for zone in &group.members {
            let Some(view) = report.view(zone.as_str()) else {
                continue;
            };
            write!(out, "- **{zone}**: ")?;
            match (view.transition(), registry.get(zone.as_str())) {
                (Some(transition), Some(formatter)) => {
                    writeln!(
                        out,
                        "{}, {}",
                        LocalChange::read(formatter, &transition)?,
                        Countdown {
                            from: report.origin,
                            to: transition.takes_effect(),
                        }
                    )?;
                }
                (Some(transition), None) => {
                    writeln!(
                        out,
                        "changes to {} at {}",
                        GmtOffset(transition.offset_after),
                        UtcTime(transition.takes_effect())
                    )?;
                }
                (None, _) => {
                    writeln!(
                        out,
                        "with no transition in the next {} months",
                        report.horizon_months
                    )?;
                }
            }
        }
        writeln!(out)?;
    }

    if !report.failures.is_empty() {
        writeln!(out, "## Offset unknown")?;
        writeln!(out)?;
        for failure in &report.failures {
            writeln!(out, "- **{}**: {}", failure.zone, failure.reason)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Renders a grouping report to markdown.
pub fn render_groups(report: &GroupingReport, registry: &ZoneRegistry) -> Result<String> {
    let mut out = String::new();
    write_groups(&mut out, report, registry)?;
    Ok(out)
}

/// Writes the next transition of a single zone.
pub fn write_next<W, F>(
    out: &mut W,
    formatter: &F,
    origin: EpochMillis,
    horizon_months: u32,
    next: Option<&Transition>,
) -> Result<()>
where
    W: Write,
    F: WallClockFormatter + ?Sized,
{
    writeln!(out, "# {}", formatter.zone())?;
    writeln!(out)?;
    writeln!(out, "- Origin: {}", UtcTime(origin))?;
    let Some(transition) = next else {
        writeln!(out, "- No transition in the next {horizon_months} months")?;
        return Ok(());
    };
    writeln!(out, "- Current offset: {}", GmtOffset(transition.offset_before))?;
    writeln!(out, "- Next change: {}", UtcTime(transition.takes_effect()))?;
    writeln!(out, "- Local clock: {}", LocalChange::read(formatter, transition)?)?;
    writeln!(
        out,
        "- Countdown: {}",
        Countdown {
            from: origin,
            to: transition.takes_effect(),
        }
    )?;
    Ok(())
}

/// Renders the next transition of a single zone to markdown.
pub fn render_next<F>(
    formatter: &F,
    origin: EpochMillis,
    horizon_months: u32,
    next: Option<&Transition>,
) -> Result<String>
where
    F: WallClockFormatter + ?Sized,
{
    let mut out = String::new();
    write_next(&mut out, formatter, origin, horizon_months, next)?;
    Ok(out)
}

/// Writes a list of transitions of a single zone.
pub fn write_transitions<W, F>(out: &mut W, formatter: &F, transitions: &[Transition]) -> Result<()>
where
    W: Write,
    F: WallClockFormatter + ?Sized,
{
    writeln!(out, "# {}", formatter.zone())?;
    writeln!(out)?;
    if transitions.is_empty() {
        writeln!(out, "No transitions in range.")?;
        return Ok(());
    }
    for transition in transitions {
        writeln!(
            out,
            "- {}: {}",
            UtcTime(transition.takes_effect()),
            LocalChange::read(formatter, transition)?
        )?;
    }
    Ok(())
}

/// Renders a list of transitions of a single zone to markdown.
pub fn render_transitions<F>(formatter: &F, transitions: &[Transition]) -> Result<String>
where
    F: WallClockFormatter + ?Sized,
{
    let mut out = String::new();
    write_transitions(&mut out, formatter, transitions)?;
    Ok(out)
}

/// Renders the registered zone names, one per line.
pub fn render_zones(registry: &ZoneRegistry) -> Result<String> {
    let mut out = String::new();
    for zone in registry.zones() {
        writeln!(out, "{zone}")?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use tzwatch_core::{params::GroupOffsets, CancelToken, OffsetGrouper, ZoneFormatter};

    use super::*;

    fn ms(s: &str) -> EpochMillis {
        s.parse::<Timestamp>().unwrap().as_millisecond()
    }

    #[test]
    fn test_gmt_offset_labels() {
        assert_eq!(GmtOffset(0).to_string(), "GMT");
        assert_eq!(GmtOffset(60).to_string(), "GMT+1");
        assert_eq!(GmtOffset(330).to_string(), "GMT+5:30");
        assert_eq!(GmtOffset(-210).to_string(), "GMT-3:30");
        assert_eq!(GmtOffset(825).to_string(), "GMT+13:45");
        assert_eq!(GmtOffset(-600).to_string(), "GMT-10");
    }

    #[test]
    fn test_countdown() {
        let from = ms("2024-01-01T00:00:00Z");
        let countdown = |to: &str| Countdown { from, to: ms(to) }.to_string();
        assert_eq!(countdown("2024-01-01T00:42:00Z"), "in 42m");
        assert_eq!(countdown("2024-01-01T05:07:00Z"), "in 5h 7m");
        assert_eq!(countdown("2024-01-03T01:00:30Z"), "in 2d 1h 0m");
    }

    #[test]
    fn test_utc_time() {
        assert_eq!(
            UtcTime(ms("2024-03-31T00:59:59.999Z")).to_string(),
            "2024-03-31T00:59:59.999Z"
        );
    }

    #[test]
    fn test_render_transitions_shows_local_clock() {
        let paris = ZoneFormatter::new("Europe/Paris").unwrap();
        let transition = Transition {
            instant: ms("2024-03-31T00:59:59.999Z"),
            offset_before: 60,
            offset_after: 120,
        };
        let out = render_transitions(&paris, &[transition]).unwrap();
        assert!(out.starts_with("# Europe/Paris"));
        assert!(out.contains(
            "- 2024-03-31T01:00:00Z: `2024-03-31 01:59:59` ⟶ `03:00:00` (GMT+1 ⟶ GMT+2)"
        ));
    }

    #[test]
    fn test_render_groups() {
        let registry = ZoneRegistry::from_names(["Europe/Paris", "Africa/Lagos", "Asia/Tokyo"]);
        let origin = GroupOffsets {
            origin: Some(ms("2024-03-30T01:00:00Z")),
            ..Default::default()
        }
        .resolved_origin();
        let formatters: Vec<&ZoneFormatter> = registry
            .zones()
            .filter_map(|z| registry.get(z.as_str()))
            .collect();
        let report = OffsetGrouper::new(origin)
            .group(formatters, &CancelToken::new())
            .unwrap();

        let out = render_groups(&report, &registry).unwrap();
        assert!(out.contains("## GMT+1 (2 zones)"));
        assert!(out.contains("## GMT+9 (1 zone)"));
        assert!(out.contains("- **Europe/Paris**: `2024-03-31 01:59:59` ⟶ `03:00:00`"));
        assert!(out.contains("in 1d 0h 0m"));
        assert!(out.contains("- **Africa/Lagos**: with no transition in the next 28 months"));
        assert!(!out.contains("Offset unknown"));
    }

    /// Accepts `budget` writes, then fails every write after that.
    struct ShortWriter {
        budget: usize,
    }

    impl Write for ShortWriter {
        fn write_str(&mut self, _s: &str) -> fmt::Result {
            if self.budget == 0 {
                return Err(fmt::Error);
            }
            self.budget -= 1;
            Ok(())
        }
    }

    #[test]
    fn test_write_errors_propagate() {
        let paris = ZoneFormatter::new("Europe/Paris").unwrap();
        let transition = Transition {
            instant: ms("2024-03-31T00:59:59.999Z"),
            offset_before: 60,
            offset_after: 120,
        };

        let mut out = ShortWriter { budget: 2 };
        let err = write_transitions(&mut out, &paris, &[transition]).unwrap_err();
        assert!(err.downcast_ref::<fmt::Error>().is_some());

        let mut out = ShortWriter { budget: 3 };
        let err = write_next(&mut out, &paris, transition.instant, 28, Some(&transition))
            .unwrap_err();
        assert!(err.downcast_ref::<fmt::Error>().is_some());

        let report = GroupingReport::default();
        let registry = ZoneRegistry::from_names(["Europe/Paris"]);
        let mut out = ShortWriter { budget: 0 };
        assert!(write_groups(&mut out, &report, &registry).is_err());
    }

    #[test]
    fn test_render_zones() {
        let registry = ZoneRegistry::from_names(["Europe/Paris", "UTC"]);
        let out = render_zones(&registry).unwrap();
        assert!(out.contains("Europe/Paris\n"));
        assert!(out.contains("UTC\n"));
    }
}
