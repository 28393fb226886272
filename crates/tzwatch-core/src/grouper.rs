//! Offset grouping at a fixed origin.
//!
//! For every location the grouper derives the offset in force at the origin,
//! the next transition inside the horizon and the offset that follows it, then
//! partitions the locations by exact offset minutes. A location whose formatter
//! fails is reported in [`GroupingReport::failures`] and never aborts the batch.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::{
    cancel::CancelToken,
    error::{Result, ScanError},
    models::{
        EpochMillis, GroupingReport, LocationFailure, LocationOffsetView, OffsetGroup,
        OffsetMinutes, TimeZoneId,
    },
    params::DEFAULT_HORIZON_MONTHS,
    scanner::next_transition,
    wallclock::{offset_minutes_at, WallClockFormatter},
};

/// Groups locations by their offset at `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetGrouper {
    origin: EpochMillis,
    horizon_months: u32,
}

impl OffsetGrouper {
    /// Creates a grouper with the default 28-month horizon.
    pub fn new(origin: EpochMillis) -> Self {
        Self {
            origin,
            horizon_months: DEFAULT_HORIZON_MONTHS,
        }
    }

    /// Sets how many months ahead to look for the next transition.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::InvalidInput` if `months` is zero.
    pub fn with_horizon(mut self, months: u32) -> Result<Self> {
        if months == 0 {
            return Err(
                ScanError::invalid_input("horizon_months").with_reason("must be at least 1")
            );
        }
        self.horizon_months = months;
        Ok(self)
    }

    pub fn origin(&self) -> EpochMillis {
        self.origin
    }

    pub fn horizon_months(&self) -> u32 {
        self.horizon_months
    }

    /// Derives the view for a single location.
    pub fn locate<F>(&self, formatter: &F) -> Result<LocationOffsetView>
    where
        F: WallClockFormatter + ?Sized,
    {
        let offset_group = offset_minutes_at(formatter, self.origin)?;
        let next = next_transition(formatter, self.origin, self.horizon_months)?;
        Ok(LocationOffsetView {
            zone: formatter.zone().clone(),
            offset_group,
            next_transition: next.map(|t| t.instant),
            next_offset: next.map(|t| t.offset_after),
        })
    }

    /// Derives views for every location and partitions them by offset.
    ///
    /// # Errors
    ///
    /// Only `ScanError::Cancelled`, when `cancel` fires between locations.
    /// Per-location failures are collected in the report instead.
    pub fn group<'a, I, F>(&self, formatters: I, cancel: &CancelToken) -> Result<GroupingReport>
    where
        I: IntoIterator<Item = &'a F>,
        F: WallClockFormatter + ?Sized + 'a,
    {
        let mut members: BTreeMap<OffsetMinutes, Vec<TimeZoneId>> = BTreeMap::new();
        let mut report = GroupingReport {
            origin: self.origin,
            horizon_months: self.horizon_months,
            ..Default::default()
        };

        for formatter in formatters {
            if cancel.is_cancelled() {
                debug!("grouping cancelled after {} locations", report.views.len());
                return Err(ScanError::Cancelled);
            }
            match self.locate(formatter) {
                Ok(view) => {
                    members
                        .entry(view.offset_group)
                        .or_default()
                        .push(view.zone.clone());
                    report.views.push(view);
                }
                Err(e) => {
                    warn!("{}: offset unknown: {}", formatter.zone(), e);
                    report.failures.push(LocationFailure {
                        zone: formatter.zone().clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report.groups = members
            .into_iter()
            .map(|(offset_minutes, members)| OffsetGroup {
                offset_minutes,
                members,
            })
            .collect();
        Ok(report)
    }
}
