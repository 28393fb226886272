//! High-level async API over the scanner and the grouper.
//!
//! The algorithms themselves are synchronous and CPU-bound. [`Survey`] runs
//! them on tokio's blocking pool and, for grouping, splits the zone set into
//! disjoint chunks that are processed in parallel and merged afterwards.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │     Survey      │    │  OffsetGrouper  │    │ Scanner (month  │
//! │ (chunks, async) │───▶│ (per chunk, on  │───▶│ brackets, then  │
//! │                 │    │  blocking pool) │    │ binary search)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

mod builder;

use std::{collections::HashSet, sync::Arc};

use log::{debug, info};
use tokio::task;

pub use builder::SurveyBuilder;

use crate::{
    cancel::CancelToken,
    error::{Result, ScanError},
    grouper::OffsetGrouper,
    models::{GroupingReport, LocationFailure, Transition},
    params::{GroupOffsets, ListTransitions, NextTransition},
    registry::ZoneRegistry,
    scanner,
    wallclock::ZoneFormatter,
};

/// Entry point for transition queries over a fixed zone set.
#[derive(Debug, Clone)]
pub struct Survey {
    registry: Arc<ZoneRegistry>,
    parallelism: usize,
}

impl Survey {
    fn new(registry: ZoneRegistry, parallelism: usize) -> Self {
        Self {
            registry: Arc::new(registry),
            parallelism,
        }
    }

    /// The zones this survey was built with.
    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    /// Resolves a zone from the registry, falling back to the database for
    /// zones outside it.
    fn formatter(&self, name: &str) -> Result<ZoneFormatter> {
        match self.registry.get(name) {
            Some(formatter) => Ok(formatter.clone()),
            None => ZoneFormatter::new(name),
        }
    }

    /// Groups zones by their offset at the origin and finds each zone's next
    /// transition.
    ///
    /// Requested zones missing from the registry are reported as failures.
    /// Repeated names are surveyed once, at their first position.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::InvalidInput` for a zero horizon and
    /// `ScanError::Cancelled` if `cancel` fires before every chunk finished.
    pub async fn group(
        &self,
        params: &GroupOffsets,
        cancel: &CancelToken,
    ) -> Result<GroupingReport> {
        let grouper =
            OffsetGrouper::new(params.resolved_origin()).with_horizon(params.horizon_months)?;

        let mut missing = Vec::new();
        let mut seen = HashSet::new();
        let indices: Vec<usize> = match &params.zones {
            Some(names) => names
                .iter()
                .filter(|&name| seen.insert(name.as_str()))
                .filter_map(|name| {
                    let index = self.registry.index_of(name);
                    if index.is_none() {
                        missing.push(LocationFailure {
                            zone: name.as_str().into(),
                            reason: format!("Unknown time zone '{name}'"),
                        });
                    }
                    index
                })
                .collect(),
            None => (0..self.registry.len()).collect(),
        };

        let chunk_size = indices.len().div_ceil(self.parallelism).max(1);
        info!(
            "grouping {} zones at {} in chunks of {}",
            indices.len(),
            grouper.origin(),
            chunk_size
        );

        let handles: Vec<_> = indices
            .chunks(chunk_size)
            .map(|chunk| {
                let registry = Arc::clone(&self.registry);
                let chunk = chunk.to_vec();
                let cancel = cancel.clone();
                task::spawn_blocking(move || {
                    let formatters = chunk.iter().filter_map(|&i| registry.by_index(i));
                    grouper.group(formatters, &cancel)
                })
            })
            .collect();

        let mut report = GroupingReport {
            origin: grouper.origin(),
            horizon_months: grouper.horizon_months(),
            ..Default::default()
        };
        for handle in handles {
            report.merge(handle.await.map_err(ScanError::join)??);
        }
        report.failures.extend(missing);
        debug!(
            "grouping produced {} groups, {} failures",
            report.groups.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Finds the first transition of one zone strictly after the origin.
    pub async fn next(&self, params: &NextTransition) -> Result<Option<Transition>> {
        let formatter = self.formatter(&params.zone)?;
        let origin = params.resolved_origin();
        let horizon = params.horizon_months;
        if horizon == 0 {
            return Err(
                ScanError::invalid_input("horizon_months").with_reason("must be at least 1")
            );
        }

        task::spawn_blocking(move || scanner::next_transition(&formatter, origin, horizon))
            .await
            .map_err(ScanError::join)?
    }

    /// Lists every transition of one zone in a range.
    pub async fn transitions(&self, params: &ListTransitions) -> Result<Vec<Transition>> {
        let formatter = self.formatter(&params.zone)?;
        let from = params
            .from
            .unwrap_or_else(|| jiff::Timestamp::now().as_millisecond());
        let until = params.until;

        task::spawn_blocking(move || scanner::transitions(&formatter, from, until))
            .await
            .map_err(ScanError::join)?
    }
}
