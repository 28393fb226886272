//! Interned zone set with one formatter per zone.
//!
//! The registry is built once and passed by reference to whatever needs to
//! resolve zone names. Names the time zone database does not know are skipped
//! with a warning instead of failing the whole set.

use std::collections::HashMap;

use log::{debug, warn};

use crate::{
    models::TimeZoneId,
    wallclock::{WallClockFormatter, ZoneFormatter},
};

/// Zone name to dense index, plus the formatter bound to each zone.
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    ids: HashMap<String, usize>,
    formatters: Vec<ZoneFormatter>,
}

impl ZoneRegistry {
    /// Builds a registry from candidate names, in order, skipping duplicates
    /// and zones the database cannot resolve.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::default();
        for name in names {
            let name = name.as_ref();
            if registry.ids.contains_key(name) {
                continue;
            }
            match ZoneFormatter::new(name) {
                Ok(formatter) => {
                    registry.ids.insert(name.to_string(), registry.formatters.len());
                    registry.formatters.push(formatter);
                }
                Err(e) => warn!("Unknown time zone '{name}': {e}"),
            }
        }
        debug!("zone registry holds {} zones", registry.formatters.len());
        registry
    }

    /// Every zone the bundled time zone database lists.
    pub fn all_known() -> Self {
        let mut names: Vec<String> = jiff::tz::db()
            .available()
            .map(|name| name.as_str().to_string())
            .collect();
        names.sort();
        Self::from_names(names)
    }

    /// Dense index of a zone, if registered.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    /// Formatter for a zone, if registered.
    pub fn get(&self, name: &str) -> Option<&ZoneFormatter> {
        self.index_of(name).map(|i| &self.formatters[i])
    }

    /// Formatter at a dense index.
    pub fn by_index(&self, index: usize) -> Option<&ZoneFormatter> {
        self.formatters.get(index)
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }

    /// Registered zones in registration order.
    pub fn zones(&self) -> impl Iterator<Item = &TimeZoneId> {
        self.formatters.iter().map(|f| f.zone())
    }
}
