//! Builder for creating and configuring Survey instances.

use std::{num::NonZeroUsize, thread};

use tokio::task;

use super::Survey;
use crate::{
    error::{Result, ScanError},
    registry::ZoneRegistry,
};

/// Builder for creating and configuring Survey instances.
#[derive(Debug, Clone, Default)]
pub struct SurveyBuilder {
    zones: Option<Vec<String>>,
    parallelism: Option<usize>,
}

impl SurveyBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the survey to the given zones.
    ///
    /// If not specified, every zone in the bundled time zone database is used.
    pub fn with_zones<I, S>(mut self, zones: Option<I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(zones) = zones {
            self.zones = Some(zones.into_iter().map(|z| z.as_ref().to_string()).collect());
        }
        self
    }

    /// Sets how many chunks grouping queries are split into.
    ///
    /// Defaults to the number of available CPUs.
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = Some(parallelism);
        self
    }

    /// Builds the configured survey.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::InvalidInput` if parallelism is zero
    /// Returns `ScanError::Runtime` if the registry cannot be built
    pub async fn build(self) -> Result<Survey> {
        let parallelism = match self.parallelism {
            Some(0) => {
                return Err(ScanError::invalid_input("parallelism").with_reason("must be at least 1"))
            }
            Some(n) => n,
            None => thread::available_parallelism().map_or(1, NonZeroUsize::get),
        };

        let zones = self.zones;
        let registry = task::spawn_blocking(move || match zones {
            Some(names) => ZoneRegistry::from_names(names),
            None => ZoneRegistry::all_known(),
        })
        .await
        .map_err(ScanError::join)?;

        Ok(Survey::new(registry, parallelism))
    }
}
