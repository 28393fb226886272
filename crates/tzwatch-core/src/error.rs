//! Error types for the transition scanning library.

use std::fmt;

use thiserror::Error;

use crate::models::EpochMillis;

/// Comprehensive error type for all scanning and grouping operations.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The wall-clock formatter could not format the given instant
    #[error("Formatter failed for zone '{zone}' at {instant}: {message}")]
    Formatter {
        zone: String,
        instant: EpochMillis,
        message: String,
    },
    /// The wall-clock formatter produced output that does not parse
    #[error("Malformed wall-clock string '{value}' for zone '{zone}'")]
    MalformedWallClock { zone: String, value: String },
    /// The time zone database has no entry for the given name
    #[error("Unknown time zone '{name}'")]
    UnknownZone {
        name: String,
        #[source]
        source: jiff::Error,
    },
    /// A scan window too narrow to bracket a transition
    #[error("Invalid scan window [{start}, {end}]: end must be at least one second after start")]
    InvalidWindow {
        start: EpochMillis,
        end: EpochMillis,
    },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// The operation was aborted through its cancel token
    #[error("Operation cancelled")]
    Cancelled,
    /// Blocking task or runtime failures
    #[error("Runtime error: {message}")]
    Runtime { message: String },
}

/// Builder for creating formatter errors bound to a zone.
pub struct FormatterErrorBuilder {
    zone: String,
}

impl FormatterErrorBuilder {
    /// Create a new formatter error builder for a zone.
    pub fn new(zone: impl Into<String>) -> Self {
        Self { zone: zone.into() }
    }

    /// Build the error for the instant that failed.
    pub fn at(self, instant: EpochMillis, message: impl fmt::Display) -> ScanError {
        ScanError::Formatter {
            zone: self.zone,
            instant,
            message: message.to_string(),
        }
    }

    /// Build the error for output that could not be parsed.
    pub fn malformed(self, value: impl Into<String>) -> ScanError {
        ScanError::MalformedWallClock {
            zone: self.zone,
            value: value.into(),
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> ScanError {
        ScanError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl ScanError {
    /// Creates a builder for formatter errors.
    pub fn formatter(zone: impl Into<String>) -> FormatterErrorBuilder {
        FormatterErrorBuilder::new(zone)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a runtime error from a failed blocking task.
    pub fn join(source: tokio::task::JoinError) -> Self {
        Self::Runtime {
            message: format!("Task join error: {source}"),
        }
    }
}

/// Extension trait attaching zone and instant context to formatter results.
pub trait FormatterResultExt<T> {
    /// Map any error into [`ScanError::Formatter`] for `zone` at `instant`.
    fn formatter_context(self, zone: &str, instant: EpochMillis) -> Result<T>;
}

impl<T, E> FormatterResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn formatter_context(self, zone: &str, instant: EpochMillis) -> Result<T> {
        self.map_err(|e| ScanError::formatter(zone).at(instant, e))
    }
}

/// Result type alias for scanning operations
pub type Result<T> = std::result::Result<T, ScanError>;
