//! Cooperative cancellation for long batches.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// A shared flag checked between per-location iterations.
///
/// Clones observe the same flag, so one clone can be handed to a signal
/// handler while others travel with the work.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that work stop before the next location.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
