//! Concurrency ceiling for in-flight vendor calls.
//!
//! A thin wrapper over a semaphore: admission is non-blocking, and the permit
//! is a RAII guard so a slot is returned on every exit path, including panics
//! and early returns inside the vendor call.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Holds one in-flight slot until dropped.
#[derive(Debug)]
pub struct ConcurrencyPermit {
    _permit: OwnedSemaphorePermit,
}

/// Caps the number of simultaneous vendor calls.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
}

impl ConcurrencyLimiter {
    /// Create a limiter admitting at most `max_concurrent` calls at once.
    #[must_use]
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    /// Try to claim a slot without waiting.
    #[must_use]
    pub fn try_acquire(&self) -> Option<ConcurrencyPermit> {
        Arc::clone(&self.semaphore)
            .try_acquire_owned()
            .ok()
            .map(|permit| ConcurrencyPermit { _permit: permit })
    }

    /// Slots currently free.
    #[must_use]
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Calls currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.max_concurrent - self.semaphore.available_permits()
    }
}
