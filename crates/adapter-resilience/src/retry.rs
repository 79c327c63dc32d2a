//! Retry with exponential backoff and jitter.

use adapter_core::{AdapterError, AdapterResult};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Backoff tuning for a retried operation.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Ceiling on any single delay.
    pub max_delay: Duration,
    /// Exponential growth factor between retries.
    pub multiplier: f64,
    /// Scale each delay by a uniform factor in [0.5, 1.0].
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

/// Drives an async operation through its retry budget.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Build a policy from explicit tuning.
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Backoff before retry `attempt` (1-based), before jitter.
    fn backoff(&self, attempt: u32) -> Duration {
        let exp = self
            .config
            .base_delay
            .as_secs_f64()
            * self
                .config
                .multiplier
                .powi(i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX));
        let capped = exp.min(self.config.max_delay.as_secs_f64());
        let scaled = if self.config.jitter {
            capped * rand::thread_rng().gen_range(0.5..=1.0)
        } else {
            capped
        };
        Duration::from_secs_f64(scaled)
    }

    /// Run `operation` until it succeeds, a non-retryable error surfaces, or
    /// the retry budget is spent. On exhaustion the last error is returned.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> AdapterResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AdapterResult<T>>,
    {
        let mut last_error: Option<AdapterError> = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = self.backoff(attempt);
                debug!(attempt, delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX), "retrying after backoff");
                tokio::time::sleep(delay).await;
            }
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => last_error = Some(err),
            }
        }
        // Loop body runs at least once, so an error is always recorded here
        Err(last_error
            .unwrap_or_else(|| AdapterError::internal("retry loop finished without an attempt")))
    }
}
