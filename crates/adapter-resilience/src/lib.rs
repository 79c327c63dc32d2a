//! # Adapter Resilience
//!
//! Resilience primitives for the external-service adapter layer:
//! - Per-vendor circuit breaker gating calls to failing vendors
//! - Per-vendor-per-tenant token-bucket rate limiter
//! - Retry engine with exponential backoff and jitter
//! - Bounded, TTL'd, access-ordered response cache
//! - Count- and byte-bounded offline request queue
//! - Concurrency ceiling with scoped permits

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod circuit_breaker;
pub mod concurrency;
pub mod queue;
pub mod rate_limiter;
pub mod retry;

// Re-export main types
pub use cache::ResponseCache;
pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use concurrency::{ConcurrencyLimiter, ConcurrencyPermit};
pub use queue::{OfflineQueue, QueueEntry};
pub use rate_limiter::RateLimiter;
pub use retry::{RetryConfig, RetryPolicy};
