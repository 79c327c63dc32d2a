//! Token-bucket rate limiting, per vendor and per tenant.
//!
//! Buckets refill lazily: token balances are recomputed from the elapsed
//! wall-clock time at each touch, so no background task is needed. Every
//! (vendor, tenant) pair gets its own bucket, seeded full from the vendor's
//! registered rate the first time that tenant shows up.

use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Rate applied to vendors that never registered limits.
const DEFAULT_RATE_PER_SECOND: f64 = 10.0;
const DEFAULT_BURST: u32 = 10;

/// Identifies one tenant's bucket for one vendor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BucketKey {
    vendor_id: String,
    tenant_id: String,
}

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
    rate_per_second: f64,
    burst: u32,
}

impl TokenBucket {
    fn full(rate_per_second: f64, burst: u32) -> Self {
        Self {
            tokens: f64::from(burst),
            last_refill: Instant::now(),
            rate_per_second,
            burst,
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = f64::from(self.burst).min(self.tokens + elapsed * self.rate_per_second);
        self.last_refill = now;
    }
}

/// Per-vendor, per-tenant token-bucket limiter.
#[derive(Debug, Default)]
pub struct RateLimiter {
    buckets: DashMap<BucketKey, TokenBucket>,
    vendor_rates: DashMap<String, (f64, u32)>,
}

impl RateLimiter {
    /// Create a limiter with no vendors registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the sustained rate and burst size for a vendor.
    ///
    /// Applies to buckets created afterwards; existing tenant buckets keep
    /// the rate they were seeded with.
    pub fn register_vendor(&self, vendor_id: impl Into<String>, rate_per_second: f64, burst: u32) {
        self.vendor_rates
            .insert(vendor_id.into(), (rate_per_second, burst));
    }

    fn seed_rate(&self, vendor_id: &str) -> (f64, u32) {
        self.vendor_rates
            .get(vendor_id)
            .map_or((DEFAULT_RATE_PER_SECOND, DEFAULT_BURST), |r| *r)
    }

    /// Try to consume one token for this (vendor, tenant) pair.
    ///
    /// Returns `true` when a token was available and consumed.
    pub fn acquire(&self, vendor_id: &str, tenant_id: &str) -> bool {
        let key = BucketKey {
            vendor_id: vendor_id.to_string(),
            tenant_id: tenant_id.to_string(),
        };
        let (rate, burst) = self.seed_rate(vendor_id);
        let mut bucket = self
            .buckets
            .entry(key)
            .or_insert_with(|| TokenBucket::full(rate, burst));
        bucket.refill();
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            debug!(vendor = %vendor_id, tenant = %tenant_id, "rate limit exhausted");
            false
        }
    }

    /// Whole tokens currently available for this pair.
    #[must_use]
    pub fn remaining(&self, vendor_id: &str, tenant_id: &str) -> u32 {
        let key = BucketKey {
            vendor_id: vendor_id.to_string(),
            tenant_id: tenant_id.to_string(),
        };
        let (rate, burst) = self.seed_rate(vendor_id);
        let mut bucket = self
            .buckets
            .entry(key)
            .or_insert_with(|| TokenBucket::full(rate, burst));
        bucket.refill();
        // Balance never exceeds burst, which is a u32
        bucket.tokens.floor() as u32
    }

    /// How long until the next token becomes available for this pair.
    ///
    /// Zero when a token is already available; otherwise the deficit divided
    /// by the refill rate, rounded up to whole milliseconds.
    #[must_use]
    pub fn retry_after(&self, vendor_id: &str, tenant_id: &str) -> Duration {
        let key = BucketKey {
            vendor_id: vendor_id.to_string(),
            tenant_id: tenant_id.to_string(),
        };
        let (rate, burst) = self.seed_rate(vendor_id);
        let mut bucket = self
            .buckets
            .entry(key)
            .or_insert_with(|| TokenBucket::full(rate, burst));
        bucket.refill();
        if bucket.tokens >= 1.0 || bucket.rate_per_second <= 0.0 {
            return Duration::ZERO;
        }
        let millis = ((1.0 - bucket.tokens) / bucket.rate_per_second * 1000.0).ceil();
        Duration::from_millis(millis as u64)
    }
}
