//! Bounded TTL response cache with least-recently-used eviction.
//!
//! Recency is a monotonic tick bumped on both reads and writes, so the
//! eviction victim is deterministic for a given access sequence.

use adapter_core::{AdapterError, AdapterResult};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Longest TTL a caller may ask for.
const MAX_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
    last_access: u64,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    tick: u64,
}

impl CacheInner {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// In-memory cache for vendor responses, bounded by entry count.
#[derive(Debug)]
pub struct ResponseCache {
    inner: Mutex<CacheInner>,
    max_entries: usize,
}

impl ResponseCache {
    /// Create a cache holding at most `max_entries` live entries.
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            max_entries,
        }
    }

    /// Look up a key, refreshing its recency on a hit.
    ///
    /// Expired entries are removed on the spot and report a miss.
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        let tick = inner.next_tick();

        let mut expired = false;
        let mut hit = None;
        if let Some(entry) = inner.entries.get_mut(key) {
            if entry.expires_at > now {
                entry.last_access = tick;
                hit = Some(entry.value.clone());
            } else {
                expired = true;
            }
        }
        if expired {
            inner.entries.remove(key);
        }
        hit
    }

    /// Store a value under `key` for `ttl`.
    ///
    /// TTL must be positive and at most one hour. Inserting a new key at
    /// capacity evicts the least-recently-used entry first.
    pub fn set(&self, key: impl Into<String>, value: Value, ttl: Duration) -> AdapterResult<()> {
        if ttl.is_zero() || ttl > MAX_TTL {
            return Err(AdapterError::validation(format!(
                "cache ttl must be within (0, {}s], got {}s",
                MAX_TTL.as_secs(),
                ttl.as_secs_f64()
            )));
        }

        let key = key.into();
        let mut inner = self.inner.lock();
        let tick = inner.next_tick();

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.max_entries {
            if let Some(victim) = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_access)
                .map(|(k, _)| k.clone())
            {
                debug!(key = %victim, "evicting least-recently-used cache entry");
                inner.entries.remove(&victim);
            }
        }

        inner.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
                last_access: tick,
            },
        );
        Ok(())
    }

    /// Remove one key. No-op if absent.
    pub fn invalidate(&self, key: &str) {
        self.inner.lock().entries.remove(key);
    }

    /// Remove every key starting with `prefix`. No-op if none match.
    pub fn invalidate_prefix(&self, prefix: &str) {
        self.inner
            .lock()
            .entries
            .retain(|key, _| !key.starts_with(prefix));
    }

    /// Entries currently held, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// True when the cache holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }
}
