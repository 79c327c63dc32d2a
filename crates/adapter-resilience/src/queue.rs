//! Bounded FIFO queue for requests deferred while a vendor is unreachable.
//!
//! The queue is bounded both by entry count and by total serialized bytes;
//! breaching either bound rejects the enqueue rather than evicting older
//! work. An entry's byte size is fixed at enqueue time.

use adapter_core::{AdapterError, AdapterResult, ServiceRequest};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;
use uuid::Uuid;

/// A request parked for later replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Queue-assigned identity, distinct from the request's correlation id.
    pub id: Uuid,
    /// The request to replay.
    pub request: ServiceRequest,
    /// When the entry was parked.
    pub enqueued_at: DateTime<Utc>,
    /// Replays attempted so far.
    pub retry_count: u32,
    /// Replay budget before the entry is dropped.
    pub max_retries: u32,
}

impl QueueEntry {
    /// Wrap a request with a fresh id and an empty retry count.
    #[must_use]
    pub fn new(request: ServiceRequest, max_retries: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            enqueued_at: Utc::now(),
            retry_count: 0,
            max_retries,
        }
    }

    /// Whether this entry may be replayed again after a failure.
    #[must_use]
    pub fn has_retry_budget(&self) -> bool {
        self.retry_count < self.max_retries
    }
}

#[derive(Debug)]
struct StoredEntry {
    entry: QueueEntry,
    bytes: usize,
}

#[derive(Debug, Default)]
struct QueueInner {
    entries: VecDeque<StoredEntry>,
    total_bytes: usize,
}

/// FIFO queue bounded by entry count and serialized size.
#[derive(Debug)]
pub struct OfflineQueue {
    inner: Mutex<QueueInner>,
    max_size: usize,
    max_bytes: usize,
}

impl OfflineQueue {
    /// Create a queue bounded to `max_size` entries and `max_bytes` total.
    #[must_use]
    pub fn new(max_size: usize, max_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(QueueInner::default()),
            max_size,
            max_bytes,
        }
    }

    /// Append an entry, failing when either bound would be exceeded.
    pub fn enqueue(&self, entry: QueueEntry) -> AdapterResult<Uuid> {
        let bytes = serde_json::to_vec(&entry)
            .map_err(|e| AdapterError::internal(format!("queue entry not serializable: {e}")))?
            .len();

        let mut inner = self.inner.lock();
        if inner.entries.len() >= self.max_size {
            return Err(AdapterError::queue_full(inner.entries.len(), self.max_size));
        }
        if inner.total_bytes + bytes > self.max_bytes {
            return Err(AdapterError::queue_full(inner.entries.len(), self.max_size));
        }

        let id = entry.id;
        debug!(entry = %id, bytes, "request parked in offline queue");
        inner.total_bytes += bytes;
        inner.entries.push_back(StoredEntry { entry, bytes });
        Ok(id)
    }

    /// Copy up to `n` entries in enqueue order without removing them.
    #[must_use]
    pub fn peek(&self, n: usize) -> Vec<QueueEntry> {
        self.inner
            .lock()
            .entries
            .iter()
            .take(n)
            .map(|s| s.entry.clone())
            .collect()
    }

    /// Remove one entry by id, returning it if present.
    pub fn dequeue(&self, id: Uuid) -> Option<QueueEntry> {
        let mut inner = self.inner.lock();
        let position = inner.entries.iter().position(|s| s.entry.id == id)?;
        let removed = inner.entries.remove(position)?;
        inner.total_bytes -= removed.bytes;
        Some(removed.entry)
    }

    /// Entries currently parked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// True when nothing is parked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Tracked serialized size of all parked entries.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.inner.lock().total_bytes
    }

    /// Drop everything.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.total_bytes = 0;
    }
}
