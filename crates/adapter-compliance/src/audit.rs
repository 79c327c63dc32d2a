//! Bounded audit trail.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;

/// Oldest entries are dropped past this point.
const MAX_ENTRIES: usize = 10_000;

/// One recorded compliance event. Details are masked before they get here.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// What happened, e.g. `request_received`.
    pub action: String,
    /// Masked event details.
    pub details: Value,
}

/// Append-only in-memory audit trail, bounded to 10,000 entries.
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: Mutex<VecDeque<AuditEntry>>,
}

impl AuditLog {
    /// Create an empty trail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event, dropping the oldest entry when full.
    pub fn append(&self, action: impl Into<String>, details: Value) {
        let mut entries = self.entries.lock();
        if entries.len() >= MAX_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(AuditEntry {
            timestamp: Utc::now(),
            action: action.into(),
            details,
        });
    }

    /// Snapshot of the trail, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    /// Entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
