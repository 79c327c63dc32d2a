//! Response types for the adapter layer.
//!
//! Every call through the orchestrator yields a [`ServiceResponse`], never a
//! raw error: failure is signaled by `success = false` plus an
//! [`ErrorDetail`]. Exactly one of `data`/`error` is populated, matching the
//! success flag.

use crate::error::AdapterError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Structured error carried on a failure response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable code (e.g. `CIRCUIT_OPEN`)
    pub code: String,
    /// Human-readable description
    pub message: String,
    /// Whether the caller may usefully retry
    pub retryable: bool,
    /// Suggested wait before retrying, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after_ms: Option<u64>,
}

impl From<&AdapterError> for ErrorDetail {
    fn from(err: &AdapterError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            retryable: err.is_retryable(),
            retry_after_ms: err.retry_after().map(|d| d.as_millis() as u64),
        }
    }
}

/// Outcome of one request through the execution pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse {
    /// Whether the call produced data
    pub success: bool,

    /// Result payload; set exactly when `success` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Failure detail; set exactly when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,

    /// Wall-clock time spent in the pipeline
    #[serde(with = "humantime_serde")]
    pub latency: Duration,

    /// Whether the data came from the response cache (no vendor call)
    pub cached: bool,

    /// Whether the request was diverted to the offline queue
    pub queued: bool,

    /// Vendor the request resolved to, or "unknown" pre-routing
    pub vendor_id: String,

    /// Correlation id copied from the request
    pub correlation_id: Uuid,

    /// When the response was produced
    pub timestamp: DateTime<Utc>,
}

impl ServiceResponse {
    /// A successful response carrying vendor data.
    #[must_use]
    pub fn success(
        data: serde_json::Value,
        vendor_id: impl Into<String>,
        correlation_id: Uuid,
        latency: Duration,
        cached: bool,
    ) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency,
            cached,
            queued: false,
            vendor_id: vendor_id.into(),
            correlation_id,
            timestamp: Utc::now(),
        }
    }

    /// A failure response derived from an adapter error.
    #[must_use]
    pub fn failure(
        err: &AdapterError,
        vendor_id: impl Into<String>,
        correlation_id: Uuid,
        latency: Duration,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorDetail::from(err)),
            latency,
            cached: false,
            queued: false,
            vendor_id: vendor_id.into(),
            correlation_id,
            timestamp: Utc::now(),
        }
    }

    /// A response signaling the request was deferred to the offline queue.
    #[must_use]
    pub fn deferred(vendor_id: impl Into<String>, correlation_id: Uuid, latency: Duration) -> Self {
        Self {
            success: false,
            data: None,
            error: None,
            latency,
            cached: false,
            queued: true,
            vendor_id: vendor_id.into(),
            correlation_id,
            timestamp: Utc::now(),
        }
    }
}
