//! Request types for the adapter layer.
//!
//! A [`ServiceRequest`] is immutable once constructed; the builder validates
//! required fields so downstream stages never see a half-formed request.

use crate::error::AdapterError;
use crate::types::RequestPriority;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

/// Caching directives carried on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePolicy {
    /// Whether the pipeline consults and populates the response cache
    pub enabled: bool,
    /// Time-to-live for a populated entry
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

impl CachePolicy {
    /// Cache for the given number of seconds.
    #[must_use]
    pub fn for_seconds(secs: u64) -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(secs),
        }
    }
}

/// An outbound request to a logical external service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    /// Logical service identifier (resolved to a vendor by the router)
    pub service_id: String,

    /// Operation name understood by the vendor adapter
    pub operation: String,

    /// Operation payload, vendor-shaped
    pub payload: serde_json::Value,

    /// Tenant on whose behalf the call is made
    pub tenant_id: String,

    /// Correlation id (UUID v4) threaded through spans and audit entries
    pub correlation_id: Uuid,

    /// Scheduling priority
    #[serde(default)]
    pub priority: RequestPriority,

    /// Per-request timeout; the orchestrator's default applies when absent
    #[serde(default, with = "humantime_serde::option")]
    pub timeout: Option<Duration>,

    /// Idempotency key forwarded to the vendor, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,

    /// Caching directives, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_policy: Option<CachePolicy>,

    /// Free-form routing/billing metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl ServiceRequest {
    /// Create a new builder.
    #[must_use]
    pub fn builder() -> ServiceRequestBuilder {
        ServiceRequestBuilder::default()
    }

    /// Whether this request opted into caching.
    #[must_use]
    pub fn cache_enabled(&self) -> bool {
        self.cache_policy.is_some_and(|p| p.enabled)
    }
}

/// Builder for [`ServiceRequest`].
#[derive(Debug, Default)]
pub struct ServiceRequestBuilder {
    service_id: Option<String>,
    operation: Option<String>,
    payload: Option<serde_json::Value>,
    tenant_id: Option<String>,
    correlation_id: Option<Uuid>,
    priority: RequestPriority,
    timeout: Option<Duration>,
    idempotency_key: Option<String>,
    cache_policy: Option<CachePolicy>,
    metadata: HashMap<String, String>,
}

impl ServiceRequestBuilder {
    /// Set the logical service id (required).
    #[must_use]
    pub fn service_id(mut self, id: impl Into<String>) -> Self {
        self.service_id = Some(id.into());
        self
    }

    /// Set the operation name (required).
    #[must_use]
    pub fn operation(mut self, op: impl Into<String>) -> Self {
        self.operation = Some(op.into());
        self
    }

    /// Set the payload (defaults to JSON null).
    #[must_use]
    pub fn payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Set the tenant id (required).
    #[must_use]
    pub fn tenant_id(mut self, id: impl Into<String>) -> Self {
        self.tenant_id = Some(id.into());
        self
    }

    /// Set an explicit correlation id; a fresh v4 UUID is generated otherwise.
    #[must_use]
    pub fn correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = Some(id);
        self
    }

    /// Set the priority.
    #[must_use]
    pub fn priority(mut self, priority: RequestPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Set a per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set an idempotency key.
    #[must_use]
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Set the cache policy.
    #[must_use]
    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = Some(policy);
        self
    }

    /// Add a metadata entry.
    #[must_use]
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Build the request.
    ///
    /// # Errors
    /// Returns a validation error when a required field is missing.
    pub fn build(self) -> Result<ServiceRequest, AdapterError> {
        let service_id = self
            .service_id
            .ok_or_else(|| AdapterError::validation("service_id is required"))?;
        let operation = self
            .operation
            .ok_or_else(|| AdapterError::validation("operation is required"))?;
        let tenant_id = self
            .tenant_id
            .ok_or_else(|| AdapterError::validation("tenant_id is required"))?;

        Ok(ServiceRequest {
            service_id,
            operation,
            payload: self.payload.unwrap_or(serde_json::Value::Null),
            tenant_id,
            correlation_id: self.correlation_id.unwrap_or_else(Uuid::new_v4),
            priority: self.priority,
            timeout: self.timeout,
            idempotency_key: self.idempotency_key,
            cache_policy: self.cache_policy,
            metadata: self.metadata,
        })
    }
}
