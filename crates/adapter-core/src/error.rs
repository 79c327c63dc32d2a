//! Error taxonomy for the adapter layer.
//!
//! Every error carries a machine-readable code and a retryability flag.
//! Retryable errors are absorbed by the retry engine up to its budget; only
//! the final exhausted error (or a non-retryable error, immediately) reaches
//! the orchestrator, which converts it into a structured failure response.
//! Callers of `execute` never observe a raw error from vendor code.

use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the adapter crates.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Errors surfaced by the adapter layer.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    /// No route exists from a service id to a registered vendor adapter.
    #[error("service '{service}' is not registered")]
    ServiceNotFound {
        /// The unresolved service id
        service: String,
    },

    /// Circuit breaker rejected the call before dispatch.
    #[error("circuit breaker is open for vendor '{vendor}'")]
    CircuitOpen {
        /// Vendor whose circuit is open
        vendor: String,
    },

    /// Token bucket exhausted for this vendor/tenant pair.
    #[error("rate limit exceeded for vendor '{vendor}'")]
    RateLimitExceeded {
        /// Vendor whose bucket is exhausted
        vendor: String,
        /// Time until a token becomes available
        retry_after: Duration,
    },

    /// The vendor call exceeded its timeout.
    #[error("vendor '{vendor}' timed out after {timeout:?}")]
    VendorTimeout {
        /// Vendor that timed out
        vendor: String,
        /// The deadline that was exceeded
        timeout: Duration,
    },

    /// Transport-level failure raised by the vendor adapter.
    #[error("vendor '{vendor}' is unavailable: {message}")]
    VendorUnavailable {
        /// Vendor that failed
        vendor: String,
        /// Transport failure detail
        message: String,
    },

    /// The vendor rejected the adapter's credentials.
    #[error("authentication failed for vendor '{vendor}'")]
    VendorAuth {
        /// Vendor that rejected the credentials
        vendor: String,
    },

    /// The offline queue is at capacity (entry count or byte size).
    #[error("offline queue is full ({size}/{max})")]
    QueueFull {
        /// Current entry count
        size: usize,
        /// Configured maximum entry count
        max: usize,
    },

    /// The request failed compliance validation.
    #[error("compliance violations: {}", violations.join(", "))]
    ComplianceViolation {
        /// The individual violations, in detection order
        violations: Vec<String>,
    },

    /// A value failed local validation (builder input, cache TTL range).
    #[error("validation error: {message}")]
    Validation {
        /// What was rejected and why
        message: String,
    },

    /// Invariant breakage inside the adapter itself.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the broken invariant
        message: String,
    },
}

impl AdapterError {
    /// No route for the given service id.
    pub fn service_not_found(service: impl Into<String>) -> Self {
        Self::ServiceNotFound {
            service: service.into(),
        }
    }

    /// Circuit open for the given vendor.
    pub fn circuit_open(vendor: impl Into<String>) -> Self {
        Self::CircuitOpen {
            vendor: vendor.into(),
        }
    }

    /// Rate limit exhausted, retry possible after `retry_after`.
    pub fn rate_limit_exceeded(vendor: impl Into<String>, retry_after: Duration) -> Self {
        Self::RateLimitExceeded {
            vendor: vendor.into(),
            retry_after,
        }
    }

    /// Vendor call exceeded `timeout`.
    pub fn vendor_timeout(vendor: impl Into<String>, timeout: Duration) -> Self {
        Self::VendorTimeout {
            vendor: vendor.into(),
            timeout,
        }
    }

    /// Transport failure from the vendor adapter.
    pub fn vendor_unavailable(vendor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::VendorUnavailable {
            vendor: vendor.into(),
            message: message.into(),
        }
    }

    /// Credential rejection from the vendor.
    pub fn vendor_auth(vendor: impl Into<String>) -> Self {
        Self::VendorAuth {
            vendor: vendor.into(),
        }
    }

    /// Offline queue at capacity.
    pub fn queue_full(size: usize, max: usize) -> Self {
        Self::QueueFull { size, max }
    }

    /// Request failed compliance validation.
    pub fn compliance_violation(violations: Vec<String>) -> Self {
        Self::ComplianceViolation { violations }
    }

    /// Local validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Internal invariant failure.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Machine-readable error code, stable across releases.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ServiceNotFound { .. } => "SERVICE_NOT_FOUND",
            Self::CircuitOpen { .. } => "CIRCUIT_OPEN",
            Self::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            Self::VendorTimeout { .. } => "VENDOR_TIMEOUT",
            Self::VendorUnavailable { .. } => "VENDOR_UNAVAILABLE",
            Self::VendorAuth { .. } => "VENDOR_AUTH_ERROR",
            Self::QueueFull { .. } => "QUEUE_FULL",
            Self::ComplianceViolation { .. } => "COMPLIANCE_VIOLATION",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Internal { .. } => "INTERNAL",
        }
    }

    /// Whether the retry engine may re-attempt after this error.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CircuitOpen { .. }
                | Self::RateLimitExceeded { .. }
                | Self::VendorTimeout { .. }
                | Self::VendorUnavailable { .. }
        )
    }

    /// Suggested wait before retrying, when the failure mode knows one.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimitExceeded { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }
}
