//! Construction-time configuration for the adapter layer.

use crate::types::ServiceCategory;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

/// Circuit breaker tuning for one vendor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures in CLOSED before the circuit opens
    pub failure_threshold: u32,
    /// Successes in HALF_OPEN required to close the circuit
    pub success_threshold: u32,
    /// Time the circuit stays OPEN before admitting a probe
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Probe calls admitted per HALF_OPEN episode
    pub half_open_max_calls: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 3,
            timeout: Duration::from_secs(30),
            half_open_max_calls: 1,
        }
    }
}

/// Per-vendor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorConfig {
    /// Vendor identifier, unique within the adapter
    pub vendor_id: String,
    /// Service category the vendor serves
    pub category: ServiceCategory,
    /// Transport base URL handed to the vendor adapter
    pub base_url: String,
    /// Vendor credential; never serialized
    #[serde(skip_serializing, default = "empty_secret")]
    pub api_key: SecretString,
    /// Per-call timeout for this vendor
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Retry budget for calls to this vendor
    pub max_retries: u32,
    /// Token bucket refill rate
    pub rate_limit_per_second: f64,
    /// Token bucket capacity
    pub burst_size: u32,
    /// Circuit breaker tuning
    #[serde(default)]
    pub circuit_breaker: CircuitBreakerConfig,
    /// Deployment region, for region-scoped vendors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl VendorConfig {
    /// A minimally configured vendor, useful as a test fixture base.
    #[must_use]
    pub fn new(vendor_id: impl Into<String>, category: ServiceCategory) -> Self {
        Self {
            vendor_id: vendor_id.into(),
            category,
            base_url: String::new(),
            api_key: SecretString::new(String::new()),
            timeout: Duration::from_secs(10),
            max_retries: 3,
            rate_limit_per_second: 10.0,
            burst_size: 10,
            circuit_breaker: CircuitBreakerConfig::default(),
            region: None,
        }
    }
}

/// Top-level adapter configuration, passed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Fallback per-call timeout when the request omits one
    #[serde(with = "humantime_serde")]
    pub default_timeout: Duration,
    /// Global in-flight call ceiling
    pub max_concurrent_requests: usize,
    /// Offline queue entry-count bound
    pub offline_queue_max_size: usize,
    /// Offline queue byte-size bound
    pub offline_queue_max_bytes: usize,
    /// Entries re-submitted per drain cycle
    pub queue_drain_rate: usize,
    /// Response cache capacity
    pub cache_max_entries: usize,
    /// Registered vendors, keyed by vendor id
    #[serde(default)]
    pub vendors: HashMap<String, VendorConfig>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(10),
            max_concurrent_requests: 100,
            offline_queue_max_size: 1000,
            offline_queue_max_bytes: 10 * 1024 * 1024,
            queue_drain_rate: 10,
            cache_max_entries: 500,
            vendors: HashMap::new(),
        }
    }
}

impl AdapterConfig {
    /// Register a vendor, keyed by its own id.
    #[must_use]
    pub fn with_vendor(mut self, vendor: VendorConfig) -> Self {
        self.vendors.insert(vendor.vendor_id.clone(), vendor);
        self
    }
}
