//! The vendor adapter trait.
//!
//! A vendor adapter owns the actual wire protocol for one third-party
//! service. The orchestrator only ever talks to this trait; transport,
//! authentication, and schema concerns stay behind it.

use crate::config::VendorConfig;
use crate::error::AdapterResult;
use crate::types::ServiceCategory;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Coarse health classification reported by a vendor adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    /// Responding normally
    Healthy,
    /// Responding but impaired (circuit not closed, elevated errors)
    Degraded,
    /// Not responding
    Unhealthy,
    /// No recent signal
    Unknown,
}

/// Interface implemented per third-party vendor.
#[async_trait]
pub trait VendorAdapter: Send + Sync {
    /// Vendor identifier, unique within the adapter.
    fn vendor_id(&self) -> &str;

    /// Service category this vendor serves.
    fn category(&self) -> ServiceCategory;

    /// Prepare the adapter for traffic (connection pools, credential checks).
    async fn initialize(&self, config: &VendorConfig) -> AdapterResult<()>;

    /// Perform one operation against the vendor.
    ///
    /// `timeout` is advisory for the transport; the orchestrator enforces its
    /// own deadline regardless.
    ///
    /// # Errors
    /// Any [`crate::AdapterError`]; retryability decides whether the retry
    /// engine re-attempts.
    async fn execute(
        &self,
        operation: &str,
        payload: &serde_json::Value,
        timeout: Duration,
    ) -> AdapterResult<serde_json::Value>;

    /// Probe vendor liveness.
    async fn health_check(&self) -> AdapterResult<HealthState>;

    /// Release resources; the adapter must reject calls afterwards.
    async fn shutdown(&self) -> AdapterResult<()>;
}
