//! # External Adapter
//!
//! Resilient mediation layer between an application and third-party network
//! vendors (payment gateways, messaging providers, and similar services).
//! Every outbound call goes through a single execution pipeline that layers
//! circuit breaking, per-tenant rate limiting, retry with backoff, response
//! caching, offline queuing, and compliance filtering.
//!
//! The crate is a facade over the workspace members:
//! - [`adapter_core`] — request/response types, errors, vendor adapter trait
//! - [`adapter_resilience`] — circuit breaker, rate limiter, retry, cache, queue
//! - [`adapter_routing`] — vendor registry and service routing
//! - [`adapter_compliance`] — validation, masking, audit trail
//! - [`adapter_engine`] — the orchestrating [`ExternalAdapter`]

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use adapter_compliance as compliance;
pub use adapter_core as core;
pub use adapter_engine as engine;
pub use adapter_resilience as resilience;
pub use adapter_routing as routing;

pub use adapter_core::{
    AdapterConfig, AdapterError, AdapterResult, CachePolicy, CircuitBreakerConfig, HealthState,
    Instrumentation, RequestPriority, ServiceCategory, ServiceRequest, ServiceResponse,
    VendorAdapter, VendorConfig,
};
pub use adapter_engine::{DrainReport, ExternalAdapter, VendorHealthReport};
