//! # Adapter Core
//!
//! Core types, traits, and error handling for the external-service adapter
//! layer:
//! - Request and response types
//! - The vendor adapter trait consumed by the orchestrator
//! - Error taxonomy with machine-readable codes and retryability
//! - Construction-time configuration types
//! - The narrow instrumentation seam

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod instrument;
pub mod request;
pub mod response;
pub mod types;
pub mod vendor;

// Re-export commonly used types
pub use config::{AdapterConfig, CircuitBreakerConfig, VendorConfig};
pub use error::{AdapterError, AdapterResult};
pub use instrument::{Instrumentation, NoopInstrumentation, SpanHandle};
pub use request::{CachePolicy, ServiceRequest, ServiceRequestBuilder};
pub use response::{ErrorDetail, ServiceResponse};
pub use types::{RequestPriority, ServiceCategory};
pub use vendor::{HealthState, VendorAdapter};
