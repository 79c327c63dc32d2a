//! Integration tests for the external-service adapter layer
//!
//! This crate provides scenario tests covering:
//! - The full execution pipeline
//! - Circuit breaking under vendor outages
//! - Response caching
//! - Per-tenant rate limiting
//! - Offline queuing and drain

pub mod mock_vendors;

// Re-export commonly used items
pub use fixtures::*;
pub use mock_vendors::*;

#[cfg(test)]
mod cache_tests;
#[cfg(test)]
mod circuit_tests;
#[cfg(test)]
mod compliance_tests;
#[cfg(test)]
mod pipeline_tests;
