//! # Adapter Engine
//!
//! The execution pipeline. [`ExternalAdapter`] wires the router, circuit
//! breaker, rate limiter, retry engine, cache, offline queue, and compliance
//! filter into a single `execute` call that always produces a structured
//! response.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;

pub use engine::{DrainReport, ExternalAdapter, VendorHealthReport};
