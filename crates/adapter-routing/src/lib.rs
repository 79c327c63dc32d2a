//! # Adapter Routing
//!
//! Maps logical service ids to registered vendor adapters. The router is the
//! only component that knows which vendor backs which service; everything
//! upstream works in terms of `service_id`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod router;

pub use router::RequestRouter;
