//! # Adapter Compliance
//!
//! Request validation, sensitive-data masking, and the audit trail. Masking
//! targets card numbers, email addresses, and phone numbers in request and
//! response payloads before they touch logs or audit storage.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
pub mod filter;

pub use audit::{AuditEntry, AuditLog};
pub use filter::ComplianceFilter;
