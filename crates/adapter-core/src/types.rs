//! Shared enums for the adapter layer.

use serde::{Deserialize, Serialize};

/// Category of external service a vendor provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    /// Payment gateways
    Payment,
    /// SMS / chat messaging providers
    Messaging,
    /// Identity verification services
    Identity,
    /// Geolocation and mapping services
    Geolocation,
    /// Object storage providers
    Storage,
    /// Transactional email providers
    Email,
}

impl std::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Payment => write!(f, "payment"),
            Self::Messaging => write!(f, "messaging"),
            Self::Identity => write!(f, "identity"),
            Self::Geolocation => write!(f, "geolocation"),
            Self::Storage => write!(f, "storage"),
            Self::Email => write!(f, "email"),
        }
    }
}

/// Priority of an outbound request.
///
/// Only `Low` requests are diverted to the offline queue under rate
/// pressure; higher priorities fail fast with a retry-after instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPriority {
    /// Must not be deferred
    Critical,
    /// Latency-sensitive
    High,
    /// Default priority
    Normal,
    /// May be queued for later delivery
    Low,
}

impl Default for RequestPriority {
    fn default() -> Self {
        Self::Normal
    }
}
