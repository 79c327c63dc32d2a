//! Circuit breaker pattern implementation.
//!
//! One breaker instance owns the circuit state for every registered vendor.
//! Each vendor's state lives in its own sharded-map entry, so transitions for
//! unrelated vendors never serialize against each other, while the half-open
//! probe cap is enforced atomically per vendor.

use adapter_core::CircuitBreakerConfig;
use dashmap::DashMap;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Circuit is closed, requests flow normally
    Closed,
    /// Circuit is open, requests are rejected
    Open,
    /// Circuit is half-open, probing if the vendor recovered
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half_open"),
        }
    }
}

/// Per-vendor circuit bookkeeping. Mutated only under its map entry's lock.
#[derive(Debug)]
struct VendorCircuit {
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    last_failure: Option<Instant>,
    half_open_calls: u32,
    config: CircuitBreakerConfig,
}

impl VendorCircuit {
    fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            success_count: 0,
            last_failure: None,
            half_open_calls: 0,
            config,
        }
    }
}

/// Registry of per-vendor circuit breakers.
#[derive(Debug, Default)]
pub struct CircuitBreaker {
    circuits: DashMap<String, VendorCircuit>,
}

impl CircuitBreaker {
    /// Create an empty breaker registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a vendor with explicit tuning.
    pub fn register_vendor(&self, vendor_id: impl Into<String>, config: CircuitBreakerConfig) {
        self.circuits
            .insert(vendor_id.into(), VendorCircuit::new(config));
    }

    /// Check whether a call to this vendor may proceed.
    ///
    /// CLOSED always admits. OPEN admits only once the configured timeout has
    /// elapsed since the last failure, transitioning to HALF_OPEN (with fresh
    /// probe and success counters) before admitting. HALF_OPEN admits up to
    /// `half_open_max_calls` probes per episode.
    ///
    /// An unregistered vendor fails open: a default circuit is created on
    /// first contact so later failures still earn breaker protection.
    pub fn check(&self, vendor_id: &str) -> bool {
        let mut circuit = self
            .circuits
            .entry(vendor_id.to_string())
            .or_insert_with(|| VendorCircuit::new(CircuitBreakerConfig::default()));

        match circuit.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let elapsed_enough = circuit
                    .last_failure
                    .is_some_and(|at| at.elapsed() >= circuit.config.timeout);
                if elapsed_enough {
                    circuit.state = CircuitState::HalfOpen;
                    circuit.half_open_calls = 1;
                    circuit.success_count = 0;
                    info!(vendor = %vendor_id, "circuit half-open, admitting probe");
                    true
                } else {
                    false
                }
            }
            CircuitState::HalfOpen => {
                if circuit.half_open_calls < circuit.config.half_open_max_calls {
                    circuit.half_open_calls += 1;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Record a successful vendor call.
    pub fn record_success(&self, vendor_id: &str) {
        let Some(mut circuit) = self.circuits.get_mut(vendor_id) else {
            return;
        };

        match circuit.state {
            CircuitState::HalfOpen => {
                circuit.success_count += 1;
                debug!(
                    vendor = %vendor_id,
                    successes = circuit.success_count,
                    threshold = circuit.config.success_threshold,
                    "half-open success"
                );
                if circuit.success_count >= circuit.config.success_threshold {
                    circuit.state = CircuitState::Closed;
                    circuit.failure_count = 0;
                    circuit.success_count = 0;
                    circuit.half_open_calls = 0;
                    info!(vendor = %vendor_id, "circuit closed");
                }
            }
            CircuitState::Closed => {
                circuit.failure_count = 0;
            }
            CircuitState::Open => {}
        }
    }

    /// Record a failed vendor call.
    pub fn record_failure(&self, vendor_id: &str) {
        let mut circuit = self
            .circuits
            .entry(vendor_id.to_string())
            .or_insert_with(|| VendorCircuit::new(CircuitBreakerConfig::default()));

        match circuit.state {
            CircuitState::HalfOpen => {
                // Any probe failure reopens immediately
                circuit.state = CircuitState::Open;
                circuit.last_failure = Some(Instant::now());
                warn!(vendor = %vendor_id, "half-open probe failed, circuit reopened");
            }
            CircuitState::Closed => {
                circuit.failure_count += 1;
                circuit.last_failure = Some(Instant::now());
                if circuit.failure_count >= circuit.config.failure_threshold {
                    circuit.state = CircuitState::Open;
                    warn!(
                        vendor = %vendor_id,
                        failures = circuit.failure_count,
                        "failure threshold reached, circuit opened"
                    );
                }
            }
            CircuitState::Open => {
                circuit.last_failure = Some(Instant::now());
            }
        }
    }

    /// Current state for a vendor; unregistered vendors read as closed.
    #[must_use]
    pub fn state(&self, vendor_id: &str) -> CircuitState {
        self.circuits
            .get(vendor_id)
            .map_or(CircuitState::Closed, |c| c.state)
    }

    /// Force a vendor's circuit back to closed with fresh counters.
    pub fn reset(&self, vendor_id: &str) {
        if let Some(mut circuit) = self.circuits.get_mut(vendor_id) {
            circuit.state = CircuitState::Closed;
            circuit.failure_count = 0;
            circuit.success_count = 0;
            circuit.half_open_calls = 0;
            info!(vendor = %vendor_id, "circuit reset");
        }
    }
}
