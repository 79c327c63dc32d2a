//! Circuit breaker scenarios through the full pipeline.

use crate::fixtures::*;
use crate::mock_vendors::MockVendor;
use adapter_core::{AdapterError, HealthState, ServiceCategory};
use adapter_resilience::CircuitState;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Three consecutive failures open the breaker; the fourth call is rejected
/// without ever reaching the vendor adapter.
#[tokio::test]
async fn test_breaker_opens_after_threshold_failures() {
    let vendor = MockVendor::failing(
        "paystack",
        ServiceCategory::Payment,
        AdapterError::vendor_unavailable("paystack", "connection refused"),
    );
    let adapter = adapter_with_vendor(adapter_config(), Arc::clone(&vendor)).await;

    for _ in 0..3 {
        let response = adapter.execute(charge_request("tenant-1")).await;
        assert!(!response.success);
        assert_eq!(response.error.expect("error detail").code, "VENDOR_UNAVAILABLE");
    }
    assert_eq!(vendor.calls(), 3);

    let rejected = adapter.execute(charge_request("tenant-1")).await;
    assert_eq!(rejected.error.expect("error detail").code, "CIRCUIT_OPEN");
    assert_eq!(vendor.calls(), 3);

    let health = adapter.get_vendor_health("paystack");
    assert_eq!(health.circuit_state, CircuitState::Open);
    assert_eq!(health.health, HealthState::Unhealthy);
}

/// After the breaker timeout, a successful probe closes the circuit again.
#[tokio::test]
async fn test_breaker_recovers_through_half_open_probe() {
    let vendor = MockVendor::recovering(
        "paystack",
        ServiceCategory::Payment,
        3,
        AdapterError::vendor_unavailable("paystack", "503"),
        json!({"ref": "TXN_123"}),
    );
    let adapter = adapter_with_vendor(adapter_config(), Arc::clone(&vendor)).await;

    for _ in 0..3 {
        adapter.execute(charge_request("tenant-1")).await;
    }
    assert_eq!(adapter.get_vendor_health("paystack").circuit_state, CircuitState::Open);

    // Wait out the breaker timeout, then probe; the vendor has recovered
    tokio::time::sleep(Duration::from_millis(80)).await;
    let probe = adapter.execute(charge_request("tenant-1")).await;
    assert!(probe.success);
    assert_eq!(probe.data, Some(json!({"ref": "TXN_123"})));
    assert_eq!(adapter.get_vendor_health("paystack").circuit_state, CircuitState::Closed);
}

/// A failed probe reopens the circuit immediately.
#[tokio::test]
async fn test_failed_probe_reopens() {
    let vendor = MockVendor::failing(
        "paystack",
        ServiceCategory::Payment,
        AdapterError::vendor_unavailable("paystack", "still down"),
    );
    let adapter = adapter_with_vendor(adapter_config(), Arc::clone(&vendor)).await;

    for _ in 0..3 {
        adapter.execute(charge_request("tenant-1")).await;
    }
    tokio::time::sleep(Duration::from_millis(80)).await;

    // Probe reaches the vendor and fails
    let probe = adapter.execute(charge_request("tenant-1")).await;
    assert!(!probe.success);
    assert_eq!(vendor.calls(), 4);
    assert_eq!(adapter.get_vendor_health("paystack").circuit_state, CircuitState::Open);

    // Next call is rejected without a vendor touch
    adapter.execute(charge_request("tenant-1")).await;
    assert_eq!(vendor.calls(), 4);
}

/// Pre-dispatch rejections do not feed the breaker: a rate-limited request
/// leaves the circuit closed.
#[tokio::test]
async fn test_rate_limited_requests_do_not_trip_breaker() {
    let mut vendor_config = paystack_config();
    vendor_config.burst_size = 1;
    vendor_config.rate_limit_per_second = 0.001;
    vendor_config.circuit_breaker.failure_threshold = 1;
    let config = adapter_config().with_vendor(vendor_config);

    let vendor = MockVendor::succeeding("paystack", ServiceCategory::Payment, json!(null));
    let adapter = adapter_with_vendor(config, Arc::clone(&vendor)).await;

    assert!(adapter.execute(charge_request("tenant-1")).await.success);
    for _ in 0..5 {
        let response = adapter.execute(charge_request("tenant-1")).await;
        assert_eq!(response.error.expect("error detail").code, "RATE_LIMIT_EXCEEDED");
    }

    assert_eq!(adapter.get_vendor_health("paystack").circuit_state, CircuitState::Closed);
}
