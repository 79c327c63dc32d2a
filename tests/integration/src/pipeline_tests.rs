//! End-to-end pipeline scenarios.

use crate::fixtures::*;
use crate::mock_vendors::MockVendor;
use adapter_core::{AdapterError, ServiceCategory, ServiceRequest};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// The happy path: routed, admitted, executed, and fully populated response.
#[tokio::test]
async fn test_successful_request_round_trip() {
    let vendor = MockVendor::succeeding(
        "paystack",
        ServiceCategory::Payment,
        json!({"status": "success", "data": {"ref": "TXN_123"}}),
    );
    let adapter = adapter_with_vendor(adapter_config(), Arc::clone(&vendor)).await;

    let request = charge_request("tenant-1");
    let correlation_id = request.correlation_id;
    let response = adapter.execute(request).await;

    assert!(response.success);
    assert_eq!(
        response.data,
        Some(json!({"status": "success", "data": {"ref": "TXN_123"}}))
    );
    assert_eq!(response.vendor_id, "paystack");
    assert_eq!(response.correlation_id, correlation_id);
    assert!(!response.cached);
    assert!(!response.queued);
    assert!(response.error.is_none());
    assert!(vendor.initialized());
}

/// An unmapped service fails with SERVICE_NOT_FOUND and a structured error.
#[tokio::test]
async fn test_unregistered_service() {
    let vendor = MockVendor::succeeding("paystack", ServiceCategory::Payment, json!(null));
    let adapter = adapter_with_vendor(adapter_config(), vendor).await;

    let request = ServiceRequest::builder()
        .service_id("unknown-service")
        .operation("op")
        .tenant_id("tenant-1")
        .build()
        .expect("valid request");
    let response = adapter.execute(request).await;

    assert!(!response.success);
    let detail = response.error.expect("error detail");
    assert_eq!(detail.code, "SERVICE_NOT_FOUND");
    assert!(!detail.retryable);
    assert_eq!(response.vendor_id, "unknown");
}

/// Retryable vendor failures are retried inside one execute call.
#[tokio::test]
async fn test_transient_failure_absorbed_by_retry() {
    let vendor = MockVendor::recovering(
        "paystack",
        ServiceCategory::Payment,
        2,
        AdapterError::vendor_unavailable("paystack", "503"),
        json!({"ref": "TXN_RETRY"}),
    );
    let mut vendor_config = paystack_config();
    vendor_config.max_retries = 3;
    let config = adapter_config().with_vendor(vendor_config);
    let adapter = adapter_with_vendor(config, Arc::clone(&vendor)).await;

    let response = adapter.execute(charge_request("tenant-1")).await;
    assert!(response.success);
    assert_eq!(vendor.calls(), 3);
}

/// Non-retryable failures surface immediately without burning retries.
#[tokio::test]
async fn test_auth_failure_not_retried() {
    let vendor = MockVendor::failing(
        "paystack",
        ServiceCategory::Payment,
        AdapterError::vendor_auth("paystack"),
    );
    let mut vendor_config = paystack_config();
    vendor_config.max_retries = 3;
    let config = adapter_config().with_vendor(vendor_config);
    let adapter = adapter_with_vendor(config, Arc::clone(&vendor)).await;

    let response = adapter.execute(charge_request("tenant-1")).await;
    let detail = response.error.expect("error detail");
    assert_eq!(detail.code, "VENDOR_AUTH_ERROR");
    assert!(!detail.retryable);
    assert_eq!(vendor.calls(), 1);
}

/// A slow vendor surfaces a retryable VENDOR_TIMEOUT.
#[tokio::test]
async fn test_slow_vendor_times_out() {
    let vendor = MockVendor::succeeding("paystack", ServiceCategory::Payment, json!(null));
    vendor.set_delay(Duration::from_secs(30));
    let adapter = adapter_with_vendor(adapter_config(), vendor).await;

    let request = ServiceRequest::builder()
        .service_id("payment")
        .operation("charge")
        .tenant_id("tenant-1")
        .timeout(Duration::from_millis(30))
        .build()
        .expect("valid request");

    let response = adapter.execute(request).await;
    let detail = response.error.expect("error detail");
    assert_eq!(detail.code, "VENDOR_TIMEOUT");
    assert!(detail.retryable);
}

/// When the concurrency ceiling is reached, the overflow request is queued.
#[tokio::test]
async fn test_concurrency_overflow_queues() {
    let mut config = adapter_config();
    config.max_concurrent_requests = 1;

    let vendor = MockVendor::succeeding("paystack", ServiceCategory::Payment, json!(null));
    vendor.set_delay(Duration::from_millis(200));
    let adapter = Arc::new(adapter_with_vendor(config, Arc::clone(&vendor)).await);

    let slow = {
        let adapter = Arc::clone(&adapter);
        tokio::spawn(async move { adapter.execute(charge_request("tenant-1")).await })
    };
    // Let the first request claim the only slot
    tokio::time::sleep(Duration::from_millis(50)).await;

    let overflow = adapter.execute(charge_request("tenant-2")).await;
    assert!(overflow.queued);
    assert_eq!(adapter.queue_size(), 1);

    let first = slow.await.expect("task completes");
    assert!(first.success);
}

/// Shutdown reaches every registered vendor adapter.
#[tokio::test]
async fn test_shutdown_propagates_to_vendors() {
    let vendor = MockVendor::succeeding("paystack", ServiceCategory::Payment, json!(null));
    let adapter = adapter_with_vendor(adapter_config(), Arc::clone(&vendor)).await;

    adapter.shutdown().await;
    assert!(vendor.shut_down());
}
