//! Compliance validation and masking through the pipeline.

use crate::fixtures::*;
use crate::mock_vendors::MockVendor;
use adapter_core::{ServiceCategory, ServiceRequest};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// A request with violations is rejected before routing or the vendor.
#[tokio::test]
async fn test_violating_request_rejected_before_dispatch() {
    let vendor = MockVendor::succeeding("paystack", ServiceCategory::Payment, json!(null));
    let adapter = adapter_with_vendor(adapter_config(), Arc::clone(&vendor)).await;

    let request = ServiceRequest::builder()
        .service_id("payment")
        .operation("charge")
        .tenant_id("")
        .correlation_id(Uuid::nil())
        .timeout(Duration::from_secs(120))
        .build()
        .expect("builder does not enforce compliance");

    let response = adapter.execute(request).await;
    assert!(!response.success);
    let detail = response.error.expect("error detail");
    assert_eq!(detail.code, "COMPLIANCE_VIOLATION");
    assert!(!detail.retryable);
    // All three violations are reported together
    assert!(detail.message.contains("tenant_id"));
    assert!(detail.message.contains("correlation_id"));
    assert!(detail.message.contains("timeout"));
    assert_eq!(vendor.calls(), 0);
}

/// Rejected requests leave no audit entry; accepted ones leave a masked one.
#[tokio::test]
async fn test_audit_entries_for_accepted_requests_only() {
    let vendor = MockVendor::succeeding("paystack", ServiceCategory::Payment, json!(null));
    let adapter = adapter_with_vendor(adapter_config(), vendor).await;

    let bad = ServiceRequest::builder()
        .service_id("payment")
        .operation("charge")
        .tenant_id(" ")
        .build()
        .expect("builder does not enforce compliance");
    adapter.execute(bad).await;
    assert!(adapter.audit_log().is_empty());

    adapter.execute(charge_request("tenant-1")).await;
    let entries = adapter.audit_log().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "request_received");
    assert_eq!(entries[0].details["tenant_id"], "tenant-1");
}

/// Card numbers in audited details are masked down to the last four digits.
#[tokio::test]
async fn test_audit_masks_sensitive_payloads() {
    use adapter_compliance::ComplianceFilter;

    let filter = ComplianceFilter::new();
    filter.create_audit_entry(
        "charge",
        &json!({
            "card": "4111111111111111",
            "email": "buyer@example.com",
            "phone": "08031234567",
            "amount": 5000
        }),
    );

    let entries = filter.audit_log().entries();
    let details = &entries[0].details;
    assert_eq!(details["card"], "****-****-****-1111");
    assert_eq!(details["email"], "***@***.***");
    assert_eq!(details["phone"], "***-****-****");
    assert_eq!(details["amount"], 5000);
}
