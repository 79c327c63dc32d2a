//! Response caching scenarios.

use crate::fixtures::*;
use crate::mock_vendors::MockVendor;
use adapter_core::ServiceCategory;
use serde_json::json;
use std::sync::Arc;

/// First call hits the vendor, an identical second call is served from cache.
#[tokio::test]
async fn test_second_identical_call_is_cached() {
    let vendor =
        MockVendor::succeeding("paystack", ServiceCategory::Payment, json!({"rate": 415.2}));
    let adapter = adapter_with_vendor(adapter_config(), Arc::clone(&vendor)).await;

    let first = adapter.execute(cached_request("tenant-1", "fx_rate")).await;
    assert!(first.success);
    assert!(!first.cached);
    assert_eq!(vendor.calls(), 1);

    let second = adapter.execute(cached_request("tenant-1", "fx_rate")).await;
    assert!(second.success);
    assert!(second.cached);
    assert_eq!(second.data, Some(json!({"rate": 415.2})));
    assert_eq!(vendor.calls(), 1);
}

/// Different payloads are different cache keys.
#[tokio::test]
async fn test_distinct_payloads_do_not_share_entries() {
    let vendor = MockVendor::succeeding("paystack", ServiceCategory::Payment, json!({"ok": true}));
    let adapter = adapter_with_vendor(adapter_config(), Arc::clone(&vendor)).await;

    let with_pair = |pair: &str| {
        adapter_core::ServiceRequest::builder()
            .service_id("payment")
            .operation("fx_rate")
            .tenant_id("tenant-1")
            .payload(json!({"pair": pair}))
            .cache_policy(adapter_core::CachePolicy::for_seconds(60))
            .build()
            .expect("valid request")
    };

    adapter.execute(with_pair("USDNGN")).await;
    adapter.execute(with_pair("EURNGN")).await;
    assert_eq!(vendor.calls(), 2);
}

/// Invalidation forces the next call back to the vendor; repeating it is a
/// no-op.
#[tokio::test]
async fn test_invalidation_is_idempotent() {
    let vendor = MockVendor::succeeding("paystack", ServiceCategory::Payment, json!({"ok": true}));
    let adapter = adapter_with_vendor(adapter_config(), Arc::clone(&vendor)).await;

    adapter.execute(cached_request("tenant-1", "fx_rate")).await;
    assert!(adapter.execute(cached_request("tenant-1", "fx_rate")).await.cached);

    adapter.invalidate_cache("payment", "fx_rate");
    adapter.invalidate_cache("payment", "fx_rate");

    let after = adapter.execute(cached_request("tenant-1", "fx_rate")).await;
    assert!(!after.cached);
    assert_eq!(vendor.calls(), 2);
}

/// Requests without a cache policy never populate the cache.
#[tokio::test]
async fn test_uncached_requests_always_hit_vendor() {
    let vendor = MockVendor::succeeding("paystack", ServiceCategory::Payment, json!(null));
    let adapter = adapter_with_vendor(adapter_config(), Arc::clone(&vendor)).await;

    adapter.execute(charge_request("tenant-1")).await;
    adapter.execute(charge_request("tenant-1")).await;
    assert_eq!(vendor.calls(), 2);
}
