//! Mock vendor adapters for scenario tests.

use adapter_core::{
    AdapterError, AdapterResult, HealthState, ServiceCategory, VendorAdapter, VendorConfig,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// What the mock does on the next call.
#[derive(Debug, Clone)]
enum Behavior {
    /// Always return this value.
    Succeed(Value),
    /// Fail `remaining` times with `error`, then return `then`.
    FailTimes {
        remaining: u32,
        error: AdapterError,
        then: Value,
    },
    /// Always fail with this error.
    Fail(AdapterError),
}

/// Configurable in-memory vendor adapter.
pub struct MockVendor {
    vendor_id: String,
    category: ServiceCategory,
    behavior: Mutex<Behavior>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicU32,
    initialized: AtomicBool,
    shut_down: AtomicBool,
}

impl MockVendor {
    /// A vendor that always succeeds with `value`.
    pub fn succeeding(vendor_id: &str, category: ServiceCategory, value: Value) -> Arc<Self> {
        Arc::new(Self {
            vendor_id: vendor_id.to_string(),
            category,
            behavior: Mutex::new(Behavior::Succeed(value)),
            delay: Mutex::new(None),
            calls: AtomicU32::new(0),
            initialized: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
        })
    }

    /// A vendor that always fails with `error`.
    pub fn failing(vendor_id: &str, category: ServiceCategory, error: AdapterError) -> Arc<Self> {
        let vendor = Self::succeeding(vendor_id, category, Value::Null);
        *vendor.behavior.lock() = Behavior::Fail(error);
        vendor
    }

    /// A vendor that fails `times` times with `error`, then succeeds with `then`.
    pub fn recovering(
        vendor_id: &str,
        category: ServiceCategory,
        times: u32,
        error: AdapterError,
        then: Value,
    ) -> Arc<Self> {
        let vendor = Self::succeeding(vendor_id, category, Value::Null);
        *vendor.behavior.lock() = Behavior::FailTimes {
            remaining: times,
            error,
            then,
        };
        vendor
    }

    /// Sleep this long inside every call.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Switch to always succeeding with `value`.
    pub fn succeed_with(&self, value: Value) {
        *self.behavior.lock() = Behavior::Succeed(value);
    }

    /// Switch to always failing with `error`.
    pub fn fail_with(&self, error: AdapterError) {
        *self.behavior.lock() = Behavior::Fail(error);
    }

    /// Calls that reached this vendor.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Whether `initialize` ran.
    pub fn initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Whether `shutdown` ran.
    pub fn shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VendorAdapter for MockVendor {
    fn vendor_id(&self) -> &str {
        &self.vendor_id
    }

    fn category(&self) -> ServiceCategory {
        self.category
    }

    async fn initialize(&self, _config: &VendorConfig) -> AdapterResult<()> {
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn execute(
        &self,
        _operation: &str,
        _payload: &Value,
        _timeout: Duration,
    ) -> AdapterResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut behavior = self.behavior.lock();
        match &mut *behavior {
            Behavior::Succeed(value) => Ok(value.clone()),
            Behavior::Fail(error) => Err(error.clone()),
            Behavior::FailTimes {
                remaining,
                error,
                then,
            } => {
                if *remaining > 0 {
                    *remaining -= 1;
                    Err(error.clone())
                } else {
                    Ok(then.clone())
                }
            }
        }
    }

    async fn health_check(&self) -> AdapterResult<HealthState> {
        Ok(HealthState::Healthy)
    }

    async fn shutdown(&self) -> AdapterResult<()> {
        self.shut_down.store(true, Ordering::SeqCst);
        Ok(())
    }
}
