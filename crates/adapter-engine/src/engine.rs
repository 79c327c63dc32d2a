//! The `ExternalAdapter` orchestrator.

use adapter_compliance::ComplianceFilter;
use adapter_core::{
    AdapterConfig, AdapterError, HealthState, Instrumentation, NoopInstrumentation,
    RequestPriority, ServiceRequest, ServiceResponse, VendorAdapter,
};
use adapter_resilience::{
    CircuitBreaker, CircuitState, ConcurrencyLimiter, OfflineQueue, QueueEntry, RateLimiter,
    ResponseCache, RetryConfig, RetryPolicy,
};
use adapter_routing::RequestRouter;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Vendor id reported before routing has resolved one.
const UNKNOWN_VENDOR: &str = "unknown";

/// Tenant used for vendor-level health reads of the rate limiter.
const GLOBAL_TENANT: &str = "__global__";

/// Replay budget given to entries the pipeline parks itself.
const QUEUED_ENTRY_RETRIES: u32 = 3;

/// Outcome of one queue drain cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    /// Entries replayed successfully.
    pub drained: usize,
    /// Entries that failed replay this cycle.
    pub failed: usize,
}

/// Point-in-time health view for one vendor, derived from live state.
#[derive(Debug, Clone)]
pub struct VendorHealthReport {
    /// The vendor being reported on.
    pub vendor_id: String,
    /// Coarse health derived from the circuit state.
    pub health: HealthState,
    /// Current circuit state.
    pub circuit_state: CircuitState,
    /// Whole tokens left in the vendor's global rate bucket.
    pub rate_limit_remaining: u32,
    /// When this report was taken.
    pub last_checked: DateTime<Utc>,
}

/// Resilient front door to every external vendor.
///
/// One instance owns all shared state: the vendor registry, circuit
/// breakers, rate buckets, response cache, offline queue, and audit trail.
/// All methods take `&self`; the instance is shared freely across tasks.
pub struct ExternalAdapter {
    config: AdapterConfig,
    router: RequestRouter,
    circuit: CircuitBreaker,
    limiter: RateLimiter,
    cache: ResponseCache,
    queue: OfflineQueue,
    concurrency: ConcurrencyLimiter,
    compliance: ComplianceFilter,
    instrumentation: Arc<dyn Instrumentation>,
    online: AtomicBool,
}

impl ExternalAdapter {
    /// Build an adapter from configuration, with no telemetry sink.
    #[must_use]
    pub fn new(config: AdapterConfig) -> Self {
        Self::with_instrumentation(config, Arc::new(NoopInstrumentation))
    }

    /// Build an adapter that reports into the given telemetry sink.
    #[must_use]
    pub fn with_instrumentation(
        config: AdapterConfig,
        instrumentation: Arc<dyn Instrumentation>,
    ) -> Self {
        let circuit = CircuitBreaker::new();
        let limiter = RateLimiter::new();
        for (vendor_id, vendor) in &config.vendors {
            circuit.register_vendor(vendor_id.clone(), vendor.circuit_breaker.clone());
            limiter.register_vendor(
                vendor_id.clone(),
                vendor.rate_limit_per_second,
                vendor.burst_size,
            );
        }

        Self {
            router: RequestRouter::new(),
            circuit,
            limiter,
            cache: ResponseCache::new(config.cache_max_entries),
            queue: OfflineQueue::new(config.offline_queue_max_size, config.offline_queue_max_bytes),
            concurrency: ConcurrencyLimiter::new(config.max_concurrent_requests),
            compliance: ComplianceFilter::new(),
            instrumentation,
            online: AtomicBool::new(true),
            config,
        }
    }

    /// Register a vendor adapter, initializing it when configuration for
    /// its vendor id is present.
    pub async fn register_vendor_adapter(
        &self,
        adapter: Arc<dyn VendorAdapter>,
    ) -> Result<(), AdapterError> {
        if let Some(vendor) = self.config.vendors.get(adapter.vendor_id()) {
            adapter.initialize(vendor).await?;
        }
        self.router.register_vendor(adapter);
        Ok(())
    }

    /// Map a logical service onto a registered vendor.
    pub fn register_service_mapping(
        &self,
        service_id: impl Into<String>,
        vendor_id: impl Into<String>,
    ) -> Result<(), AdapterError> {
        self.router.register_service_mapping(service_id, vendor_id)
    }

    /// Run one request through the pipeline.
    ///
    /// Never returns an error: every failure mode becomes a structured
    /// response with `success = false` and an error detail, and deferred
    /// requests come back with `queued = true`.
    pub async fn execute(&self, request: ServiceRequest) -> ServiceResponse {
        let start = Instant::now();
        let span = self
            .instrumentation
            .start_span("external_adapter.execute", request.correlation_id);
        let response = self.execute_pipeline(&request, start).await;
        span.end();
        response
    }

    async fn execute_pipeline(&self, request: &ServiceRequest, start: Instant) -> ServiceResponse {
        // Compliance gate
        let violations = self.compliance.validate_request(request);
        if !violations.is_empty() {
            let err = AdapterError::compliance_violation(violations);
            self.record_failure_metric(UNKNOWN_VENDOR, &request.service_id);
            return ServiceResponse::failure(
                &err,
                UNKNOWN_VENDOR,
                request.correlation_id,
                start.elapsed(),
            );
        }

        self.compliance.create_audit_entry(
            "request_received",
            &json!({
                "service_id": request.service_id,
                "operation": request.operation,
                "tenant_id": request.tenant_id,
                "correlation_id": request.correlation_id.to_string(),
            }),
        );

        // Cache lookup
        let cache_key = cache_key(request);
        if request.cache_enabled() {
            if let Some(value) = self.cache.get(&cache_key) {
                self.instrumentation.record_metric(
                    "cache_hit",
                    1.0,
                    &[("service_id", &request.service_id)],
                );
                let vendor = self
                    .router
                    .vendor_for_service(&request.service_id)
                    .unwrap_or_else(|| UNKNOWN_VENDOR.to_string());
                return ServiceResponse::success(
                    value,
                    vendor,
                    request.correlation_id,
                    start.elapsed(),
                    true,
                );
            }
        }

        // Route resolution
        let adapter = match self.router.resolve(&request.service_id) {
            Ok(adapter) => adapter,
            Err(err) => {
                self.record_failure_metric(UNKNOWN_VENDOR, &request.service_id);
                return ServiceResponse::failure(
                    &err,
                    UNKNOWN_VENDOR,
                    request.correlation_id,
                    start.elapsed(),
                );
            }
        };
        let vendor_id = adapter.vendor_id().to_string();

        // Offline gate; nothing is dispatched while explicitly offline
        if !self.online.load(Ordering::SeqCst) {
            return self.enqueue_request(request, &vendor_id, start);
        }

        // Circuit gate; rejected requests never mutate breaker state
        if !self.circuit.check(&vendor_id) {
            let err = AdapterError::circuit_open(&vendor_id);
            self.record_failure_metric(&vendor_id, &request.service_id);
            return ServiceResponse::failure(
                &err,
                vendor_id,
                request.correlation_id,
                start.elapsed(),
            );
        }

        // Rate gate
        if !self.limiter.acquire(&vendor_id, &request.tenant_id) {
            if request.priority == RequestPriority::Low {
                return self.enqueue_request(request, &vendor_id, start);
            }
            let retry_after = self.limiter.retry_after(&vendor_id, &request.tenant_id);
            let err = AdapterError::rate_limit_exceeded(&vendor_id, retry_after);
            self.record_failure_metric(&vendor_id, &request.service_id);
            return ServiceResponse::failure(
                &err,
                vendor_id,
                request.correlation_id,
                start.elapsed(),
            );
        }

        // Concurrency gate; the permit rides the rest of the pipeline
        let Some(_permit) = self.concurrency.try_acquire() else {
            return self.enqueue_request(request, &vendor_id, start);
        };

        // The vendor call, retried and raced against the timeout
        let call_timeout = request.timeout.unwrap_or(self.config.default_timeout);
        let max_retries = self
            .config
            .vendors
            .get(&vendor_id)
            .map_or(3, |v| v.max_retries);
        let retry = RetryPolicy::new(RetryConfig {
            max_retries,
            ..RetryConfig::default()
        });

        let result = retry
            .run(|| {
                let adapter = Arc::clone(&adapter);
                let vendor = vendor_id.clone();
                let operation = request.operation.clone();
                let payload = request.payload.clone();
                async move {
                    match tokio::time::timeout(
                        call_timeout,
                        adapter.execute(&operation, &payload, call_timeout),
                    )
                    .await
                    {
                        Ok(outcome) => outcome,
                        // The in-flight call is abandoned; a late result is ignored
                        Err(_) => Err(AdapterError::vendor_timeout(vendor, call_timeout)),
                    }
                }
            })
            .await;

        match result {
            Ok(data) => {
                self.circuit.record_success(&vendor_id);
                self.instrumentation.record_metric(
                    "request_success",
                    1.0,
                    &[("vendor_id", &vendor_id), ("service_id", &request.service_id)],
                );

                if let Some(policy) = request.cache_policy.filter(|p| p.enabled) {
                    // A bad TTL must not fail a call that already succeeded
                    if let Err(err) = self.cache.set(cache_key, data.clone(), policy.ttl) {
                        warn!(
                            correlation_id = %request.correlation_id,
                            error = %err,
                            "skipping cache write"
                        );
                    }
                }

                ServiceResponse::success(
                    data,
                    vendor_id,
                    request.correlation_id,
                    start.elapsed(),
                    false,
                )
            }
            Err(err) => {
                self.circuit.record_failure(&vendor_id);
                self.record_failure_metric(&vendor_id, &request.service_id);
                debug!(
                    vendor = %vendor_id,
                    correlation_id = %request.correlation_id,
                    error = %err,
                    "vendor call failed after retries"
                );
                ServiceResponse::failure(&err, vendor_id, request.correlation_id, start.elapsed())
            }
        }
    }

    fn enqueue_request(
        &self,
        request: &ServiceRequest,
        vendor_id: &str,
        start: Instant,
    ) -> ServiceResponse {
        let entry = QueueEntry::new(request.clone(), QUEUED_ENTRY_RETRIES);
        match self.queue.enqueue(entry) {
            Ok(_) => {
                self.instrumentation.record_metric(
                    "request_queued",
                    1.0,
                    &[("vendor_id", vendor_id), ("service_id", &request.service_id)],
                );
                ServiceResponse::deferred(vendor_id, request.correlation_id, start.elapsed())
            }
            Err(err) => {
                self.record_failure_metric(vendor_id, &request.service_id);
                ServiceResponse::failure(&err, vendor_id, request.correlation_id, start.elapsed())
            }
        }
    }

    fn record_failure_metric(&self, vendor_id: &str, service_id: &str) {
        self.instrumentation.record_metric(
            "request_failure",
            1.0,
            &[("vendor_id", vendor_id), ("service_id", service_id)],
        );
    }

    /// Health view for one vendor, derived from breaker and limiter state.
    #[must_use]
    pub fn get_vendor_health(&self, vendor_id: &str) -> VendorHealthReport {
        let circuit_state = self.circuit.state(vendor_id);
        let health = match circuit_state {
            CircuitState::Closed => HealthState::Healthy,
            CircuitState::HalfOpen => HealthState::Degraded,
            CircuitState::Open => HealthState::Unhealthy,
        };
        VendorHealthReport {
            vendor_id: vendor_id.to_string(),
            health,
            circuit_state,
            rate_limit_remaining: self.limiter.remaining(vendor_id, GLOBAL_TENANT),
            last_checked: Utc::now(),
        }
    }

    /// Drop every cached response for one service operation.
    pub fn invalidate_cache(&self, service_id: &str, operation: &str) {
        self.cache.invalidate_prefix(&format!("{service_id}:{operation}:"));
    }

    /// Requests currently parked in the offline queue.
    #[must_use]
    pub fn queue_size(&self) -> usize {
        self.queue.len()
    }

    /// Replay up to one drain batch of parked requests.
    ///
    /// A replay that fails with remaining retry budget is re-enqueued with
    /// its retry count bumped; one the pipeline itself parked again, or one
    /// out of budget, is only counted as failed.
    pub async fn drain_queue(&self) -> DrainReport {
        let mut report = DrainReport::default();
        let batch = self.queue.peek(self.config.queue_drain_rate);

        for entry in batch {
            if self.queue.dequeue(entry.id).is_none() {
                // Raced with another drain
                continue;
            }

            let response = self.execute(entry.request.clone()).await;
            if response.success {
                report.drained += 1;
            } else {
                report.failed += 1;
                if !response.queued && entry.has_retry_budget() {
                    let mut retried = entry;
                    retried.retry_count += 1;
                    if let Err(err) = self.queue.enqueue(retried) {
                        warn!(error = %err, "dropping queue entry, re-enqueue failed");
                    }
                }
            }
        }

        if report.drained > 0 || report.failed > 0 {
            info!(drained = report.drained, failed = report.failed, "queue drain cycle finished");
            self.instrumentation.record_metric(
                "queue_drained",
                report.drained as f64,
                &[],
            );
        }
        report
    }

    /// Mark the adapter online or offline.
    ///
    /// Coming back online immediately attempts one drain cycle.
    pub async fn set_online_status(&self, online: bool) {
        let was_online = self.online.swap(online, Ordering::SeqCst);
        if online && !was_online {
            info!("adapter back online, draining offline queue");
            self.drain_queue().await;
        }
    }

    /// Whether the adapter currently considers itself online.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// The compliance audit trail.
    #[must_use]
    pub fn audit_log(&self) -> &adapter_compliance::AuditLog {
        self.compliance.audit_log()
    }

    /// Shut down every registered vendor adapter.
    ///
    /// Individual shutdown failures are logged and do not stop the rest.
    pub async fn shutdown(&self) {
        for vendor_id in self.router.list_vendors() {
            if let Some(adapter) = self.router.get(&vendor_id) {
                if let Err(err) = adapter.shutdown().await {
                    warn!(vendor = %vendor_id, error = %err, "vendor shutdown failed");
                }
            }
        }
        info!("external adapter shut down");
    }
}

fn cache_key(request: &ServiceRequest) -> String {
    format!(
        "{}:{}:{}",
        request.service_id, request.operation, request.payload
    )
}
