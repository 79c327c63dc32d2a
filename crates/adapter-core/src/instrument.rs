//! The instrumentation seam.
//!
//! Metrics and tracing are consumed through this narrow interface; batching,
//! storage, and export live elsewhere. A no-op implementation is provided for
//! deployments without telemetry.

use uuid::Uuid;

/// Handle for an in-flight span; ending it is explicit.
pub trait SpanHandle: Send {
    /// Close the span.
    fn end(self: Box<Self>);
}

/// Telemetry sink consumed by the orchestrator.
pub trait Instrumentation: Send + Sync {
    /// Record a counter/gauge observation.
    fn record_metric(&self, name: &str, value: f64, tags: &[(&str, &str)]);

    /// Open a span tied to a request's correlation id.
    fn start_span(&self, name: &str, correlation_id: Uuid) -> Box<dyn SpanHandle>;
}

/// Instrumentation that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInstrumentation;

struct NoopSpan;

impl SpanHandle for NoopSpan {
    fn end(self: Box<Self>) {}
}

impl Instrumentation for NoopInstrumentation {
    fn record_metric(&self, _name: &str, _value: f64, _tags: &[(&str, &str)]) {}

    fn start_span(&self, _name: &str, _correlation_id: Uuid) -> Box<dyn SpanHandle> {
        Box::new(NoopSpan)
    }
}
