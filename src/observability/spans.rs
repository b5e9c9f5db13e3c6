//! Span helpers for message dispatch

#[cfg(feature = "telemetry")]
use tracing::Span;

/// Helper for the span wrapping one processed message.
pub struct DispatchSpan;

impl DispatchSpan {
    /// Create a span for dispatching a message to `feature`.
    #[cfg(feature = "telemetry")]
    pub fn new(feature: &str) -> Span {
        tracing::debug_span!(
            "dispatch",
            feature = %feature,
            success = tracing::field::Empty,
            duration_ms = tracing::field::Empty
        )
    }

    #[cfg(not(feature = "telemetry"))]
    pub fn new(_feature: &str) -> NoOpSpan {
        NoOpSpan
    }
}

/// No-op span when telemetry is disabled.
#[derive(Clone)]
#[allow(dead_code)]
pub struct NoOpSpan;

#[allow(dead_code)]
impl NoOpSpan {
    pub fn enter(&self) -> NoOpGuard {
        NoOpGuard
    }
}

/// No-op guard when telemetry is disabled.
#[allow(dead_code)]
pub struct NoOpGuard;

/// Extension trait for spans.
pub trait SpanExt {
    /// Record success status on the span.
    fn record_success(&self, success: bool);

    /// Record duration in milliseconds on the span.
    fn record_duration_ms(&self, duration_ms: f64);
}

#[cfg(feature = "telemetry")]
impl SpanExt for Span {
    fn record_success(&self, success: bool) {
        self.record("success", success);
    }

    fn record_duration_ms(&self, duration_ms: f64) {
        self.record("duration_ms", duration_ms);
    }
}

#[cfg(not(feature = "telemetry"))]
impl SpanExt for NoOpSpan {
    fn record_success(&self, _success: bool) {}
    fn record_duration_ms(&self, _duration_ms: f64) {}
}
