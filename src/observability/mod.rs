//! Local diagnostics for the SDK itself
//!
//! - Structured logging via the `tracing` crate
//! - Per-feature worker metrics with latency histograms
//! - Dispatch spans around every processed message
//!
//! This is separate from the `telemetry` feature processor, which reports
//! SDK errors to the backend through the native platform.
//!
//! # Feature Flags
//!
//! - `telemetry` (default): dispatch spans
//! - `release-logs`: strip debug/trace at compile time
//! - `max-perf`: disable all tracing

mod init;
pub mod metrics;
mod spans;

pub use init::{init_logging, LoggingConfig};
pub use metrics::{FeatureMetrics, Histogram, MetricsSnapshot, WorkerMetrics, HISTOGRAM_CAPACITY};
pub use spans::{DispatchSpan, SpanExt};
