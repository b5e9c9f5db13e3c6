//! Metrics collection for the work queue.
//!
//! Counters and latency histograms are kept per feature target. Each worker
//! owns its own instance and records for the lifetime of the SDK, so
//! histograms only retain the most recent samples.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Per-feature dispatch metrics for one worker.
#[derive(Debug, Default)]
pub struct WorkerMetrics {
    features: Mutex<HashMap<String, FeatureMetrics>>,
}

impl WorkerMetrics {
    /// Create an empty metrics instance.
    pub fn new() -> Self {
        Self::default()
    }

    fn features(&self) -> MutexGuard<'_, HashMap<String, FeatureMetrics>> {
        self.features.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_feature(&self, feature: &str, f: impl FnOnce(&mut FeatureMetrics)) {
        let mut features = self.features();
        match features.get_mut(feature) {
            Some(entry) => f(entry),
            None => f(features.entry(feature.to_string()).or_default()),
        }
    }

    /// Record a message accepted by the queue.
    pub fn record_enqueued(&self, feature: &str) {
        self.with_feature(feature, |m| m.enqueued += 1);
    }

    /// Record how long a message waited between enqueue and dispatch.
    pub fn record_queue_wait(&self, feature: &str, wait: Duration) {
        self.with_feature(feature, |m| m.queue_wait.record(wait));
    }

    /// Record a message its processor handled successfully.
    pub fn record_processed(&self, feature: &str, duration: Duration) {
        self.with_feature(feature, |m| {
            m.processed += 1;
            m.record_processing(duration);
        });
    }

    /// Record a message whose processor returned an error.
    pub fn record_failed(&self, feature: &str, duration: Duration) {
        self.with_feature(feature, |m| {
            m.failed += 1;
            m.record_processing(duration);
        });
    }

    /// Record a message whose processor panicked.
    pub fn record_panicked(&self, feature: &str, duration: Duration) {
        self.with_feature(feature, |m| {
            m.panicked += 1;
            m.record_processing(duration);
        });
    }

    /// Record a message with no registered processor.
    pub fn record_unrouted(&self, feature: &str) {
        self.with_feature(feature, |m| m.unrouted += 1);
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            features: self.features().clone(),
        }
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        self.features().clear();
    }
}

/// Metrics for one feature target.
#[derive(Debug, Clone, Default)]
pub struct FeatureMetrics {
    pub enqueued: u64,
    pub processed: u64,
    pub failed: u64,
    pub panicked: u64,
    pub unrouted: u64,
    pub total_processing: Duration,
    pub queue_wait: Histogram,
    pub processing: Histogram,
}

impl FeatureMetrics {
    fn record_processing(&mut self, duration: Duration) {
        self.total_processing += duration;
        self.processing.record(duration);
    }

    /// Messages that reached a processor, whatever the outcome.
    pub fn dispatched(&self) -> u64 {
        self.processed + self.failed + self.panicked
    }

    /// Get average processing duration.
    pub fn avg_processing(&self) -> Duration {
        match self.dispatched() {
            0 => Duration::ZERO,
            n => {
                let nanos = self.total_processing.as_nanos() / u128::from(n);
                Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
            }
        }
    }

    /// Get success rate as a percentage.
    pub fn success_rate(&self) -> f64 {
        match self.dispatched() {
            0 => 100.0,
            n => (self.processed as f64 / n as f64) * 100.0,
        }
    }
}

/// Samples kept per histogram
pub const HISTOGRAM_CAPACITY: usize = 1024;

/// Latency histogram over a sliding window of recent samples.
///
/// Percentiles describe the last [`HISTOGRAM_CAPACITY`] samples; older ones
/// are evicted as new ones arrive.
#[derive(Debug, Clone)]
pub struct Histogram {
    samples: VecDeque<Duration>,
    capacity: usize,
    recorded: u64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::with_capacity(HISTOGRAM_CAPACITY)
    }
}

impl Histogram {
    /// Create a new histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a histogram retaining at most `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity.min(HISTOGRAM_CAPACITY)),
            capacity,
            recorded: 0,
        }
    }

    /// Record a sample, evicting the oldest once full.
    pub fn record(&mut self, duration: Duration) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(duration);
        self.recorded += 1;
    }

    /// Number of samples currently retained.
    pub fn count(&self) -> usize {
        self.samples.len()
    }

    /// Number of samples ever recorded.
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    pub fn p50(&self) -> Option<Duration> {
        self.percentile(50)
    }

    pub fn p90(&self) -> Option<Duration> {
        self.percentile(90)
    }

    pub fn p95(&self) -> Option<Duration> {
        self.percentile(95)
    }

    pub fn p99(&self) -> Option<Duration> {
        self.percentile(99)
    }

    /// Get the specified percentile.
    pub fn percentile(&self, p: u8) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }

        let mut sorted: Vec<_> = self.samples.iter().copied().collect();
        sorted.sort_unstable();

        let index = (p as f64 / 100.0 * (sorted.len() - 1) as f64).round() as usize;
        sorted.get(index.min(sorted.len() - 1)).copied()
    }
}

/// Snapshot of all metrics at a point in time.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub features: HashMap<String, FeatureMetrics>,
}

impl MetricsSnapshot {
    /// Metrics for one feature, if it saw any traffic.
    pub fn feature(&self, feature: &str) -> Option<&FeatureMetrics> {
        self.features.get(feature)
    }

    pub fn total_enqueued(&self) -> u64 {
        self.features.values().map(|m| m.enqueued).sum()
    }

    pub fn total_processed(&self) -> u64 {
        self.features.values().map(|m| m.processed).sum()
    }

    /// Format as a human-readable report.
    pub fn format_report(&self) -> String {
        let mut report = String::new();
        report.push_str("=== Worker Metrics ===\n\n");

        let mut names: Vec<_> = self.features.keys().collect();
        names.sort();

        for name in names {
            let metrics = &self.features[name];
            report.push_str(&format!(
                "  {}: {} enqueued, {} processed, {} failed, {} panicked, {} unrouted\n",
                name,
                metrics.enqueued,
                metrics.processed,
                metrics.failed,
                metrics.panicked,
                metrics.unrouted
            ));
            if metrics.dispatched() > 0 {
                report.push_str(&format!(
                    "    {:.1}% success, avg {:.3}ms",
                    metrics.success_rate(),
                    metrics.avg_processing().as_secs_f64() * 1000.0
                ));
                if let (Some(p50), Some(p99)) = (metrics.processing.p50(), metrics.processing.p99())
                {
                    report.push_str(&format!(
                        ", p50 {:.3}ms, p99 {:.3}ms",
                        p50.as_secs_f64() * 1000.0,
                        p99.as_secs_f64() * 1000.0
                    ));
                }
                report.push('\n');
            }
            if let Some(wait) = metrics.queue_wait.p95() {
                report.push_str(&format!(
                    "    queue wait p95 {:.3}ms\n",
                    wait.as_secs_f64() * 1000.0
                ));
            }
        }

        if self.features.is_empty() {
            report.push_str("  (no messages)\n");
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_counters() {
        let metrics = WorkerMetrics::new();
        metrics.record_enqueued("logs");
        metrics.record_enqueued("logs");
        metrics.record_enqueued("logs");
        metrics.record_processed("logs", Duration::from_millis(2));
        metrics.record_failed("logs", Duration::from_millis(4));
        metrics.record_panicked("logs", Duration::from_millis(6));
        metrics.record_unrouted("session_replay");

        let snapshot = metrics.snapshot();
        let logs = snapshot.feature("logs").unwrap();
        assert_eq!(logs.enqueued, 3);
        assert_eq!(logs.dispatched(), 3);
        assert_eq!(logs.avg_processing(), Duration::from_millis(4));
        assert!(logs.success_rate() > 33.0 && logs.success_rate() < 34.0);
        assert_eq!(snapshot.feature("session_replay").unwrap().unrouted, 1);
    }

    #[test]
    fn test_histogram_percentiles() {
        let mut hist = Histogram::new();
        assert!(hist.p50().is_none());
        for i in 1..=100 {
            hist.record(Duration::from_millis(i));
        }

        let p50 = hist.p50().unwrap().as_millis();
        assert!((49..=51).contains(&p50), "p50 was {p50}, expected ~50");
        assert!(hist.p99().unwrap() >= Duration::from_millis(99));
        assert_eq!(hist.count(), 100);
    }

    #[test]
    fn test_histogram_keeps_recent_samples_only() {
        let mut hist = Histogram::with_capacity(100);
        for i in 0..1000 {
            hist.record(Duration::from_millis(i));
        }

        assert_eq!(hist.count(), 100);
        assert_eq!(hist.recorded(), 1000);
        // Only 900..1000 remain
        assert_eq!(hist.p50().unwrap(), Duration::from_millis(950));
    }

    #[test]
    fn test_worker_metrics_stay_bounded() {
        let metrics = WorkerMetrics::new();
        let total = HISTOGRAM_CAPACITY * 3;
        for _ in 0..total {
            metrics.record_enqueued("telemetry");
            metrics.record_queue_wait("telemetry", Duration::from_micros(5));
            metrics.record_processed("telemetry", Duration::from_micros(10));
        }

        let snapshot = metrics.snapshot();
        let telemetry = snapshot.feature("telemetry").unwrap();
        assert_eq!(telemetry.processed, total as u64);
        assert_eq!(telemetry.queue_wait.count(), HISTOGRAM_CAPACITY);
        assert_eq!(telemetry.processing.count(), HISTOGRAM_CAPACITY);
        assert_eq!(telemetry.processing.recorded(), total as u64);
    }

    #[test]
    fn test_average_with_more_than_u32_messages() {
        let metrics = FeatureMetrics {
            processed: 1 << 32,
            total_processing: Duration::from_secs(1 << 32),
            ..FeatureMetrics::default()
        };
        assert_eq!(metrics.avg_processing(), Duration::from_secs(1));
    }

    #[test]
    fn test_report_and_reset() {
        let metrics = WorkerMetrics::new();
        metrics.record_enqueued("rum");
        metrics.record_processed("rum", Duration::from_micros(300));

        let report = metrics.snapshot().format_report();
        assert!(report.contains("rum: 1 enqueued, 1 processed"));

        metrics.reset();
        assert!(metrics.snapshot().format_report().contains("(no messages)"));
    }
}
