//! Criterion benchmarks for the hot paths
//!
//! Covers id rendering, header injection and producer-side enqueue cost.
//!
//! Run with: cargo bench
//! Results are saved in target/criterion/ for comparison

use std::collections::HashMap;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rumbridge::core::config::{FirstPartyHostConfig, RumConfig};
use rumbridge::logs::{LogEvent, LoggingOptions, Logger};
use rumbridge::platform::noop::NoopPlatform;
use rumbridge::platform::Platform;
use rumbridge::processors::LogsProcessor;
use rumbridge::trace::{
    generate_tracing_headers, IdRepresentation, ResourceTrackingHelper, TraceContextInjection,
    TracingHeaderType, TracingHeaderTypes, TracingId,
};
use rumbridge::worker::{targets, ObjectPool, Worker};
use rumbridge::Attributes;

/// Benchmark rendering ids in each representation
fn bench_id_rendering(c: &mut Criterion) {
    let id = TracingId::create_128_bit();
    let mut group = c.benchmark_group("id_rendering");

    for (name, representation) in [
        ("decimal", IdRepresentation::Decimal),
        ("low_decimal", IdRepresentation::LowDecimal),
        ("hex16", IdRepresentation::Hex16Chars),
        ("hex32", IdRepresentation::Hex32Chars),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| black_box(id).to_string_as(representation))
        });
    }

    group.finish();
}

/// Benchmark generating a context and every header format
fn bench_header_generation(c: &mut Criterion) {
    let rum = RumConfig {
        trace_sample_rate: 100.0,
        first_party_hosts: vec![FirstPartyHostConfig::new(
            "example.com",
            vec![TracingHeaderType::Datadog, TracingHeaderType::Tracecontext],
        )],
        ..RumConfig::default()
    };
    let helper = ResourceTrackingHelper::from_config(&rum);

    c.bench_function("host_matching", |b| {
        b.iter(|| helper.header_types_for_url(black_box("https://api.example.com/v1/scores")))
    });

    c.bench_function("all_headers", |b| {
        b.iter(|| {
            let context = helper.generate_trace_context();
            let mut out = HashMap::with_capacity(16);
            generate_tracing_headers(
                &context,
                TracingHeaderTypes::all(),
                TraceContextInjection::All,
                &mut out,
            );
            out
        })
    });
}

/// Benchmark the producer side of a log call with a running worker
fn bench_enqueue(c: &mut Criterion) {
    let worker = Arc::new(Worker::new());
    worker.add_processor(targets::LOGS, Arc::new(LogsProcessor::new()));
    worker.start().expect("worker starts");

    let options = LoggingOptions::default();
    let native = NoopPlatform
        .create_logger(&options)
        .expect("noop logger");
    let pool: ObjectPool<LogEvent> = ObjectPool::new(10, 10_000);
    let logger = Logger::new(native, Arc::clone(&worker), pool, &options);

    c.bench_function("log_enqueue", |b| {
        b.iter(|| logger.info(black_box("benchmark message"), Attributes::new()))
    });

    worker.stop();
}

criterion_group!(
    benches,
    bench_id_rendering,
    bench_header_generation,
    bench_enqueue,
);

criterion_main!(benches);
