//! Simulate command implementation
//!
//! Boots the SDK on the console platform and drives log, RUM and resource
//! traffic from several producer threads.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use serde_json::json;

use crate::cli::output::Output;
use crate::core::config::{FirstPartyHostConfig, SdkConfig};
use crate::core::sdk::DatadogSdk;
use crate::platform::console::ConsolePlatform;
use crate::platform::{Attributes, ErrorInfo};
use crate::rum::{RumErrorSource, RumUserActionType};
use crate::trace::TracingHeaderType;
use crate::worker::targets;

/// Configuration used when no file is given
pub fn default_config() -> SdkConfig {
    let mut config = SdkConfig::new("simulated-client-token");
    config.service = Some("rumbridge-simulate".to_string());
    config.rum.enabled = true;
    config.rum.application_id = Some("simulated-application".to_string());
    config.rum.trace_sample_rate = 100.0;
    config.rum.first_party_hosts = vec![FirstPartyHostConfig::new(
        "example.com",
        vec![TracingHeaderType::Datadog, TracingHeaderType::Tracecontext],
    )];
    config
}

fn attributes(producer: usize, index: usize) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert("producer".to_string(), json!(producer));
    attributes.insert("index".to_string(), json!(index));
    attributes
}

/// Send `count` events from one producer thread
fn produce(sdk: &DatadogSdk, producer: usize, count: usize) {
    let tracker = sdk.resource_tracker();
    let view = format!("producer-{producer}");
    sdk.rum().start_view(&view, None, attributes(producer, 0));

    for index in 0..count {
        match index % 5 {
            0 | 1 => sdk
                .logger()
                .info("simulated log", attributes(producer, index)),
            2 => sdk.rum().add_action(
                RumUserActionType::Tap,
                "simulated tap",
                attributes(producer, index),
            ),
            3 => {
                let resource = tracker.begin("https://api.example.com/scores", "GET");
                resource.finish(Some(200), Some("application/json"), Some(512));
            }
            _ => sdk.rum().add_error(
                ErrorInfo::new("simulated error").with_kind("SimulatedError"),
                RumErrorSource::Source,
                attributes(producer, index),
            ),
        }
    }

    sdk.rum().stop_view(&view, Attributes::new());
}

/// Run the simulate command
pub fn run_simulate(
    config_path: Option<&Path>,
    messages: usize,
    producers: usize,
) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => SdkConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => default_config(),
    };
    let producers = producers.max(1);

    let platform = Arc::new(ConsolePlatform::new());
    let sdk = DatadogSdk::init(config, platform.clone())?;

    Output::header(&format!(
        "Simulating {} events from {} producer threads...",
        messages, producers
    ));

    let started = Instant::now();
    std::thread::scope(|scope| {
        for producer in 0..producers {
            let count = messages / producers + usize::from(producer < messages % producers);
            let sdk = &sdk;
            scope.spawn(move || produce(sdk, producer, count));
        }
    });
    let produced_in = started.elapsed();

    sdk.internal_logger()
        .telemetry_debug(format!("simulation produced {messages} events"));
    sdk.shutdown();
    let drained_in = started.elapsed();

    let snapshot = sdk.metrics().snapshot();
    println!();
    print!("{}", snapshot.format_report());
    println!();

    Output::kv("platform calls", &platform.call_count().to_string());
    Output::kv(
        "produced in",
        &format!("{:.2}ms", produced_in.as_secs_f64() * 1000.0),
    );
    Output::kv(
        "drained in",
        &format!("{:.2}ms", drained_in.as_secs_f64() * 1000.0),
    );

    let enqueued = snapshot.total_enqueued();
    let processed = snapshot.total_processed();
    if processed == enqueued {
        Output::success(&format!("All {} messages dispatched", processed));
    } else {
        let telemetry_failures = snapshot
            .feature(targets::TELEMETRY)
            .map(|m| m.failed)
            .unwrap_or_default();
        Output::warning(&format!(
            "{} of {} messages dispatched ({} telemetry failures)",
            processed, enqueued, telemetry_failures
        ));
    }

    Ok(())
}
