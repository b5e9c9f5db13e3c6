//! Configuration builders and SDK setup shared by the integration tests

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use rumbridge::core::config::{FirstPartyHostConfig, SdkConfig};
use rumbridge::rum::FixedDateProvider;
use rumbridge::trace::TracingHeaderType;
use rumbridge::{Attributes, DatadogSdk};

use super::mock_platform::MockPlatform;

/// Unix milliseconds of the fixed test clock's start
pub const START_MILLIS: i64 = 1_700_000_000_000;

/// Enabled configuration with RUM on and one first party host
pub fn rum_config() -> SdkConfig {
    let mut config = SdkConfig::new("pub-test-token");
    config.env = Some("test".to_string());
    config.rum.enabled = true;
    config.rum.application_id = Some("test-application".to_string());
    config.rum.trace_sample_rate = 100.0;
    config.rum.first_party_hosts = vec![FirstPartyHostConfig::new(
        "example.com",
        vec![TracingHeaderType::Datadog, TracingHeaderType::Tracecontext],
    )];
    config
}

pub fn start_time() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(START_MILLIS)
        .single()
        .expect("valid start time")
}

pub fn fixed_clock() -> Arc<FixedDateProvider> {
    Arc::new(FixedDateProvider::new(start_time()))
}

/// Initialized SDK on a fresh mock platform, plus the platform and clock
pub struct TestSdk {
    pub sdk: DatadogSdk,
    pub platform: MockPlatform,
    pub clock: Arc<FixedDateProvider>,
}

impl TestSdk {
    pub fn new(config: SdkConfig) -> Self {
        let platform = MockPlatform::new();
        Self::with_platform(config, platform)
    }

    pub fn with_platform(config: SdkConfig, platform: MockPlatform) -> Self {
        let clock = fixed_clock();
        let sdk = DatadogSdk::init_with_date_provider(
            config,
            Arc::new(platform.clone()),
            clock.clone(),
        )
        .expect("SDK initializes");
        Self {
            sdk,
            platform,
            clock,
        }
    }

    /// Drain the queue so every call has reached the platform.
    pub fn drain(&self) {
        self.sdk.shutdown();
    }
}

/// Build attributes from key/value pairs
pub fn attrs(pairs: &[(&str, Value)]) -> Attributes {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
