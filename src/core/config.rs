//! SDK configuration
//!
//! The configuration file (`rumbridge.yaml`) mirrors the options exposed by
//! the native SDKs. Structural problems are validation errors; out of range
//! sample rates are clamped with a warning.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::logs::LoggingOptions;
use crate::platform::TrackingConsent;
use crate::trace::{TraceContextInjection, TracingHeaderType, TracingHeaderTypes};

/// Errors that can occur when loading or validating a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Datadog site receiving the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DatadogSite {
    #[default]
    Us1,
    Us3,
    Us5,
    Eu1,
    Us1Fed,
    Ap1,
}

impl DatadogSite {
    /// Root domain of the site's intake
    pub fn domain(&self) -> &'static str {
        match self {
            DatadogSite::Us1 => "datadoghq.com",
            DatadogSite::Us3 => "us3.datadoghq.com",
            DatadogSite::Us5 => "us5.datadoghq.com",
            DatadogSite::Eu1 => "datadoghq.eu",
            DatadogSite::Us1Fed => "ddog-gov.com",
            DatadogSite::Ap1 => "ap1.datadoghq.com",
        }
    }
}

impl std::fmt::Display for DatadogSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatadogSite::Us1 => write!(f, "us1"),
            DatadogSite::Us3 => write!(f, "us3"),
            DatadogSite::Us5 => write!(f, "us5"),
            DatadogSite::Eu1 => write!(f, "eu1"),
            DatadogSite::Us1Fed => write!(f, "us1_fed"),
            DatadogSite::Ap1 => write!(f, "ap1"),
        }
    }
}

/// Upload batch size hint for the native SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BatchSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// Upload frequency hint for the native SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UploadFrequency {
    Frequent,
    #[default]
    Average,
    Rare,
}

/// A first party host and the header formats injected for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstPartyHostConfig {
    /// Host name; subdomains match too
    pub host: String,
    #[serde(default = "default_header_types")]
    pub headers: Vec<TracingHeaderType>,
}

impl FirstPartyHostConfig {
    pub fn new(host: impl Into<String>, headers: Vec<TracingHeaderType>) -> Self {
        Self {
            host: host.into(),
            headers,
        }
    }

    pub fn header_types(&self) -> TracingHeaderTypes {
        self.headers.iter().copied().collect()
    }
}

fn default_header_types() -> Vec<TracingHeaderType> {
    vec![TracingHeaderType::Datadog, TracingHeaderType::Tracecontext]
}

/// RUM feature configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RumConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Required when RUM is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    /// Percentage of sessions tracked
    #[serde(default = "default_hundred")]
    pub session_sample_rate: f64,
    /// Percentage of tracked requests that carry sampled traces
    #[serde(default = "default_twenty")]
    pub trace_sample_rate: f64,
    #[serde(default)]
    pub trace_context_injection: TraceContextInjection,
    #[serde(default)]
    pub first_party_hosts: Vec<FirstPartyHostConfig>,
}

impl Default for RumConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            application_id: None,
            session_sample_rate: default_hundred(),
            trace_sample_rate: default_twenty(),
            trace_context_injection: TraceContextInjection::default(),
            first_party_hosts: Vec::new(),
        }
    }
}

/// Work queue and message pool settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    #[serde(default = "default_pool_capacity")]
    pub pool_default_capacity: usize,
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            pool_default_capacity: default_pool_capacity(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

fn default_pool_capacity() -> usize {
    10
}

fn default_pool_max_size() -> usize {
    10_000
}

fn default_true() -> bool {
    true
}

fn default_hundred() -> f64 {
    100.0
}

fn default_twenty() -> f64 {
    20.0
}

/// Top level SDK configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdkConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub client_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default)]
    pub site: DatadogSite,
    /// Overrides the site intake, mostly for proxies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_endpoint: Option<String>,
    #[serde(default)]
    pub batch_size: BatchSize,
    #[serde(default)]
    pub upload_frequency: UploadFrequency,
    #[serde(default)]
    pub tracking_consent: TrackingConsent,
    /// Percentage of the SDK's own telemetry that is sent
    #[serde(default = "default_twenty")]
    pub telemetry_sample_rate: f64,
    #[serde(default)]
    pub rum: RumConfig,
    #[serde(default)]
    pub logging: LoggingOptions,
    #[serde(default)]
    pub worker: WorkerConfig,
}

impl SdkConfig {
    /// Minimal enabled configuration for `client_token`
    pub fn new(client_token: impl Into<String>) -> Self {
        Self {
            enabled: true,
            client_token: client_token.into(),
            env: None,
            service: None,
            site: DatadogSite::default(),
            custom_endpoint: None,
            batch_size: BatchSize::default(),
            upload_frequency: UploadFrequency::default(),
            tracking_consent: TrackingConsent::default(),
            telemetry_sample_rate: default_twenty(),
            rum: RumConfig::default(),
            logging: LoggingOptions::default(),
            worker: WorkerConfig::default(),
        }
    }

    /// Load a configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a configuration from a YAML string
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: SdkConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        config.normalize();
        Ok(config)
    }

    /// Validate structural requirements
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "client_token must not be empty".to_string(),
            ));
        }

        if let Some(ref endpoint) = self.custom_endpoint {
            if let Err(e) = Url::parse(endpoint) {
                return Err(ConfigError::Validation(format!(
                    "custom_endpoint '{}' is not a valid URL: {}",
                    endpoint, e
                )));
            }
        }

        if self.rum.enabled
            && self
                .rum
                .application_id
                .as_deref()
                .map_or(true, |id| id.trim().is_empty())
        {
            return Err(ConfigError::Validation(
                "rum.application_id is required when RUM is enabled".to_string(),
            ));
        }

        if self.worker.pool_max_size == 0 {
            return Err(ConfigError::Validation(
                "worker.pool_max_size must be greater than zero".to_string(),
            ));
        }

        if self.worker.pool_default_capacity > self.worker.pool_max_size {
            return Err(ConfigError::Validation(format!(
                "worker.pool_default_capacity ({}) exceeds worker.pool_max_size ({})",
                self.worker.pool_default_capacity, self.worker.pool_max_size
            )));
        }

        Ok(())
    }

    /// Clamp every percentage into `[0, 100]`, warning about each change.
    ///
    /// Returns the number of values that were adjusted.
    pub fn normalize(&mut self) -> usize {
        let mut adjusted = 0;
        for (name, rate) in [
            ("telemetry_sample_rate", &mut self.telemetry_sample_rate),
            ("rum.session_sample_rate", &mut self.rum.session_sample_rate),
            ("rum.trace_sample_rate", &mut self.rum.trace_sample_rate),
            ("logging.remote_sample_rate", &mut self.logging.remote_sample_rate),
        ] {
            let clamped = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 100.0) };
            if clamped != *rate {
                warn!(setting = name, value = *rate, clamped, "Sample rate out of range");
                *rate = clamped;
                adjusted += 1;
            }
        }

        for host in &self.rum.first_party_hosts {
            if host.host.trim().is_empty() {
                warn!("Empty first party host will be ignored");
            } else if host.headers.is_empty() {
                warn!(host = %host.host, "First party host has no header types");
            }
        }

        adjusted
    }
}
