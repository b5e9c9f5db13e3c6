//! Per-logger options

use serde::{Deserialize, Serialize};

use super::LogLevel;

/// Options for creating a logger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingOptions {
    /// Service name, defaults to the SDK service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Logger name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Attach network state to each log
    #[serde(default)]
    pub network_info_enabled: bool,
    /// Link logs to the active RUM session
    #[serde(default = "default_true")]
    pub bundle_with_rum: bool,
    /// Percentage of logs sent
    #[serde(default = "default_sample_rate")]
    pub remote_sample_rate: f64,
    /// Logs below this level are not sent
    #[serde(default)]
    pub remote_log_threshold: LogLevel,
}

fn default_true() -> bool {
    true
}

fn default_sample_rate() -> f64 {
    100.0
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            service: None,
            name: None,
            network_info_enabled: false,
            bundle_with_rum: true,
            remote_sample_rate: default_sample_rate(),
            remote_log_threshold: LogLevel::default(),
        }
    }
}
