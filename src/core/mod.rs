//! SDK configuration and lifecycle

pub mod config;
pub mod sdk;

pub use config::{ConfigError, SdkConfig};
pub use sdk::{DatadogSdk, SdkError};
