//! Native platform collaborator traits
//!
//! The feature processors are written against these traits only. Every call
//! may block on a native bridge and may fail; processors propagate failures
//! to the worker, which reports them.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use super::types::*;
use super::Attributes;
use crate::core::config::SdkConfig;
use crate::logs::{LogLevel, LoggingOptions};
use crate::rum::{RumErrorSource, RumHttpMethod, RumResourceType, RumUserActionType};

/// Errors that can occur during platform calls
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Native bridge call failed: {0}")]
    Bridge(String),

    #[error("Platform not initialized")]
    NotInitialized,

    #[error("Operation not supported on this platform: {0}")]
    Unsupported(&'static str),
}

/// Entry point into a native telemetry SDK
pub trait Platform: Send + Sync {
    /// Human readable platform name, used in diagnostics
    fn name(&self) -> &str;

    /// Initialize the native SDK with the resolved configuration
    fn init(&self, config: &SdkConfig) -> Result<(), PlatformError>;

    /// Create a native logger configured with `options`
    fn create_logger(
        &self,
        options: &LoggingOptions,
    ) -> Result<Arc<dyn PlatformLogger>, PlatformError>;

    /// Handle to the native RUM monitor
    fn rum(&self) -> Result<Arc<dyn PlatformRum>, PlatformError>;

    fn set_tracking_consent(&self, consent: TrackingConsent) -> Result<(), PlatformError>;

    fn set_user_info(&self, user: &UserInfo) -> Result<(), PlatformError>;

    fn add_user_extra_info(&self, extra_info: &Attributes) -> Result<(), PlatformError>;

    /// Send a debug message to the SDK's own telemetry
    fn send_debug_telemetry(&self, message: &str) -> Result<(), PlatformError>;

    /// Send an error to the SDK's own telemetry
    fn send_error_telemetry(
        &self,
        message: &str,
        error: Option<&ErrorInfo>,
    ) -> Result<(), PlatformError>;

    /// Delete all locally stored data not yet uploaded
    fn clear_all_data(&self) -> Result<(), PlatformError> {
        Err(PlatformError::Unsupported("clear_all_data"))
    }
}

/// A native logger instance
pub trait PlatformLogger: Send + Sync {
    fn log(
        &self,
        level: LogLevel,
        message: &str,
        attributes: &Attributes,
        error: Option<&ErrorInfo>,
    ) -> Result<(), PlatformError>;

    fn add_tag(&self, tag: &str, value: Option<&str>) -> Result<(), PlatformError>;

    fn remove_tag(&self, tag: &str) -> Result<(), PlatformError>;

    fn remove_tags_with_key(&self, key: &str) -> Result<(), PlatformError>;

    fn add_attribute(&self, key: &str, value: &Value) -> Result<(), PlatformError>;

    fn remove_attribute(&self, key: &str) -> Result<(), PlatformError>;
}

/// The native RUM monitor
///
/// Attribute maps passed here already carry the producer-side event
/// timestamp where one applies.
pub trait PlatformRum: Send + Sync {
    fn start_view(&self, key: &str, name: &str, attributes: &Attributes)
        -> Result<(), PlatformError>;

    fn stop_view(&self, key: &str, attributes: &Attributes) -> Result<(), PlatformError>;

    fn add_action(
        &self,
        action_type: RumUserActionType,
        name: &str,
        attributes: &Attributes,
    ) -> Result<(), PlatformError>;

    fn start_action(
        &self,
        action_type: RumUserActionType,
        name: &str,
        attributes: &Attributes,
    ) -> Result<(), PlatformError>;

    fn stop_action(
        &self,
        action_type: RumUserActionType,
        name: &str,
        attributes: &Attributes,
    ) -> Result<(), PlatformError>;

    fn add_error(
        &self,
        error: &ErrorInfo,
        source: RumErrorSource,
        attributes: &Attributes,
    ) -> Result<(), PlatformError>;

    fn add_attribute(&self, key: &str, value: &Value) -> Result<(), PlatformError>;

    fn remove_attribute(&self, key: &str) -> Result<(), PlatformError>;

    fn start_resource(
        &self,
        key: &str,
        method: RumHttpMethod,
        url: &str,
        attributes: &Attributes,
    ) -> Result<(), PlatformError>;

    fn stop_resource(
        &self,
        key: &str,
        resource_type: RumResourceType,
        status_code: Option<u16>,
        size: Option<u64>,
        attributes: &Attributes,
    ) -> Result<(), PlatformError>;

    fn stop_resource_with_error(
        &self,
        key: &str,
        error_type: &str,
        message: &str,
        attributes: &Attributes,
    ) -> Result<(), PlatformError>;

    fn add_feature_flag_evaluation(&self, name: &str, value: &Value)
        -> Result<(), PlatformError>;

    fn stop_session(&self) -> Result<(), PlatformError>;
}
