//! Platform that accepts and discards every call

use std::sync::Arc;

use serde_json::Value;

use super::{Attributes, ErrorInfo, Platform, PlatformError, PlatformLogger, PlatformRum};
use super::{TrackingConsent, UserInfo};
use crate::core::config::SdkConfig;
use crate::logs::{LogLevel, LoggingOptions};
use crate::rum::{RumErrorSource, RumHttpMethod, RumResourceType, RumUserActionType};

/// Used when the SDK is disabled in configuration
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPlatform;

#[derive(Debug, Default, Clone, Copy)]
struct NoopLogger;

#[derive(Debug, Default, Clone, Copy)]
struct NoopRum;

impl Platform for NoopPlatform {
    fn name(&self) -> &str {
        "noop"
    }

    fn init(&self, _config: &SdkConfig) -> Result<(), PlatformError> {
        Ok(())
    }

    fn create_logger(
        &self,
        _options: &LoggingOptions,
    ) -> Result<Arc<dyn PlatformLogger>, PlatformError> {
        Ok(Arc::new(NoopLogger))
    }

    fn rum(&self) -> Result<Arc<dyn PlatformRum>, PlatformError> {
        Ok(Arc::new(NoopRum))
    }

    fn set_tracking_consent(&self, _consent: TrackingConsent) -> Result<(), PlatformError> {
        Ok(())
    }

    fn set_user_info(&self, _user: &UserInfo) -> Result<(), PlatformError> {
        Ok(())
    }

    fn add_user_extra_info(&self, _extra_info: &Attributes) -> Result<(), PlatformError> {
        Ok(())
    }

    fn send_debug_telemetry(&self, _message: &str) -> Result<(), PlatformError> {
        Ok(())
    }

    fn send_error_telemetry(
        &self,
        _message: &str,
        _error: Option<&ErrorInfo>,
    ) -> Result<(), PlatformError> {
        Ok(())
    }

    fn clear_all_data(&self) -> Result<(), PlatformError> {
        Ok(())
    }
}

impl PlatformLogger for NoopLogger {
    fn log(
        &self,
        _level: LogLevel,
        _message: &str,
        _attributes: &Attributes,
        _error: Option<&ErrorInfo>,
    ) -> Result<(), PlatformError> {
        Ok(())
    }

    fn add_tag(&self, _tag: &str, _value: Option<&str>) -> Result<(), PlatformError> {
        Ok(())
    }

    fn remove_tag(&self, _tag: &str) -> Result<(), PlatformError> {
        Ok(())
    }

    fn remove_tags_with_key(&self, _key: &str) -> Result<(), PlatformError> {
        Ok(())
    }

    fn add_attribute(&self, _key: &str, _value: &Value) -> Result<(), PlatformError> {
        Ok(())
    }

    fn remove_attribute(&self, _key: &str) -> Result<(), PlatformError> {
        Ok(())
    }
}

impl PlatformRum for NoopRum {
    fn start_view(
        &self,
        _key: &str,
        _name: &str,
        _attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        Ok(())
    }

    fn stop_view(&self, _key: &str, _attributes: &Attributes) -> Result<(), PlatformError> {
        Ok(())
    }

    fn add_action(
        &self,
        _action_type: RumUserActionType,
        _name: &str,
        _attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        Ok(())
    }

    fn start_action(
        &self,
        _action_type: RumUserActionType,
        _name: &str,
        _attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        Ok(())
    }

    fn stop_action(
        &self,
        _action_type: RumUserActionType,
        _name: &str,
        _attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        Ok(())
    }

    fn add_error(
        &self,
        _error: &ErrorInfo,
        _source: RumErrorSource,
        _attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        Ok(())
    }

    fn add_attribute(&self, _key: &str, _value: &Value) -> Result<(), PlatformError> {
        Ok(())
    }

    fn remove_attribute(&self, _key: &str) -> Result<(), PlatformError> {
        Ok(())
    }

    fn start_resource(
        &self,
        _key: &str,
        _method: RumHttpMethod,
        _url: &str,
        _attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        Ok(())
    }

    fn stop_resource(
        &self,
        _key: &str,
        _resource_type: RumResourceType,
        _status_code: Option<u16>,
        _size: Option<u64>,
        _attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        Ok(())
    }

    fn stop_resource_with_error(
        &self,
        _key: &str,
        _error_type: &str,
        _message: &str,
        _attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        Ok(())
    }

    fn add_feature_flag_evaluation(
        &self,
        _name: &str,
        _value: &Value,
    ) -> Result<(), PlatformError> {
        Ok(())
    }

    fn stop_session(&self) -> Result<(), PlatformError> {
        Ok(())
    }
}
