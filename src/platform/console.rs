//! Platform that reports every call through `tracing`
//!
//! Used by the developer harness to watch what the processors would send to
//! a native SDK.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use super::{Attributes, ErrorInfo, Platform, PlatformError, PlatformLogger, PlatformRum};
use super::{TrackingConsent, UserInfo};
use crate::core::config::SdkConfig;
use crate::logs::{LogLevel, LoggingOptions};
use crate::rum::{RumErrorSource, RumHttpMethod, RumResourceType, RumUserActionType};

const TARGET: &str = "rumbridge::platform";

/// Call counter shared between the platform and the handles it creates
#[derive(Debug, Default)]
struct CallCounter(AtomicU64);

impl CallCounter {
    fn bump(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

/// Console-backed platform
#[derive(Debug, Default)]
pub struct ConsolePlatform {
    calls: Arc<CallCounter>,
}

impl ConsolePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of collaborator calls made so far, across loggers and RUM
    pub fn call_count(&self) -> u64 {
        self.calls.0.load(Ordering::Relaxed)
    }
}

impl Platform for ConsolePlatform {
    fn name(&self) -> &str {
        "console"
    }

    fn init(&self, config: &SdkConfig) -> Result<(), PlatformError> {
        self.calls.bump();
        info!(
            target: TARGET,
            site = %config.site,
            env = config.env.as_deref().unwrap_or("-"),
            service = config.service.as_deref().unwrap_or("-"),
            "init"
        );
        Ok(())
    }

    fn create_logger(
        &self,
        options: &LoggingOptions,
    ) -> Result<Arc<dyn PlatformLogger>, PlatformError> {
        self.calls.bump();
        let name = options.name.clone().unwrap_or_else(|| "default".to_string());
        debug!(target: TARGET, logger = %name, "create_logger");
        Ok(Arc::new(ConsoleLogger {
            name,
            calls: Arc::clone(&self.calls),
        }))
    }

    fn rum(&self) -> Result<Arc<dyn PlatformRum>, PlatformError> {
        Ok(Arc::new(ConsoleRum {
            calls: Arc::clone(&self.calls),
        }))
    }

    fn set_tracking_consent(&self, consent: TrackingConsent) -> Result<(), PlatformError> {
        self.calls.bump();
        info!(target: TARGET, %consent, "set_tracking_consent");
        Ok(())
    }

    fn set_user_info(&self, user: &UserInfo) -> Result<(), PlatformError> {
        self.calls.bump();
        info!(
            target: TARGET,
            id = user.id.as_deref().unwrap_or("-"),
            extra = user.extra_info.len(),
            "set_user_info"
        );
        Ok(())
    }

    fn add_user_extra_info(&self, extra_info: &Attributes) -> Result<(), PlatformError> {
        self.calls.bump();
        let extra = Value::Object(extra_info.clone());
        info!(target: TARGET, %extra, "add_user_extra_info");
        Ok(())
    }

    fn send_debug_telemetry(&self, message: &str) -> Result<(), PlatformError> {
        self.calls.bump();
        debug!(target: TARGET, text = message, "telemetry.debug");
        Ok(())
    }

    fn send_error_telemetry(
        &self,
        message: &str,
        error: Option<&ErrorInfo>,
    ) -> Result<(), PlatformError> {
        self.calls.bump();
        info!(
            target: TARGET,
            text = message,
            kind = error.and_then(|e| e.kind.as_deref()).unwrap_or("-"),
            "telemetry.error"
        );
        Ok(())
    }

    fn clear_all_data(&self) -> Result<(), PlatformError> {
        self.calls.bump();
        info!(target: TARGET, "clear_all_data");
        Ok(())
    }
}

struct ConsoleLogger {
    name: String,
    calls: Arc<CallCounter>,
}

impl PlatformLogger for ConsoleLogger {
    fn log(
        &self,
        level: LogLevel,
        message: &str,
        attributes: &Attributes,
        error: Option<&ErrorInfo>,
    ) -> Result<(), PlatformError> {
        self.calls.bump();
        let attributes = Value::Object(attributes.clone());
        info!(
            target: TARGET,
            logger = %self.name,
            %level,
            %attributes,
            error = error.map(|e| e.message.as_str()).unwrap_or("-"),
            "{message}"
        );
        Ok(())
    }

    fn add_tag(&self, tag: &str, value: Option<&str>) -> Result<(), PlatformError> {
        self.calls.bump();
        debug!(target: TARGET, logger = %self.name, tag, value, "add_tag");
        Ok(())
    }

    fn remove_tag(&self, tag: &str) -> Result<(), PlatformError> {
        self.calls.bump();
        debug!(target: TARGET, logger = %self.name, tag, "remove_tag");
        Ok(())
    }

    fn remove_tags_with_key(&self, key: &str) -> Result<(), PlatformError> {
        self.calls.bump();
        debug!(target: TARGET, logger = %self.name, key, "remove_tags_with_key");
        Ok(())
    }

    fn add_attribute(&self, key: &str, value: &Value) -> Result<(), PlatformError> {
        self.calls.bump();
        debug!(target: TARGET, logger = %self.name, key, %value, "add_attribute");
        Ok(())
    }

    fn remove_attribute(&self, key: &str) -> Result<(), PlatformError> {
        self.calls.bump();
        debug!(target: TARGET, logger = %self.name, key, "remove_attribute");
        Ok(())
    }
}

struct ConsoleRum {
    calls: Arc<CallCounter>,
}

impl ConsoleRum {
    fn event(&self, name: &str, key: &str, attributes: &Attributes) {
        self.calls.bump();
        let attributes = Value::Object(attributes.clone());
        info!(
            target: TARGET,
            key,
            %attributes,
            "rum.{name}"
        );
    }
}

impl PlatformRum for ConsoleRum {
    fn start_view(&self, key: &str, name: &str, attributes: &Attributes) -> Result<(), PlatformError> {
        self.event("start_view", &format!("{key} ({name})"), attributes);
        Ok(())
    }

    fn stop_view(&self, key: &str, attributes: &Attributes) -> Result<(), PlatformError> {
        self.event("stop_view", key, attributes);
        Ok(())
    }

    fn add_action(
        &self,
        action_type: RumUserActionType,
        name: &str,
        attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        self.event("add_action", &format!("{action_type:?}:{name}"), attributes);
        Ok(())
    }

    fn start_action(
        &self,
        action_type: RumUserActionType,
        name: &str,
        attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        self.event("start_action", &format!("{action_type:?}:{name}"), attributes);
        Ok(())
    }

    fn stop_action(
        &self,
        action_type: RumUserActionType,
        name: &str,
        attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        self.event("stop_action", &format!("{action_type:?}:{name}"), attributes);
        Ok(())
    }

    fn add_error(
        &self,
        error: &ErrorInfo,
        source: RumErrorSource,
        attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        self.event("add_error", &format!("{source:?}:{}", error.message), attributes);
        Ok(())
    }

    fn add_attribute(&self, key: &str, value: &Value) -> Result<(), PlatformError> {
        self.calls.bump();
        debug!(target: TARGET, key, %value, "rum.add_attribute");
        Ok(())
    }

    fn remove_attribute(&self, key: &str) -> Result<(), PlatformError> {
        self.calls.bump();
        debug!(target: TARGET, key, "rum.remove_attribute");
        Ok(())
    }

    fn start_resource(
        &self,
        key: &str,
        method: RumHttpMethod,
        url: &str,
        attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        self.event("start_resource", &format!("{key} {method} {url}"), attributes);
        Ok(())
    }

    fn stop_resource(
        &self,
        key: &str,
        resource_type: RumResourceType,
        status_code: Option<u16>,
        size: Option<u64>,
        attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        let status = status_code.map(|s| s.to_string()).unwrap_or_else(|| "-".into());
        let size = size.map(|s| s.to_string()).unwrap_or_else(|| "-".into());
        self.event(
            "stop_resource",
            &format!("{key} {resource_type} status={status} size={size}"),
            attributes,
        );
        Ok(())
    }

    fn stop_resource_with_error(
        &self,
        key: &str,
        error_type: &str,
        message: &str,
        attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        self.event(
            "stop_resource_with_error",
            &format!("{key} {error_type}: {message}"),
            attributes,
        );
        Ok(())
    }

    fn add_feature_flag_evaluation(&self, name: &str, value: &Value) -> Result<(), PlatformError> {
        self.calls.bump();
        debug!(target: TARGET, name, %value, "rum.add_feature_flag_evaluation");
        Ok(())
    }

    fn stop_session(&self) -> Result<(), PlatformError> {
        self.calls.bump();
        info!(target: TARGET, "rum.stop_session");
        Ok(())
    }
}
