//! Recording fake of the native platform.
//!
//! Every collaborator call is captured as a [`Call`] with its arguments as
//! JSON. Individual methods can be told to fail or panic.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use rumbridge::core::config::SdkConfig;
use rumbridge::logs::{LogLevel, LoggingOptions};
use rumbridge::platform::{
    Attributes, ErrorInfo, Platform, PlatformError, PlatformLogger, PlatformRum, TrackingConsent,
    UserInfo,
};
use rumbridge::rum::{RumErrorSource, RumHttpMethod, RumResourceType, RumUserActionType};

/// One recorded collaborator call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// `platform.*`, `logger.*` or `rum.*`
    pub method: String,
    pub args: Value,
}

#[derive(Debug, Clone, Copy)]
enum Behavior {
    Fail,
    Panic,
}

#[derive(Default)]
struct State {
    calls: Mutex<Vec<Call>>,
    behaviors: Mutex<HashMap<String, Behavior>>,
}

impl State {
    fn record(&self, method: &str, args: Value) -> Result<(), PlatformError> {
        self.calls.lock().unwrap().push(Call {
            method: method.to_string(),
            args,
        });
        let behavior = self.behaviors.lock().unwrap().get(method).copied();
        match behavior {
            Some(Behavior::Fail) => Err(PlatformError::Bridge(format!("{method} failed"))),
            Some(Behavior::Panic) => panic!("{method} panicked"),
            None => Ok(()),
        }
    }
}

/// Recording platform. Clones share the same call log.
#[derive(Clone, Default)]
pub struct MockPlatform {
    state: Arc<State>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `method` return a bridge error.
    pub fn fail(&self, method: &str) {
        self.state
            .behaviors
            .lock()
            .unwrap()
            .insert(method.to_string(), Behavior::Fail);
    }

    /// Make every call to `method` panic.
    pub fn panic_on(&self, method: &str) {
        self.state
            .behaviors
            .lock()
            .unwrap()
            .insert(method.to_string(), Behavior::Panic);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.calls.lock().unwrap().clone()
    }

    /// Calls to `method`, in order.
    pub fn calls_to(&self, method: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    /// Methods called, in order, skipping setup calls.
    pub fn methods(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| c.method)
            .filter(|m| m != "platform.init" && m != "platform.create_logger")
            .collect()
    }

    pub fn clear(&self) {
        self.state.calls.lock().unwrap().clear();
    }
}

fn attrs(attributes: &Attributes) -> Value {
    Value::Object(attributes.clone())
}

fn error_json(error: Option<&ErrorInfo>) -> Value {
    match error {
        Some(e) => json!({ "kind": e.kind, "message": e.message, "stack": e.stack }),
        None => Value::Null,
    }
}

impl Platform for MockPlatform {
    fn name(&self) -> &str {
        "mock"
    }

    fn init(&self, config: &SdkConfig) -> Result<(), PlatformError> {
        self.state.record(
            "platform.init",
            json!({ "client_token": config.client_token, "site": config.site.to_string() }),
        )
    }

    fn create_logger(
        &self,
        options: &LoggingOptions,
    ) -> Result<Arc<dyn PlatformLogger>, PlatformError> {
        let name = options.name.clone().unwrap_or_else(|| "default".into());
        self.state
            .record("platform.create_logger", json!({ "name": name }))?;
        Ok(Arc::new(MockLogger {
            name,
            state: Arc::clone(&self.state),
        }))
    }

    fn rum(&self) -> Result<Arc<dyn PlatformRum>, PlatformError> {
        Ok(Arc::new(MockRum {
            state: Arc::clone(&self.state),
        }))
    }

    fn set_tracking_consent(&self, consent: TrackingConsent) -> Result<(), PlatformError> {
        self.state.record(
            "platform.set_tracking_consent",
            json!({ "consent": consent.to_string() }),
        )
    }

    fn set_user_info(&self, user: &UserInfo) -> Result<(), PlatformError> {
        self.state.record(
            "platform.set_user_info",
            json!({
                "id": user.id,
                "name": user.name,
                "email": user.email,
                "extra_info": attrs(&user.extra_info),
            }),
        )
    }

    fn add_user_extra_info(&self, extra_info: &Attributes) -> Result<(), PlatformError> {
        self.state
            .record("platform.add_user_extra_info", attrs(extra_info))
    }

    fn send_debug_telemetry(&self, message: &str) -> Result<(), PlatformError> {
        self.state
            .record("platform.send_debug_telemetry", json!({ "message": message }))
    }

    fn send_error_telemetry(
        &self,
        message: &str,
        error: Option<&ErrorInfo>,
    ) -> Result<(), PlatformError> {
        self.state.record(
            "platform.send_error_telemetry",
            json!({ "message": message, "error": error_json(error) }),
        )
    }

    fn clear_all_data(&self) -> Result<(), PlatformError> {
        self.state.record("platform.clear_all_data", Value::Null)
    }
}

struct MockLogger {
    name: String,
    state: Arc<State>,
}

impl PlatformLogger for MockLogger {
    fn log(
        &self,
        level: LogLevel,
        message: &str,
        attributes: &Attributes,
        error: Option<&ErrorInfo>,
    ) -> Result<(), PlatformError> {
        self.state.record(
            "logger.log",
            json!({
                "logger": self.name,
                "level": level.to_string(),
                "message": message,
                "attributes": attrs(attributes),
                "error": error_json(error),
            }),
        )
    }

    fn add_tag(&self, tag: &str, value: Option<&str>) -> Result<(), PlatformError> {
        self.state.record(
            "logger.add_tag",
            json!({ "logger": self.name, "tag": tag, "value": value }),
        )
    }

    fn remove_tag(&self, tag: &str) -> Result<(), PlatformError> {
        self.state
            .record("logger.remove_tag", json!({ "logger": self.name, "tag": tag }))
    }

    fn remove_tags_with_key(&self, key: &str) -> Result<(), PlatformError> {
        self.state.record(
            "logger.remove_tags_with_key",
            json!({ "logger": self.name, "key": key }),
        )
    }

    fn add_attribute(&self, key: &str, value: &Value) -> Result<(), PlatformError> {
        self.state.record(
            "logger.add_attribute",
            json!({ "logger": self.name, "key": key, "value": value }),
        )
    }

    fn remove_attribute(&self, key: &str) -> Result<(), PlatformError> {
        self.state.record(
            "logger.remove_attribute",
            json!({ "logger": self.name, "key": key }),
        )
    }
}

struct MockRum {
    state: Arc<State>,
}

impl PlatformRum for MockRum {
    fn start_view(&self, key: &str, name: &str, attributes: &Attributes) -> Result<(), PlatformError> {
        self.state.record(
            "rum.start_view",
            json!({ "key": key, "name": name, "attributes": attrs(attributes) }),
        )
    }

    fn stop_view(&self, key: &str, attributes: &Attributes) -> Result<(), PlatformError> {
        self.state.record(
            "rum.stop_view",
            json!({ "key": key, "attributes": attrs(attributes) }),
        )
    }

    fn add_action(
        &self,
        action_type: RumUserActionType,
        name: &str,
        attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        self.state.record(
            "rum.add_action",
            json!({ "type": action_type, "name": name, "attributes": attrs(attributes) }),
        )
    }

    fn start_action(
        &self,
        action_type: RumUserActionType,
        name: &str,
        attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        self.state.record(
            "rum.start_action",
            json!({ "type": action_type, "name": name, "attributes": attrs(attributes) }),
        )
    }

    fn stop_action(
        &self,
        action_type: RumUserActionType,
        name: &str,
        attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        self.state.record(
            "rum.stop_action",
            json!({ "type": action_type, "name": name, "attributes": attrs(attributes) }),
        )
    }

    fn add_error(
        &self,
        error: &ErrorInfo,
        source: RumErrorSource,
        attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        self.state.record(
            "rum.add_error",
            json!({
                "error": error_json(Some(error)),
                "source": source,
                "attributes": attrs(attributes),
            }),
        )
    }

    fn add_attribute(&self, key: &str, value: &Value) -> Result<(), PlatformError> {
        self.state
            .record("rum.add_attribute", json!({ "key": key, "value": value }))
    }

    fn remove_attribute(&self, key: &str) -> Result<(), PlatformError> {
        self.state
            .record("rum.remove_attribute", json!({ "key": key }))
    }

    fn start_resource(
        &self,
        key: &str,
        method: RumHttpMethod,
        url: &str,
        attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        self.state.record(
            "rum.start_resource",
            json!({
                "key": key,
                "method": method,
                "url": url,
                "attributes": attrs(attributes),
            }),
        )
    }

    fn stop_resource(
        &self,
        key: &str,
        resource_type: RumResourceType,
        status_code: Option<u16>,
        size: Option<u64>,
        attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        self.state.record(
            "rum.stop_resource",
            json!({
                "key": key,
                "type": resource_type,
                "status_code": status_code,
                "size": size,
                "attributes": attrs(attributes),
            }),
        )
    }

    fn stop_resource_with_error(
        &self,
        key: &str,
        error_type: &str,
        message: &str,
        attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        self.state.record(
            "rum.stop_resource_with_error",
            json!({
                "key": key,
                "error_type": error_type,
                "message": message,
                "attributes": attrs(attributes),
            }),
        )
    }

    fn add_feature_flag_evaluation(&self, name: &str, value: &Value) -> Result<(), PlatformError> {
        self.state.record(
            "rum.add_feature_flag_evaluation",
            json!({ "name": name, "value": value }),
        )
    }

    fn stop_session(&self) -> Result<(), PlatformError> {
        self.state.record("rum.stop_session", Value::Null)
    }
}
