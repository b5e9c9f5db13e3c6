//! Application facing RUM monitor

use std::sync::Arc;

use serde_json::Value;

use super::{DateProvider, RumErrorSource, RumHttpMethod, RumResourceType, RumUserActionType};
use crate::platform::{Attributes, ErrorInfo};
use crate::worker::{RumMessage, Worker};

/// Queues RUM events for the RUM processor.
#[derive(Clone)]
pub struct Rum {
    worker: Arc<Worker>,
    dates: Arc<dyn DateProvider>,
}

impl Rum {
    pub fn new(worker: Arc<Worker>, dates: Arc<dyn DateProvider>) -> Self {
        Self { worker, dates }
    }

    fn send(&self, message: RumMessage) {
        self.worker.add_message(message.into());
    }

    pub fn start_view(&self, key: &str, name: Option<&str>, attributes: Attributes) {
        self.send(RumMessage::StartView {
            key: key.to_string(),
            name: name.unwrap_or(key).to_string(),
            attributes,
            timestamp: self.dates.now(),
        });
    }

    pub fn stop_view(&self, key: &str, attributes: Attributes) {
        self.send(RumMessage::StopView {
            key: key.to_string(),
            attributes,
            timestamp: self.dates.now(),
        });
    }

    /// Record an instantaneous action.
    pub fn add_action(&self, action_type: RumUserActionType, name: &str, attributes: Attributes) {
        self.send(RumMessage::AddAction {
            action_type,
            name: name.to_string(),
            attributes,
            timestamp: self.dates.now(),
        });
    }

    pub fn start_action(&self, action_type: RumUserActionType, name: &str, attributes: Attributes) {
        self.send(RumMessage::StartAction {
            action_type,
            name: name.to_string(),
            attributes,
            timestamp: self.dates.now(),
        });
    }

    pub fn stop_action(&self, action_type: RumUserActionType, name: &str, attributes: Attributes) {
        self.send(RumMessage::StopAction {
            action_type,
            name: name.to_string(),
            attributes,
            timestamp: self.dates.now(),
        });
    }

    pub fn add_error(&self, error: ErrorInfo, source: RumErrorSource, attributes: Attributes) {
        self.send(RumMessage::AddError {
            error,
            source,
            attributes,
            timestamp: self.dates.now(),
        });
    }

    /// Attach a global attribute to all future RUM events.
    pub fn add_attribute(&self, key: &str, value: impl Into<Value>) {
        self.send(RumMessage::AddAttribute {
            key: key.to_string(),
            value: value.into(),
        });
    }

    pub fn remove_attribute(&self, key: &str) {
        self.send(RumMessage::RemoveAttribute {
            key: key.to_string(),
        });
    }

    pub fn start_resource(
        &self,
        key: &str,
        method: RumHttpMethod,
        url: &str,
        attributes: Attributes,
    ) {
        self.send(RumMessage::StartResource {
            key: key.to_string(),
            method,
            url: url.to_string(),
            attributes,
            timestamp: self.dates.now(),
        });
    }

    pub fn stop_resource(
        &self,
        key: &str,
        resource_type: RumResourceType,
        status_code: Option<u16>,
        size: Option<u64>,
        attributes: Attributes,
    ) {
        self.send(RumMessage::StopResource {
            key: key.to_string(),
            resource_type,
            status_code,
            size,
            attributes,
            timestamp: self.dates.now(),
        });
    }

    pub fn stop_resource_with_error(
        &self,
        key: &str,
        error_type: &str,
        message: &str,
        attributes: Attributes,
    ) {
        self.send(RumMessage::StopResourceWithError {
            key: key.to_string(),
            error_type: error_type.to_string(),
            message: message.to_string(),
            attributes,
            timestamp: self.dates.now(),
        });
    }

    pub fn add_feature_flag_evaluation(&self, name: &str, value: impl Into<Value>) {
        self.send(RumMessage::AddFeatureFlagEvaluation {
            name: name.to_string(),
            value: value.into(),
        });
    }

    pub fn stop_session(&self) {
        self.send(RumMessage::StopSession);
    }
}
