//! Messages carried by the work queue
//!
//! Every message is built on the producer thread with all of its fields set,
//! moved into the queue, and consumed exactly once by the processor
//! registered for its feature target.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::pool::Pooled;
use crate::logs::LogEvent;
use crate::platform::{Attributes, ErrorInfo, PlatformLogger, TrackingConsent, UserInfo};
use crate::rum::{RumErrorSource, RumHttpMethod, RumResourceType, RumUserActionType};

/// Feature target keys used to route messages to processors.
pub mod targets {
    pub const LOGS: &str = "logs";
    pub const RUM: &str = "rum";
    pub const TELEMETRY: &str = "telemetry";
    pub const CORE_SDK: &str = "core_sdk";
}

/// A unit of work for the background worker.
pub enum WorkerMessage {
    Logs(LogsMessage),
    Rum(RumMessage),
    Telemetry(TelemetryMessage),
    Sdk(SdkMessage),
}

impl WorkerMessage {
    /// Routing key of the processor that handles this message.
    pub fn feature_target(&self) -> &'static str {
        match self {
            WorkerMessage::Logs(_) => targets::LOGS,
            WorkerMessage::Rum(_) => targets::RUM,
            WorkerMessage::Telemetry(_) => targets::TELEMETRY,
            WorkerMessage::Sdk(_) => targets::CORE_SDK,
        }
    }

    /// Short name of the concrete variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkerMessage::Logs(msg) => msg.kind(),
            WorkerMessage::Rum(msg) => msg.kind(),
            WorkerMessage::Telemetry(msg) => msg.kind(),
            WorkerMessage::Sdk(msg) => msg.kind(),
        }
    }

    /// Release the message, returning pooled parts to their pool.
    pub fn discard(self) {
        drop(self);
    }
}

impl std::fmt::Debug for WorkerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.feature_target(), self.kind())
    }
}

impl From<LogsMessage> for WorkerMessage {
    fn from(msg: LogsMessage) -> Self {
        WorkerMessage::Logs(msg)
    }
}

impl From<RumMessage> for WorkerMessage {
    fn from(msg: RumMessage) -> Self {
        WorkerMessage::Rum(msg)
    }
}

impl From<TelemetryMessage> for WorkerMessage {
    fn from(msg: TelemetryMessage) -> Self {
        WorkerMessage::Telemetry(msg)
    }
}

impl From<SdkMessage> for WorkerMessage {
    fn from(msg: SdkMessage) -> Self {
        WorkerMessage::Sdk(msg)
    }
}

/// Calls on a native logger.
pub enum LogsMessage {
    Log {
        logger: Arc<dyn PlatformLogger>,
        event: Pooled<LogEvent>,
    },
    AddTag {
        logger: Arc<dyn PlatformLogger>,
        tag: String,
        value: Option<String>,
    },
    RemoveTag {
        logger: Arc<dyn PlatformLogger>,
        tag: String,
    },
    RemoveTagsWithKey {
        logger: Arc<dyn PlatformLogger>,
        key: String,
    },
    AddAttribute {
        logger: Arc<dyn PlatformLogger>,
        key: String,
        value: Value,
    },
    RemoveAttribute {
        logger: Arc<dyn PlatformLogger>,
        key: String,
    },
}

impl LogsMessage {
    fn kind(&self) -> &'static str {
        match self {
            LogsMessage::Log { .. } => "log",
            LogsMessage::AddTag { .. } => "add_tag",
            LogsMessage::RemoveTag { .. } => "remove_tag",
            LogsMessage::RemoveTagsWithKey { .. } => "remove_tags_with_key",
            LogsMessage::AddAttribute { .. } => "add_attribute",
            LogsMessage::RemoveAttribute { .. } => "remove_attribute",
        }
    }
}

/// Calls on the native RUM monitor.
///
/// `timestamp` is captured when the producer made the call.
#[derive(Debug, Clone, PartialEq)]
pub enum RumMessage {
    StartView {
        key: String,
        name: String,
        attributes: Attributes,
        timestamp: DateTime<Utc>,
    },
    StopView {
        key: String,
        attributes: Attributes,
        timestamp: DateTime<Utc>,
    },
    AddAction {
        action_type: RumUserActionType,
        name: String,
        attributes: Attributes,
        timestamp: DateTime<Utc>,
    },
    StartAction {
        action_type: RumUserActionType,
        name: String,
        attributes: Attributes,
        timestamp: DateTime<Utc>,
    },
    StopAction {
        action_type: RumUserActionType,
        name: String,
        attributes: Attributes,
        timestamp: DateTime<Utc>,
    },
    AddError {
        error: ErrorInfo,
        source: RumErrorSource,
        attributes: Attributes,
        timestamp: DateTime<Utc>,
    },
    AddAttribute {
        key: String,
        value: Value,
    },
    RemoveAttribute {
        key: String,
    },
    StartResource {
        key: String,
        method: RumHttpMethod,
        url: String,
        attributes: Attributes,
        timestamp: DateTime<Utc>,
    },
    StopResource {
        key: String,
        resource_type: RumResourceType,
        status_code: Option<u16>,
        size: Option<u64>,
        attributes: Attributes,
        timestamp: DateTime<Utc>,
    },
    StopResourceWithError {
        key: String,
        error_type: String,
        message: String,
        attributes: Attributes,
        timestamp: DateTime<Utc>,
    },
    AddFeatureFlagEvaluation {
        name: String,
        value: Value,
    },
    StopSession,
}

impl RumMessage {
    fn kind(&self) -> &'static str {
        match self {
            RumMessage::StartView { .. } => "start_view",
            RumMessage::StopView { .. } => "stop_view",
            RumMessage::AddAction { .. } => "add_action",
            RumMessage::StartAction { .. } => "start_action",
            RumMessage::StopAction { .. } => "stop_action",
            RumMessage::AddError { .. } => "add_error",
            RumMessage::AddAttribute { .. } => "add_attribute",
            RumMessage::RemoveAttribute { .. } => "remove_attribute",
            RumMessage::StartResource { .. } => "start_resource",
            RumMessage::StopResource { .. } => "stop_resource",
            RumMessage::StopResourceWithError { .. } => "stop_resource_with_error",
            RumMessage::AddFeatureFlagEvaluation { .. } => "add_feature_flag_evaluation",
            RumMessage::StopSession => "stop_session",
        }
    }
}

/// The SDK's own diagnostics, sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryMessage {
    Debug {
        message: String,
    },
    Error {
        message: String,
        error: Option<ErrorInfo>,
    },
}

impl TelemetryMessage {
    fn kind(&self) -> &'static str {
        match self {
            TelemetryMessage::Debug { .. } => "debug",
            TelemetryMessage::Error { .. } => "error",
        }
    }
}

/// SDK-wide state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum SdkMessage {
    SetUserInfo(UserInfo),
    AddUserExtraInfo(Attributes),
    SetTrackingConsent(TrackingConsent),
    ClearAllData,
}

impl SdkMessage {
    fn kind(&self) -> &'static str {
        match self {
            SdkMessage::SetUserInfo(_) => "set_user_info",
            SdkMessage::AddUserExtraInfo(_) => "add_user_extra_info",
            SdkMessage::SetTrackingConsent(_) => "set_tracking_consent",
            SdkMessage::ClearAllData => "clear_all_data",
        }
    }
}
