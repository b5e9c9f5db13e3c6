//! Shared types for platform calls

use serde::{Deserialize, Serialize};

use super::Attributes;

/// User consent for data collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrackingConsent {
    Granted,
    NotGranted,
    #[default]
    Pending,
}

impl std::fmt::Display for TrackingConsent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackingConsent::Granted => write!(f, "granted"),
            TrackingConsent::NotGranted => write!(f, "not_granted"),
            TrackingConsent::Pending => write!(f, "pending"),
        }
    }
}

/// Error details attached to a log, RUM error or telemetry error
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error type name
    pub kind: Option<String>,
    pub message: String,
    /// Stack trace, if one was captured
    pub stack: Option<String>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Build from any error, walking its `source()` chain into the stack field
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        Self {
            kind: None,
            message: err.to_string(),
            stack: (!chain.is_empty()).then(|| chain.join("\n")),
        }
    }
}

/// Identity of the current user
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserInfo {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub extra_info: Attributes,
}
