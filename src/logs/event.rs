//! Pooled log payload

use crate::platform::{Attributes, ErrorInfo};
use crate::worker::Poolable;

use super::LogLevel;

/// One log call, recycled through an object pool
#[derive(Debug, Default)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    pub attributes: Attributes,
    pub error: Option<ErrorInfo>,
}

impl Poolable for LogEvent {
    fn reset(&mut self) {
        self.level = LogLevel::default();
        self.message.clear();
        self.attributes.clear();
        self.error = None;
    }
}
