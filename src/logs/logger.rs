//! Application facing logger

use std::sync::Arc;

use serde_json::Value;

use super::{LogEvent, LogLevel, LoggingOptions};
use crate::platform::{Attributes, ErrorInfo, PlatformLogger};
use crate::trace::RateBasedSampler;
use crate::worker::{LogsMessage, ObjectPool, Worker};

/// Queues log calls for one native logger.
///
/// Every method returns immediately; delivery happens on the worker thread.
#[derive(Clone)]
pub struct Logger {
    native: Arc<dyn PlatformLogger>,
    worker: Arc<Worker>,
    pool: ObjectPool<LogEvent>,
    threshold: LogLevel,
    sampler: RateBasedSampler,
}

impl Logger {
    pub fn new(
        native: Arc<dyn PlatformLogger>,
        worker: Arc<Worker>,
        pool: ObjectPool<LogEvent>,
        options: &LoggingOptions,
    ) -> Self {
        Self {
            native,
            worker,
            pool,
            threshold: options.remote_log_threshold,
            sampler: RateBasedSampler::from_percent(options.remote_sample_rate),
        }
    }

    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }

    pub fn debug(&self, message: &str, attributes: Attributes) {
        self.log(LogLevel::Debug, message, attributes, None);
    }

    pub fn info(&self, message: &str, attributes: Attributes) {
        self.log(LogLevel::Info, message, attributes, None);
    }

    pub fn notice(&self, message: &str, attributes: Attributes) {
        self.log(LogLevel::Notice, message, attributes, None);
    }

    pub fn warn(&self, message: &str, attributes: Attributes) {
        self.log(LogLevel::Warn, message, attributes, None);
    }

    pub fn error(&self, message: &str, attributes: Attributes, error: Option<ErrorInfo>) {
        self.log(LogLevel::Error, message, attributes, error);
    }

    pub fn critical(&self, message: &str, attributes: Attributes, error: Option<ErrorInfo>) {
        self.log(LogLevel::Critical, message, attributes, error);
    }

    /// Queue a log event.
    ///
    /// Dropped here, before allocation, when below the remote threshold or
    /// not picked by the remote sample rate.
    pub fn log(
        &self,
        level: LogLevel,
        message: &str,
        attributes: Attributes,
        error: Option<ErrorInfo>,
    ) {
        if level < self.threshold || !self.sampler.sample() {
            return;
        }

        let mut event = self.pool.get();
        event.level = level;
        event.message.push_str(message);
        event.attributes = attributes;
        event.error = error;

        self.worker.add_message(
            LogsMessage::Log {
                logger: Arc::clone(&self.native),
                event,
            }
            .into(),
        );
    }

    /// Add a tag; `value` turns it into `tag:value`.
    pub fn add_tag(&self, tag: &str, value: Option<&str>) {
        self.worker.add_message(
            LogsMessage::AddTag {
                logger: Arc::clone(&self.native),
                tag: tag.to_string(),
                value: value.map(str::to_string),
            }
            .into(),
        );
    }

    pub fn remove_tag(&self, tag: &str) {
        self.worker.add_message(
            LogsMessage::RemoveTag {
                logger: Arc::clone(&self.native),
                tag: tag.to_string(),
            }
            .into(),
        );
    }

    pub fn remove_tags_with_key(&self, key: &str) {
        self.worker.add_message(
            LogsMessage::RemoveTagsWithKey {
                logger: Arc::clone(&self.native),
                key: key.to_string(),
            }
            .into(),
        );
    }

    pub fn add_attribute(&self, key: &str, value: impl Into<Value>) {
        self.worker.add_message(
            LogsMessage::AddAttribute {
                logger: Arc::clone(&self.native),
                key: key.to_string(),
                value: value.into(),
            }
            .into(),
        );
    }

    pub fn remove_attribute(&self, key: &str) {
        self.worker.add_message(
            LogsMessage::RemoveAttribute {
                logger: Arc::clone(&self.native),
                key: key.to_string(),
            }
            .into(),
        );
    }
}
