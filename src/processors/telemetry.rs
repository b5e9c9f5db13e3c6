//! Self-telemetry processor and the SDK's internal logger

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::{unexpected, ProcessError, Processor};
use crate::logs::LogLevel;
use crate::platform::{ErrorInfo, Platform};
use crate::worker::{targets, TelemetryMessage, Worker, WorkerMessage};

/// Sends the SDK's own debug and error reports through the platform.
pub struct TelemetryProcessor {
    platform: Arc<dyn Platform>,
}

impl TelemetryProcessor {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }
}

impl Processor for TelemetryProcessor {
    fn process(&self, message: WorkerMessage) -> Result<(), ProcessError> {
        match message {
            WorkerMessage::Telemetry(TelemetryMessage::Debug { message }) => {
                self.platform.send_debug_telemetry(&message)?;
            }
            WorkerMessage::Telemetry(TelemetryMessage::Error { message, error }) => {
                self.platform.send_error_telemetry(&message, error.as_ref())?;
            }
            other => return Err(unexpected(targets::TELEMETRY, other)),
        }
        Ok(())
    }
}

/// Logger for problems inside the SDK.
///
/// `log` writes local diagnostics; the `telemetry_*` methods queue reports
/// for the backend.
#[derive(Clone)]
pub struct InternalLogger {
    worker: Arc<Worker>,
}

impl InternalLogger {
    pub fn new(worker: Arc<Worker>) -> Self {
        Self { worker }
    }

    /// Write a local diagnostic only.
    pub fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => debug!(target: "rumbridge::internal", "{message}"),
            LogLevel::Info | LogLevel::Notice => info!(target: "rumbridge::internal", "{message}"),
            LogLevel::Warn => warn!(target: "rumbridge::internal", "{message}"),
            LogLevel::Error | LogLevel::Critical => {
                error!(target: "rumbridge::internal", "{message}")
            }
        }
    }

    /// Queue a debug report for the SDK's own telemetry.
    pub fn telemetry_debug(&self, message: impl Into<String>) {
        self.worker.add_message(
            TelemetryMessage::Debug {
                message: message.into(),
            }
            .into(),
        );
    }

    /// Queue an error report for the SDK's own telemetry.
    pub fn telemetry_error(&self, message: impl Into<String>, error: Option<ErrorInfo>) {
        let message = message.into();
        self.log(LogLevel::Warn, &message);
        self.worker
            .add_message(TelemetryMessage::Error { message, error }.into());
    }
}
