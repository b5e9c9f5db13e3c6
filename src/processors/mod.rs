//! Feature processors
//!
//! A processor consumes the messages routed to its feature target on the
//! worker thread and forwards them to the native platform. It owns each
//! message it receives and discards it when finished.

mod logs;
mod rum;
mod sdk;
mod telemetry;

use thiserror::Error;

pub use logs::LogsProcessor;
pub use rum::{RumProcessor, TIMESTAMP_ATTRIBUTE};
pub use sdk::SdkProcessor;
pub use telemetry::{InternalLogger, TelemetryProcessor};

use crate::platform::PlatformError;
use crate::worker::WorkerMessage;

/// Errors returned while processing one message
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("{processor} processor cannot handle {target} messages")]
    UnexpectedMessage {
        processor: &'static str,
        target: &'static str,
    },
}

/// Handles every message for one feature target
pub trait Processor: Send + Sync {
    /// Forward `message` to the platform, then discard it.
    fn process(&self, message: WorkerMessage) -> Result<(), ProcessError>;
}

/// Discard a message routed to the wrong processor and report it.
pub(crate) fn unexpected(processor: &'static str, message: WorkerMessage) -> ProcessError {
    let target = message.feature_target();
    message.discard();
    ProcessError::UnexpectedMessage { processor, target }
}
