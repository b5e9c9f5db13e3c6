//! Logs feature processor

use super::{unexpected, ProcessError, Processor};
use crate::worker::{targets, LogsMessage, WorkerMessage};

/// Forwards logger calls to the native logger carried by each message.
#[derive(Debug, Default)]
pub struct LogsProcessor;

impl LogsProcessor {
    pub fn new() -> Self {
        Self
    }

    fn handle(&self, message: LogsMessage) -> Result<(), ProcessError> {
        match message {
            LogsMessage::Log { logger, event } => {
                let result = logger.log(
                    event.level,
                    &event.message,
                    &event.attributes,
                    event.error.as_ref(),
                );
                event.discard();
                result?;
            }
            LogsMessage::AddTag { logger, tag, value } => {
                logger.add_tag(&tag, value.as_deref())?;
            }
            LogsMessage::RemoveTag { logger, tag } => logger.remove_tag(&tag)?,
            LogsMessage::RemoveTagsWithKey { logger, key } => logger.remove_tags_with_key(&key)?,
            LogsMessage::AddAttribute { logger, key, value } => {
                logger.add_attribute(&key, &value)?;
            }
            LogsMessage::RemoveAttribute { logger, key } => logger.remove_attribute(&key)?,
        }
        Ok(())
    }
}

impl Processor for LogsProcessor {
    fn process(&self, message: WorkerMessage) -> Result<(), ProcessError> {
        match message {
            WorkerMessage::Logs(msg) => self.handle(msg),
            other => Err(unexpected(targets::LOGS, other)),
        }
    }
}
