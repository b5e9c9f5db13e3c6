//! SDK-wide processor

use std::sync::Arc;

use super::{unexpected, ProcessError, Processor};
use crate::platform::Platform;
use crate::worker::{targets, SdkMessage, WorkerMessage};

/// Applies user info, consent and data clearing on the platform.
pub struct SdkProcessor {
    platform: Arc<dyn Platform>,
}

impl SdkProcessor {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }
}

impl Processor for SdkProcessor {
    fn process(&self, message: WorkerMessage) -> Result<(), ProcessError> {
        let message = match message {
            WorkerMessage::Sdk(msg) => msg,
            other => return Err(unexpected(targets::CORE_SDK, other)),
        };
        match message {
            SdkMessage::SetUserInfo(user) => self.platform.set_user_info(&user)?,
            SdkMessage::AddUserExtraInfo(extra) => self.platform.add_user_extra_info(&extra)?,
            SdkMessage::SetTrackingConsent(consent) => {
                self.platform.set_tracking_consent(consent)?
            }
            SdkMessage::ClearAllData => self.platform.clear_all_data()?,
        }
        Ok(())
    }
}
