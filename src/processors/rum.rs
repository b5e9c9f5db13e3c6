//! RUM feature processor

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use super::{unexpected, ProcessError, Processor};
use crate::platform::{Attributes, PlatformRum};
use crate::worker::{targets, RumMessage, WorkerMessage};

/// Attribute carrying the producer-side event time, in unix milliseconds
pub const TIMESTAMP_ATTRIBUTE: &str = "_dd.timestamp";

/// Forwards RUM calls to the native monitor.
///
/// Timed events get the time their producer captured injected into their
/// attributes, so delays in the queue do not shift event times.
pub struct RumProcessor {
    rum: Arc<dyn PlatformRum>,
}

impl RumProcessor {
    pub fn new(rum: Arc<dyn PlatformRum>) -> Self {
        Self { rum }
    }

    fn handle(&self, message: RumMessage) -> Result<(), ProcessError> {
        match message {
            RumMessage::StartView {
                key,
                name,
                attributes,
                timestamp,
            } => self
                .rum
                .start_view(&key, &name, &with_timestamp(attributes, timestamp))?,
            RumMessage::StopView {
                key,
                attributes,
                timestamp,
            } => self
                .rum
                .stop_view(&key, &with_timestamp(attributes, timestamp))?,
            RumMessage::AddAction {
                action_type,
                name,
                attributes,
                timestamp,
            } => self.rum.add_action(
                action_type,
                &name,
                &with_timestamp(attributes, timestamp),
            )?,
            RumMessage::StartAction {
                action_type,
                name,
                attributes,
                timestamp,
            } => self.rum.start_action(
                action_type,
                &name,
                &with_timestamp(attributes, timestamp),
            )?,
            RumMessage::StopAction {
                action_type,
                name,
                attributes,
                timestamp,
            } => self.rum.stop_action(
                action_type,
                &name,
                &with_timestamp(attributes, timestamp),
            )?,
            RumMessage::AddError {
                error,
                source,
                attributes,
                timestamp,
            } => self
                .rum
                .add_error(&error, source, &with_timestamp(attributes, timestamp))?,
            RumMessage::AddAttribute { key, value } => self.rum.add_attribute(&key, &value)?,
            RumMessage::RemoveAttribute { key } => self.rum.remove_attribute(&key)?,
            RumMessage::StartResource {
                key,
                method,
                url,
                attributes,
                timestamp,
            } => self.rum.start_resource(
                &key,
                method,
                &url,
                &with_timestamp(attributes, timestamp),
            )?,
            RumMessage::StopResource {
                key,
                resource_type,
                status_code,
                size,
                attributes,
                timestamp,
            } => self.rum.stop_resource(
                &key,
                resource_type,
                status_code,
                size,
                &with_timestamp(attributes, timestamp),
            )?,
            RumMessage::StopResourceWithError {
                key,
                error_type,
                message,
                attributes,
                timestamp,
            } => self.rum.stop_resource_with_error(
                &key,
                &error_type,
                &message,
                &with_timestamp(attributes, timestamp),
            )?,
            RumMessage::AddFeatureFlagEvaluation { name, value } => {
                self.rum.add_feature_flag_evaluation(&name, &value)?
            }
            RumMessage::StopSession => self.rum.stop_session()?,
        }
        Ok(())
    }
}

fn with_timestamp(mut attributes: Attributes, timestamp: DateTime<Utc>) -> Attributes {
    attributes.insert(
        TIMESTAMP_ATTRIBUTE.to_string(),
        json!(timestamp.timestamp_millis()),
    );
    attributes
}

impl Processor for RumProcessor {
    fn process(&self, message: WorkerMessage) -> Result<(), ProcessError> {
        match message {
            WorkerMessage::Rum(msg) => self.handle(msg),
            other => Err(unexpected(targets::RUM, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_overrides_caller_value() {
        let mut attributes = Attributes::new();
        attributes.insert("k".into(), json!("v"));
        attributes.insert(TIMESTAMP_ATTRIBUTE.into(), json!("caller"));
        let time = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();

        let attributes = with_timestamp(attributes, time);
        assert_eq!(attributes["k"], json!("v"));
        assert_eq!(attributes[TIMESTAMP_ATTRIBUTE], json!(1_700_000_000_123i64));
    }
}
