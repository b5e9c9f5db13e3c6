//! The SDK context object
//!
//! Owns the work queue, its processors and the front-ends. Create one with
//! [`DatadogSdk::init`]; dropping it (or calling `shutdown`) drains the queue.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use super::config::{ConfigError, SdkConfig};
use crate::logs::{LogEvent, Logger, LoggingOptions};
use crate::observability::WorkerMetrics;
use crate::platform::noop::NoopPlatform;
use crate::platform::{Attributes, Platform, PlatformError, TrackingConsent, UserInfo};
use crate::processors::{
    InternalLogger, LogsProcessor, RumProcessor, SdkProcessor, TelemetryProcessor,
};
use crate::rum::{DateProvider, Rum, SystemDateProvider};
use crate::trace::{ResourceTracker, ResourceTrackingHelper};
use crate::worker::{targets, ObjectPool, SdkMessage, Worker, WorkerError};

/// Errors that can occur while initializing the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
}

/// An initialized SDK instance
pub struct DatadogSdk {
    config: SdkConfig,
    platform: Arc<dyn Platform>,
    worker: Arc<Worker>,
    log_pool: ObjectPool<LogEvent>,
    default_logger: Logger,
    rum: Rum,
    tracking: Arc<ResourceTrackingHelper>,
    internal_logger: InternalLogger,
}

impl DatadogSdk {
    /// Initialize the SDK on `platform` and start the worker thread.
    pub fn init(config: SdkConfig, platform: Arc<dyn Platform>) -> Result<Self, SdkError> {
        Self::init_with_date_provider(config, platform, Arc::new(SystemDateProvider))
    }

    /// Same as [`init`](Self::init) with a custom RUM event clock.
    pub fn init_with_date_provider(
        mut config: SdkConfig,
        platform: Arc<dyn Platform>,
        dates: Arc<dyn DateProvider>,
    ) -> Result<Self, SdkError> {
        config.validate()?;
        config.normalize();

        let platform: Arc<dyn Platform> = if config.enabled {
            platform
        } else {
            info!("SDK disabled in configuration, using no-op platform");
            Arc::new(NoopPlatform)
        };
        platform.init(&config)?;

        let native_rum = if config.rum.enabled {
            platform.rum()?
        } else {
            NoopPlatform.rum()?
        };

        let worker = Arc::new(Worker::new());
        worker.add_processor(targets::LOGS, Arc::new(LogsProcessor::new()));
        worker.add_processor(targets::RUM, Arc::new(RumProcessor::new(native_rum)));
        worker.add_processor(
            targets::TELEMETRY,
            Arc::new(TelemetryProcessor::new(Arc::clone(&platform))),
        );
        worker.add_processor(
            targets::CORE_SDK,
            Arc::new(SdkProcessor::new(Arc::clone(&platform))),
        );

        let log_pool = ObjectPool::new(
            config.worker.pool_default_capacity,
            config.worker.pool_max_size,
        );
        let default_logger = Logger::new(
            platform.create_logger(&config.logging)?,
            Arc::clone(&worker),
            log_pool.clone(),
            &config.logging,
        );
        let rum = Rum::new(Arc::clone(&worker), dates);
        let tracking = Arc::new(ResourceTrackingHelper::from_config(&config.rum));
        let internal_logger = InternalLogger::new(Arc::clone(&worker));

        worker.start()?;
        info!(
            platform = platform.name(),
            site = %config.site,
            rum = config.rum.enabled,
            "SDK initialized"
        );

        Ok(Self {
            config,
            platform,
            worker,
            log_pool,
            default_logger,
            rum,
            tracking,
            internal_logger,
        })
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn platform(&self) -> &Arc<dyn Platform> {
        &self.platform
    }

    pub fn worker(&self) -> &Arc<Worker> {
        &self.worker
    }

    pub fn metrics(&self) -> &Arc<WorkerMetrics> {
        self.worker.metrics()
    }

    /// Logger built from the `logging` section of the configuration
    pub fn logger(&self) -> &Logger {
        &self.default_logger
    }

    /// Pool shared by every logger's events
    pub fn log_pool(&self) -> &ObjectPool<LogEvent> {
        &self.log_pool
    }

    /// Create an additional logger. Log events share one pool.
    pub fn create_logger(&self, options: &LoggingOptions) -> Result<Logger, SdkError> {
        let native = self.platform.create_logger(options)?;
        Ok(Logger::new(
            native,
            Arc::clone(&self.worker),
            self.log_pool.clone(),
            options,
        ))
    }

    pub fn rum(&self) -> &Rum {
        &self.rum
    }

    pub fn tracking_helper(&self) -> &Arc<ResourceTrackingHelper> {
        &self.tracking
    }

    pub fn resource_tracker(&self) -> ResourceTracker {
        ResourceTracker::new(Arc::clone(&self.tracking), self.rum.clone())
    }

    pub fn internal_logger(&self) -> &InternalLogger {
        &self.internal_logger
    }

    pub fn set_user_info(
        &self,
        id: Option<&str>,
        name: Option<&str>,
        email: Option<&str>,
        extra_info: Attributes,
    ) {
        let user = UserInfo {
            id: id.map(str::to_string),
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            extra_info,
        };
        self.worker.add_message(SdkMessage::SetUserInfo(user).into());
    }

    pub fn add_user_extra_info(&self, extra_info: Attributes) {
        self.worker
            .add_message(SdkMessage::AddUserExtraInfo(extra_info).into());
    }

    pub fn set_tracking_consent(&self, consent: TrackingConsent) {
        self.worker
            .add_message(SdkMessage::SetTrackingConsent(consent).into());
    }

    /// Delete all data the native SDK has not uploaded yet
    pub fn clear_all_data(&self) {
        self.worker.add_message(SdkMessage::ClearAllData.into());
    }

    /// Drain the queue and stop the worker thread.
    ///
    /// Loggers and monitors that outlive this call drop their events.
    pub fn shutdown(&self) {
        if !self.worker.is_shut_down() {
            debug!(queue_depth = self.worker.queue_depth(), "SDK shutting down");
            self.worker.shutdown();
        }
    }
}

impl Drop for DatadogSdk {
    fn drop(&mut self) {
        self.shutdown();
    }
}
