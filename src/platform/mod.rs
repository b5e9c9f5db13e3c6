//! Native platform collaborators
//!
//! Real deployments bridge into a per-OS telemetry SDK. This crate ships a
//! no-op platform (used when the SDK is disabled) and a console platform
//! that reports every call through `tracing`.

pub mod console;
pub mod noop;
pub mod traits;
pub mod types;

pub use traits::{Platform, PlatformError, PlatformLogger, PlatformRum};
pub use types::{ErrorInfo, TrackingConsent, UserInfo};

/// Dynamically typed attribute map passed through to the platform
pub type Attributes = serde_json::Map<String, serde_json::Value>;
