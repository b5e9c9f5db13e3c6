//! rumbridge - telemetry dispatch core for game runtimes
//!
//! Logging and RUM calls made on game threads are packaged as messages and
//! handed to a single background worker, which forwards them to the native
//! platform SDK. Outbound requests to first-party hosts are correlated with
//! backend traces by injecting trace-context headers.

pub mod cli;
pub mod core;
pub mod logs;
pub mod observability;
pub mod platform;
pub mod processors;
pub mod rum;
pub mod trace;
pub mod worker;

pub use crate::core::config::SdkConfig;
pub use crate::core::sdk::DatadogSdk;
pub use crate::platform::Attributes;
