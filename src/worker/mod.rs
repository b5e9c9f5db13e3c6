//! Asynchronous dispatch of SDK calls
//!
//! - [`message`]: the closed set of messages and their routing keys
//! - [`pool`]: bounded object pools for high frequency message parts
//! - [`queue`]: the single-consumer work queue

pub mod message;
pub mod pool;
mod queue;

pub use message::{
    targets, LogsMessage, RumMessage, SdkMessage, TelemetryMessage, WorkerMessage,
};
pub use pool::{ObjectPool, Poolable, Pooled};
pub use queue::{Worker, WorkerError};
