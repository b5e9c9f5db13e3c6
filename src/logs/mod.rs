//! Logs front-end
//!
//! [`Logger`] is what the application holds. Its calls are filtered and
//! sampled on the calling thread, then queued for the logs processor.

mod event;
mod level;
mod logger;
mod options;

pub use event::LogEvent;
pub use level::LogLevel;
pub use logger::Logger;
pub use options::LoggingOptions;
