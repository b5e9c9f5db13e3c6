//! RUM front-end
//!
//! [`Rum`] queues view, action, error and resource events for the RUM
//! processor. Event times are taken from a [`DateProvider`] when the call
//! is made.

mod date;
mod monitor;
mod types;

pub use date::{DateProvider, FixedDateProvider, SystemDateProvider};
pub use monitor::Rum;
pub use types::{RumErrorSource, RumHttpMethod, RumResourceType, RumUserActionType};
