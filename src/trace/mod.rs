//! Distributed trace correlation for outbound requests
//!
//! - [`id`]: 128-bit tracing identifiers and their text encodings
//! - [`sampler`]: rate based sampling decisions
//! - [`context`]: trace context and header format flags
//! - [`tracking`]: host matching and header/attribute generation
//! - [`resource`]: tracked request lifecycle on top of RUM resources

pub mod context;
pub mod id;
pub mod resource;
pub mod sampler;
pub mod tracking;

pub use context::{TraceContext, TraceContextInjection, TracingHeaderType, TracingHeaderTypes};
pub use id::{IdRepresentation, TracingId};
pub use resource::{ResourceTracker, TrackedResource};
pub use sampler::RateBasedSampler;
pub use tracking::{generate_tracing_headers, FirstPartyHost, ResourceTrackingHelper};
