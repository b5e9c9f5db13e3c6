//! Trace context and the header formats it can be rendered into

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::id::TracingId;

bitflags! {
    /// Set of tracing header formats to inject into a request.
    ///
    /// Formats are independent; several can be present on the same request.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TracingHeaderTypes: u8 {
        /// `x-datadog-*` headers
        const DATADOG = 1;
        /// Single `b3` header
        const B3 = 1 << 1;
        /// `X-B3-*` headers
        const B3_MULTI = 1 << 2;
        /// W3C `traceparent` / `tracestate`
        const TRACE_CONTEXT = 1 << 3;
    }
}

/// A single header format as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracingHeaderType {
    Datadog,
    B3,
    B3multi,
    Tracecontext,
}

impl From<TracingHeaderType> for TracingHeaderTypes {
    fn from(value: TracingHeaderType) -> Self {
        match value {
            TracingHeaderType::Datadog => TracingHeaderTypes::DATADOG,
            TracingHeaderType::B3 => TracingHeaderTypes::B3,
            TracingHeaderType::B3multi => TracingHeaderTypes::B3_MULTI,
            TracingHeaderType::Tracecontext => TracingHeaderTypes::TRACE_CONTEXT,
        }
    }
}

impl FromIterator<TracingHeaderType> for TracingHeaderTypes {
    fn from_iter<I: IntoIterator<Item = TracingHeaderType>>(iter: I) -> Self {
        iter.into_iter()
            .fold(TracingHeaderTypes::empty(), |acc, t| acc | t.into())
    }
}

impl std::str::FromStr for TracingHeaderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "datadog" => Ok(TracingHeaderType::Datadog),
            "b3" => Ok(TracingHeaderType::B3),
            "b3multi" | "b3-multi" => Ok(TracingHeaderType::B3multi),
            "tracecontext" | "w3c" => Ok(TracingHeaderType::Tracecontext),
            other => Err(format!("unknown tracing header type: {other}")),
        }
    }
}

/// When trace headers are injected for unsampled requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TraceContextInjection {
    /// Inject headers for every request, signalling the sampling decision
    #[default]
    All,
    /// Only inject headers when the trace is sampled
    Sampled,
}

impl std::fmt::Display for TraceContextInjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceContextInjection::All => write!(f, "all"),
            TraceContextInjection::Sampled => write!(f, "sampled"),
        }
    }
}

impl std::str::FromStr for TraceContextInjection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(TraceContextInjection::All),
            "sampled" => Ok(TraceContextInjection::Sampled),
            other => Err(format!("unknown trace context injection: {other}")),
        }
    }
}

/// Correlation data for one tracked outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceContext {
    pub trace_id: TracingId,
    pub span_id: TracingId,
    pub parent_span_id: Option<TracingId>,
    pub sampled: bool,
}

impl TraceContext {
    pub fn new(
        trace_id: TracingId,
        span_id: TracingId,
        parent_span_id: Option<TracingId>,
        sampled: bool,
    ) -> Self {
        Self {
            trace_id,
            span_id,
            parent_span_id,
            sampled,
        }
    }
}

/// Header names written by the tracking helper.
pub mod headers {
    pub const DATADOG_TRACE_ID: &str = "x-datadog-trace-id";
    pub const DATADOG_PARENT_ID: &str = "x-datadog-parent-id";
    pub const DATADOG_ORIGIN: &str = "x-datadog-origin";
    pub const DATADOG_SAMPLING_PRIORITY: &str = "x-datadog-sampling-priority";
    pub const DATADOG_TAGS: &str = "x-datadog-tags";

    pub const B3_SINGLE: &str = "b3";
    pub const B3_TRACE_ID: &str = "X-B3-TraceId";
    pub const B3_SPAN_ID: &str = "X-B3-SpanId";
    pub const B3_PARENT_ID: &str = "X-B3-ParentId";
    pub const B3_SAMPLED: &str = "X-B3-Sampled";

    pub const TRACE_PARENT: &str = "traceparent";
    pub const TRACE_STATE: &str = "tracestate";
}

/// RUM attribute keys written by the tracking helper.
pub mod attributes {
    pub const TRACE_ID: &str = "_dd.trace_id";
    pub const SPAN_ID: &str = "_dd.span_id";
    pub const RULE_PSR: &str = "_dd.rule_psr";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_types_collect() {
        let types: TracingHeaderTypes = [TracingHeaderType::Datadog, TracingHeaderType::B3multi]
            .into_iter()
            .collect();
        assert!(types.contains(TracingHeaderTypes::DATADOG));
        assert!(types.contains(TracingHeaderTypes::B3_MULTI));
        assert!(!types.contains(TracingHeaderTypes::B3));
    }

    #[test]
    fn test_header_type_from_str() {
        assert_eq!(
            "W3C".parse::<TracingHeaderType>().unwrap(),
            TracingHeaderType::Tracecontext
        );
        assert_eq!(
            "b3-multi".parse::<TracingHeaderType>().unwrap(),
            TracingHeaderType::B3multi
        );
        assert!("zipkin".parse::<TracingHeaderType>().is_err());
    }

    #[test]
    fn test_injection_deserialize() {
        let policy: TraceContextInjection = serde_yaml::from_str("sampled").unwrap();
        assert_eq!(policy, TraceContextInjection::Sampled);
        assert_eq!(TraceContextInjection::default(), TraceContextInjection::All);
        assert_eq!(
            "Sampled".parse::<TraceContextInjection>().unwrap(),
            TraceContextInjection::Sampled
        );
        assert!("some".parse::<TraceContextInjection>().is_err());
    }
}
