//! Trace context generation and tracing header injection
//!
//! Runs synchronously on the thread issuing the request; nothing here goes
//! through the work queue.

use std::collections::HashMap;

use regex::Regex;
use serde_json::json;
use tracing::warn;
use url::Url;

use super::context::{attributes, headers, TraceContext, TraceContextInjection, TracingHeaderTypes};
use super::id::{IdRepresentation, TracingId};
use super::sampler::RateBasedSampler;
use crate::core::config::{FirstPartyHostConfig, RumConfig};
use crate::platform::Attributes;

/// A configured host whose requests (and subdomain requests) get trace headers.
#[derive(Debug, Clone)]
pub struct FirstPartyHost {
    pattern: String,
    regex: Regex,
    header_types: TracingHeaderTypes,
}

impl FirstPartyHost {
    /// Build a matcher for `host`. Returns `None` for empty patterns.
    pub fn new(host: &str, header_types: TracingHeaderTypes) -> Option<Self> {
        let pattern = host.trim().trim_matches('.').to_lowercase();
        if pattern.is_empty() {
            return None;
        }
        let regex = match Regex::new(&format!(r"^(.*\.)*{}$", regex::escape(&pattern))) {
            Ok(regex) => regex,
            Err(e) => {
                warn!(host = %host, error = %e, "Skipping first party host");
                return None;
            }
        };
        Some(Self {
            pattern,
            regex,
            header_types,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn header_types(&self) -> TracingHeaderTypes {
        self.header_types
    }

    /// True when `host` equals the pattern or is a subdomain of it.
    pub fn is_match(&self, host: &str) -> bool {
        self.regex.is_match(&host.to_lowercase())
    }

    pub fn from_config(config: &FirstPartyHostConfig) -> Option<Self> {
        Self::new(&config.host, config.header_types())
    }
}

/// Decides whether and how to propagate trace context on outbound requests.
///
/// Configuration is immutable after construction, so one helper can be
/// shared by any number of request threads.
#[derive(Debug, Clone)]
pub struct ResourceTrackingHelper {
    trace_sample_rate: f64,
    sampler: RateBasedSampler,
    first_party_hosts: Vec<FirstPartyHost>,
    injection: TraceContextInjection,
}

impl ResourceTrackingHelper {
    /// Create a helper. `trace_sample_rate` is a percentage and is clamped into `[0, 100]`.
    pub fn new(
        trace_sample_rate: f64,
        first_party_hosts: Vec<FirstPartyHost>,
        injection: TraceContextInjection,
    ) -> Self {
        let trace_sample_rate = if trace_sample_rate.is_nan() {
            0.0
        } else {
            trace_sample_rate.clamp(0.0, 100.0)
        };
        Self {
            trace_sample_rate,
            sampler: RateBasedSampler::from_percent(trace_sample_rate),
            first_party_hosts,
            injection,
        }
    }

    pub fn from_config(config: &RumConfig) -> Self {
        let hosts = config
            .first_party_hosts
            .iter()
            .filter_map(|host| {
                let matcher = FirstPartyHost::from_config(host);
                if matcher.is_none() {
                    warn!(host = %host.host, "Ignoring empty first party host pattern");
                }
                matcher
            })
            .collect();
        Self::new(
            config.trace_sample_rate,
            hosts,
            config.trace_context_injection,
        )
    }

    pub fn injection(&self) -> TraceContextInjection {
        self.injection
    }

    pub fn first_party_hosts(&self) -> &[FirstPartyHost] {
        &self.first_party_hosts
    }

    /// Build a fresh context for one request.
    pub fn generate_trace_context(&self) -> TraceContext {
        TraceContext::new(
            TracingId::create_128_bit(),
            TracingId::create_63_bit(),
            None,
            self.sampler.sample(),
        )
    }

    /// Header formats for the first configured host matching `url`.
    pub fn header_types_for_host(&self, url: &Url) -> TracingHeaderTypes {
        let Some(host) = url.host_str() else {
            return TracingHeaderTypes::empty();
        };
        self.first_party_hosts
            .iter()
            .find(|candidate| candidate.is_match(host))
            .map(|candidate| candidate.header_types())
            .unwrap_or_default()
    }

    /// Same as [`header_types_for_host`](Self::header_types_for_host) for an unparsed URL.
    pub fn header_types_for_url(&self, url: &str) -> TracingHeaderTypes {
        match Url::parse(url) {
            Ok(url) => self.header_types_for_host(&url),
            Err(_) => TracingHeaderTypes::empty(),
        }
    }

    /// Inject headers using the configured injection policy.
    pub fn inject_headers(
        &self,
        context: &TraceContext,
        header_types: TracingHeaderTypes,
        out: &mut HashMap<String, String>,
    ) {
        generate_tracing_headers(context, header_types, self.injection, out);
    }

    /// Add the trace attributes attached to the RUM resource event.
    pub fn generate_datadog_attributes(&self, context: &TraceContext, out: &mut Attributes) {
        out.insert(
            attributes::RULE_PSR.to_string(),
            json!(self.trace_sample_rate / 100.0),
        );
        if context.sampled {
            out.insert(
                attributes::TRACE_ID.to_string(),
                json!(context.trace_id.to_string_as(IdRepresentation::Hex32Chars)),
            );
            out.insert(
                attributes::SPAN_ID.to_string(),
                json!(context.span_id.to_string_as(IdRepresentation::Decimal)),
            );
        }
    }
}

/// Render `context` into every format set in `header_types`.
///
/// Adds nothing when the context is unsampled and `injection` is
/// [`TraceContextInjection::Sampled`].
pub fn generate_tracing_headers(
    context: &TraceContext,
    header_types: TracingHeaderTypes,
    injection: TraceContextInjection,
    out: &mut HashMap<String, String>,
) {
    if !context.sampled && injection == TraceContextInjection::Sampled {
        return;
    }

    let sampled = if context.sampled { "1" } else { "0" };
    let trace_hex = context.trace_id.to_string_as(IdRepresentation::Hex32Chars);
    let span_hex = context.span_id.to_string_as(IdRepresentation::Hex16Chars);
    let parent_hex = context
        .parent_span_id
        .map(|id| id.to_string_as(IdRepresentation::Hex16Chars));

    if header_types.contains(TracingHeaderTypes::DATADOG) {
        out.insert(
            headers::DATADOG_TRACE_ID.to_string(),
            context.trace_id.to_string_as(IdRepresentation::LowDecimal),
        );
        out.insert(
            headers::DATADOG_PARENT_ID.to_string(),
            context.span_id.to_string_as(IdRepresentation::Decimal),
        );
        out.insert(headers::DATADOG_ORIGIN.to_string(), "rum".to_string());
        out.insert(
            headers::DATADOG_SAMPLING_PRIORITY.to_string(),
            sampled.to_string(),
        );
        out.insert(
            headers::DATADOG_TAGS.to_string(),
            format!(
                "_dd.p.tid={}",
                context.trace_id.to_string_as(IdRepresentation::HighHex16Chars)
            ),
        );
    }

    if header_types.contains(TracingHeaderTypes::B3) {
        let value = if context.sampled {
            match &parent_hex {
                Some(parent) => format!("{trace_hex}-{span_hex}-{sampled}-{parent}"),
                None => format!("{trace_hex}-{span_hex}-{sampled}"),
            }
        } else {
            sampled.to_string()
        };
        out.insert(headers::B3_SINGLE.to_string(), value);
    }

    if header_types.contains(TracingHeaderTypes::B3_MULTI) {
        out.insert(headers::B3_SAMPLED.to_string(), sampled.to_string());
        if context.sampled {
            out.insert(headers::B3_TRACE_ID.to_string(), trace_hex.clone());
            out.insert(headers::B3_SPAN_ID.to_string(), span_hex.clone());
            if let Some(parent) = &parent_hex {
                out.insert(headers::B3_PARENT_ID.to_string(), parent.clone());
            }
        }
    }

    if header_types.contains(TracingHeaderTypes::TRACE_CONTEXT) {
        let flags = if context.sampled { "01" } else { "00" };
        out.insert(
            headers::TRACE_PARENT.to_string(),
            format!("00-{trace_hex}-{span_hex}-{flags}"),
        );
        out.insert(
            headers::TRACE_STATE.to_string(),
            format!("dd=s:{sampled};o:rum;p:{span_hex}"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(sampled: bool) -> TraceContext {
        TraceContext::new(
            TracingId::new(0xabc, 0x1234),
            TracingId::new(0, 0x5678),
            None,
            sampled,
        )
    }

    fn helper(rate: f64) -> ResourceTrackingHelper {
        let hosts = vec![
            FirstPartyHost::new("example.com", TracingHeaderTypes::DATADOG).unwrap(),
            FirstPartyHost::new("datadoghq.com", TracingHeaderTypes::B3).unwrap(),
        ];
        ResourceTrackingHelper::new(rate, hosts, TraceContextInjection::All)
    }

    #[test]
    fn test_host_matching() {
        let helper = helper(100.0);
        let types = |url: &str| helper.header_types_for_url(url);

        assert_eq!(types("https://nonfirstparty.com/request"), TracingHeaderTypes::empty());
        assert_eq!(types("https://example.com/request"), TracingHeaderTypes::DATADOG);
        assert_eq!(types("https://api.example.com/x"), TracingHeaderTypes::DATADOG);
        assert_eq!(types("https://app.datadoghq.com/request"), TracingHeaderTypes::B3);
        assert_eq!(types("https://example.com.evil.com/"), TracingHeaderTypes::empty());
        assert_eq!(types("https://notexample.com/"), TracingHeaderTypes::empty());
        assert_eq!(types("not a url"), TracingHeaderTypes::empty());
    }

    #[test]
    fn test_pattern_dots_are_literal() {
        let host = FirstPartyHost::new("a.b", TracingHeaderTypes::DATADOG).unwrap();
        assert!(host.is_match("a.b"));
        assert!(!host.is_match("axb"));
        assert!(FirstPartyHost::new("  ", TracingHeaderTypes::DATADOG).is_none());
    }

    #[test]
    fn test_datadog_headers_sampled() {
        let mut out = HashMap::new();
        generate_tracing_headers(
            &context(true),
            TracingHeaderTypes::DATADOG,
            TraceContextInjection::All,
            &mut out,
        );
        assert_eq!(out[headers::DATADOG_TRACE_ID], "4660");
        assert_eq!(out[headers::DATADOG_PARENT_ID], "22136");
        assert_eq!(out[headers::DATADOG_ORIGIN], "rum");
        assert_eq!(out[headers::DATADOG_SAMPLING_PRIORITY], "1");
        assert_eq!(out[headers::DATADOG_TAGS], "_dd.p.tid=0000000000000ABC");
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn test_b3_unsampled_is_bare_zero() {
        let mut out = HashMap::new();
        generate_tracing_headers(
            &context(false),
            TracingHeaderTypes::B3,
            TraceContextInjection::All,
            &mut out,
        );
        assert_eq!(out[headers::B3_SINGLE], "0");
    }

    #[test]
    fn test_b3_with_parent() {
        let mut ctx = context(true);
        ctx.parent_span_id = Some(TracingId::new(0, 0x9));
        let mut out = HashMap::new();
        generate_tracing_headers(&ctx, TracingHeaderTypes::B3, TraceContextInjection::All, &mut out);
        assert_eq!(
            out[headers::B3_SINGLE],
            "0000000000000ABC0000000000001234-0000000000005678-1-0000000000000009"
        );
    }

    #[test]
    fn test_b3_multi_unsampled_only_signals() {
        let mut out = HashMap::new();
        generate_tracing_headers(
            &context(false),
            TracingHeaderTypes::B3_MULTI,
            TraceContextInjection::All,
            &mut out,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[headers::B3_SAMPLED], "0");
    }

    #[test]
    fn test_trace_context_headers() {
        let mut out = HashMap::new();
        generate_tracing_headers(
            &context(false),
            TracingHeaderTypes::TRACE_CONTEXT,
            TraceContextInjection::All,
            &mut out,
        );
        assert_eq!(
            out[headers::TRACE_PARENT],
            "00-0000000000000ABC0000000000001234-0000000000005678-00"
        );
        assert_eq!(out[headers::TRACE_STATE], "dd=s:0;o:rum;p:0000000000005678");
    }

    #[test]
    fn test_sampled_policy_short_circuits() {
        for bits in 0..=TracingHeaderTypes::all().bits() {
            let types = TracingHeaderTypes::from_bits_truncate(bits);
            let mut out = HashMap::new();
            generate_tracing_headers(&context(false), types, TraceContextInjection::Sampled, &mut out);
            assert!(out.is_empty(), "headers emitted for {types:?}");
        }
    }

    #[test]
    fn test_attributes_when_sampled() {
        let helper = helper(100.0);
        let mut attrs = Attributes::new();
        helper.generate_datadog_attributes(&context(true), &mut attrs);
        assert_eq!(attrs[attributes::RULE_PSR], json!(1.0));
        assert_eq!(
            attrs[attributes::TRACE_ID],
            json!("0000000000000ABC0000000000001234")
        );
        assert_eq!(attrs[attributes::SPAN_ID], json!("22136"));
    }

    #[test]
    fn test_attributes_when_unsampled() {
        let helper = helper(0.0);
        let mut attrs = Attributes::new();
        helper.generate_datadog_attributes(&context(false), &mut attrs);
        assert_eq!(attrs[attributes::RULE_PSR], json!(0.0));
        assert!(!attrs.contains_key(attributes::TRACE_ID));
        assert!(!attrs.contains_key(attributes::SPAN_ID));
    }

    #[test]
    fn test_sample_rate_is_clamped() {
        let helper = ResourceTrackingHelper::new(250.0, vec![], TraceContextInjection::All);
        assert!(helper.generate_trace_context().sampled);
        let mut attrs = Attributes::new();
        helper.generate_datadog_attributes(&context(true), &mut attrs);
        assert_eq!(attrs[attributes::RULE_PSR], json!(1.0));
    }
}
