//! Headers command implementation
//!
//! Shows the trace context, tracing headers and RUM attributes that would be
//! attached to a request.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context};
use serde_json::json;

use crate::cli::output::{Output, Table};
use crate::core::config::{FirstPartyHostConfig, RumConfig, SdkConfig};
use crate::platform::Attributes;
use crate::trace::{
    IdRepresentation, ResourceTrackingHelper, TraceContextInjection, TracingHeaderType,
};

/// Options for the headers command
#[derive(Debug, Default)]
pub struct HeadersOptions<'a> {
    pub config: Option<&'a Path>,
    /// `PATTERN` or `PATTERN=TYPE[,TYPE...]`
    pub hosts: &'a [String],
    pub sample_rate: Option<f64>,
    pub injection: Option<TraceContextInjection>,
    pub json: bool,
}

/// Parse a `--host` value.
pub fn parse_host_spec(spec: &str) -> anyhow::Result<FirstPartyHostConfig> {
    let (host, types) = match spec.split_once('=') {
        Some((host, types)) => (host.trim(), Some(types)),
        None => (spec.trim(), None),
    };
    if host.is_empty() {
        bail!("Host pattern must not be empty: '{}'", spec);
    }

    let headers = match types {
        Some(types) => types
            .split(',')
            .map(|t| t.parse::<TracingHeaderType>().map_err(anyhow::Error::msg))
            .collect::<anyhow::Result<Vec<_>>>()
            .with_context(|| format!("Invalid header types in '{}'", spec))?,
        None => vec![TracingHeaderType::Datadog, TracingHeaderType::Tracecontext],
    };
    Ok(FirstPartyHostConfig::new(host, headers))
}

fn rum_config(options: &HeadersOptions<'_>) -> anyhow::Result<RumConfig> {
    let mut rum = match options.config {
        Some(path) => {
            SdkConfig::load(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
                .rum
        }
        None => RumConfig::default(),
    };

    for spec in options.hosts {
        rum.first_party_hosts.push(parse_host_spec(spec)?);
    }
    if let Some(rate) = options.sample_rate {
        rum.trace_sample_rate = rate;
    }
    if let Some(injection) = options.injection {
        rum.trace_context_injection = injection;
    }
    Ok(rum)
}

/// Run the headers command
pub fn run_headers(url: &str, options: &HeadersOptions<'_>) -> anyhow::Result<()> {
    let rum = rum_config(options)?;
    let helper = ResourceTrackingHelper::from_config(&rum);
    let header_types = helper.header_types_for_url(url);

    let mut headers = std::collections::HashMap::new();
    let mut attributes = Attributes::new();
    let context = (!header_types.is_empty()).then(|| {
        let context = helper.generate_trace_context();
        helper.inject_headers(&context, header_types, &mut headers);
        helper.generate_datadog_attributes(&context, &mut attributes);
        context
    });
    let headers: BTreeMap<_, _> = headers.into_iter().collect();

    if options.json {
        let trace = context.map(|c| {
            json!({
                "trace_id": c.trace_id.to_string_as(IdRepresentation::Hex32Chars),
                "span_id": c.span_id.to_string_as(IdRepresentation::Hex16Chars),
                "sampled": c.sampled,
            })
        });
        let report = json!({
            "url": url,
            "first_party": context.is_some(),
            "injection": helper.injection().to_string(),
            "trace_context": trace,
            "headers": headers,
            "attributes": attributes,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    Output::header(&format!("Request to {}", url));
    let Some(context) = context else {
        Output::warning("Host is not a first party host, no tracing headers are added");
        return Ok(());
    };

    Output::kv(
        "trace id",
        &context.trace_id.to_string_as(IdRepresentation::Hex32Chars),
    );
    Output::kv(
        "span id",
        &context.span_id.to_string_as(IdRepresentation::Hex16Chars),
    );
    Output::kv("sampling", &Output::sampled(context.sampled));
    Output::kv("injection", &helper.injection().to_string());

    Output::header("Headers");
    if headers.is_empty() {
        Output::info("None (unsampled request with sampled-only injection)");
    } else {
        let mut table = Table::new(vec!["Header", "Value"]);
        for (name, value) in &headers {
            table.add_row(vec![name.as_str(), value.as_str()]);
        }
        table.print();
    }

    Output::header("RUM attributes");
    for (key, value) in &attributes {
        Output::kv(key, &value.to_string());
    }

    Ok(())
}
