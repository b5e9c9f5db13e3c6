//! Tracked outbound requests
//!
//! Ties trace header injection to the RUM resource lifecycle: begin a
//! resource before sending a request, finish or fail it when the response
//! arrives.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use super::context::TraceContext;
use super::tracking::ResourceTrackingHelper;
use crate::platform::Attributes;
use crate::rum::{Rum, RumHttpMethod, RumResourceType};

/// Parse an HTTP method name, case-insensitively. Unknown methods map to GET.
pub fn http_method_from_str(method: &str) -> RumHttpMethod {
    match method.trim().to_ascii_uppercase().as_str() {
        "POST" => RumHttpMethod::Post,
        "HEAD" => RumHttpMethod::Head,
        "PUT" => RumHttpMethod::Put,
        "DELETE" => RumHttpMethod::Delete,
        "PATCH" => RumHttpMethod::Patch,
        _ => RumHttpMethod::Get,
    }
}

/// Classify a response by its `Content-Type` header value.
///
/// Parameters such as `; charset=utf-8` are ignored.
pub fn resource_type_from_content_type(content_type: Option<&str>) -> RumResourceType {
    let Some(content_type) = content_type else {
        return RumResourceType::Native;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let (kind, subtype) = match essence.split_once('/') {
        Some((kind, subtype)) => (kind, Some(subtype)),
        None => (essence.as_str(), None),
    };

    match kind {
        "image" => return RumResourceType::Image,
        "audio" | "video" => return RumResourceType::Media,
        "font" => return RumResourceType::Font,
        _ => {}
    }

    match subtype {
        Some("javascript") => RumResourceType::Js,
        Some("css") => RumResourceType::Css,
        _ => RumResourceType::Native,
    }
}

/// Random version 4 UUID string used as a RUM resource key
fn resource_key() -> String {
    Uuid::new_v4().to_string()
}

/// Starts RUM resources for outbound requests, adding trace headers for
/// first party hosts.
#[derive(Clone)]
pub struct ResourceTracker {
    helper: Arc<ResourceTrackingHelper>,
    rum: Rum,
}

impl ResourceTracker {
    pub fn new(helper: Arc<ResourceTrackingHelper>, rum: Rum) -> Self {
        Self { helper, rum }
    }

    pub fn helper(&self) -> &ResourceTrackingHelper {
        &self.helper
    }

    /// Start tracking a request to `url`.
    ///
    /// The returned headers must be added to the request before it is sent.
    pub fn begin(&self, url: &str, method: &str) -> TrackedResource {
        let header_types = self.helper.header_types_for_url(url);
        let mut headers = HashMap::new();
        let mut attributes = Attributes::new();
        let mut trace_context = None;

        if !header_types.is_empty() {
            let context = self.helper.generate_trace_context();
            self.helper
                .generate_datadog_attributes(&context, &mut attributes);
            self.helper
                .inject_headers(&context, header_types, &mut headers);
            trace_context = Some(context);
        }

        let key = resource_key();
        self.rum.start_resource(
            &key,
            http_method_from_str(method),
            url,
            attributes.clone(),
        );

        TrackedResource {
            key,
            headers,
            attributes,
            trace_context,
            rum: self.rum.clone(),
        }
    }
}

/// A request whose RUM resource has been started.
pub struct TrackedResource {
    pub key: String,
    /// Tracing headers to add to the request
    pub headers: HashMap<String, String>,
    /// Attributes sent with the resource start
    pub attributes: Attributes,
    pub trace_context: Option<TraceContext>,
    rum: Rum,
}

impl TrackedResource {
    /// Stop the resource with the response details.
    pub fn finish(self, status_code: Option<u16>, content_type: Option<&str>, size: Option<u64>) {
        self.rum.stop_resource(
            &self.key,
            resource_type_from_content_type(content_type),
            status_code,
            size,
            Attributes::new(),
        );
    }

    /// Stop the resource because the request failed.
    pub fn fail(self, error_type: &str, message: &str) {
        self.rum
            .stop_resource_with_error(&self.key, error_type, message, Attributes::new());
    }
}
