//! RUM event enums shared by the front-end, messages and platform

use serde::{Deserialize, Serialize};

/// Kind of user interaction recorded as a RUM action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RumUserActionType {
    Tap,
    Scroll,
    Swipe,
    #[default]
    Custom,
}

/// Where a RUM error originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RumErrorSource {
    #[default]
    Source,
    Network,
    Webview,
    Console,
    Custom,
}

/// HTTP method of a tracked resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RumHttpMethod {
    Post,
    #[default]
    Get,
    Head,
    Put,
    Delete,
    Patch,
}

/// Kind of a tracked resource, derived from its content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RumResourceType {
    Document,
    Image,
    Xhr,
    Beacon,
    Css,
    Fetch,
    Font,
    Js,
    Media,
    Other,
    #[default]
    Native,
}

impl std::fmt::Display for RumHttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RumHttpMethod::Post => write!(f, "POST"),
            RumHttpMethod::Get => write!(f, "GET"),
            RumHttpMethod::Head => write!(f, "HEAD"),
            RumHttpMethod::Put => write!(f, "PUT"),
            RumHttpMethod::Delete => write!(f, "DELETE"),
            RumHttpMethod::Patch => write!(f, "PATCH"),
        }
    }
}

impl std::fmt::Display for RumResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RumResourceType::Document => "document",
            RumResourceType::Image => "image",
            RumResourceType::Xhr => "xhr",
            RumResourceType::Beacon => "beacon",
            RumResourceType::Css => "css",
            RumResourceType::Fetch => "fetch",
            RumResourceType::Font => "font",
            RumResourceType::Js => "js",
            RumResourceType::Media => "media",
            RumResourceType::Other => "other",
            RumResourceType::Native => "native",
        };
        write!(f, "{name}")
    }
}
