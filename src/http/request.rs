//! Request inspection helpers.
//!
//! # Responsibilities
//! - Classify the calling platform (web vs mobile)
//! - Expose client metadata (user agent, ip) for audit rows

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::{header, Request};
use serde::{Deserialize, Serialize};

/// Calling platform, recorded on subscriptions and audit rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Web,
    Mobile,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Web => "web",
            Platform::Mobile => "mobile",
        }
    }
}

/// Header carrying an explicit platform declaration.
pub const X_PLATFORM: &str = "x-platform";

/// User-agent substrings of known mobile HTTP clients.
pub const MOBILE_UA_MARKERS: [&str; 4] = ["okhttp", "Dart/", "Alamofire", "CFNetwork"];

/// Platform of a request: the `X-Platform` header when present, otherwise
/// mobile for API-prefixed paths and web for everything else.
pub fn detect_platform<B>(req: &Request<B>) -> Platform {
    if let Some(value) = req.headers().get(X_PLATFORM).and_then(|v| v.to_str().ok()) {
        if value.eq_ignore_ascii_case("web") {
            return Platform::Web;
        }
        if value.eq_ignore_ascii_case("mobile") {
            return Platform::Mobile;
        }
    }
    if req.uri().path().starts_with("/api/") {
        Platform::Mobile
    } else {
        Platform::Web
    }
}

/// Whether the request looks like it came from a mobile client: explicit
/// platform header, API path, or a known mobile HTTP client user agent.
pub fn is_mobile_client<B>(req: &Request<B>) -> bool {
    if detect_platform(req) == Platform::Mobile {
        return true;
    }
    req.headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ua| MOBILE_UA_MARKERS.iter().any(|m| ua.contains(m)))
}

/// Client user agent, for audit metadata.
pub fn user_agent<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Client IP: X-Forwarded-For first hop, else the socket peer address.
pub fn client_ip<B>(req: &Request<B>) -> Option<String> {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return Some(first.to_string());
            }
        }
    }
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|c| c.0.ip().to_string())
}
