//! Response construction and content negotiation.
//!
//! # Responsibilities
//! - Decide JSON vs HTML per the client's Accept / XHR signaling
//! - Build structured error bodies and small HTML error pages
//! - Render the maintenance page

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Whether the client expects a JSON response.
pub fn wants_json(headers: &HeaderMap) -> bool {
    let accepts_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json") || accept.contains("+json"));
    let is_xhr = headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
    accepts_json || is_xhr
}

/// Structured JSON error body.
pub fn error_json(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error_code": code,
            "message": message,
        })),
    )
        .into_response()
}

/// Minimal HTML error page.
pub fn html_error(status: StatusCode, message: &str) -> Response {
    let body = format!(
        "<!DOCTYPE html>\n<html><head><title>{status}</title></head>\
         <body><h1>{}</h1><p>{message}</p></body></html>",
        status.canonical_reason().unwrap_or("Error"),
    );
    (status, Html(body)).into_response()
}

/// The 503 maintenance page with the tenant's message.
pub fn maintenance_page(message: &str) -> Response {
    let body = format!(
        "<!DOCTYPE html>\n<html><head><title>Under Maintenance</title></head>\
         <body><h1>Under Maintenance</h1><p>{message}</p></body></html>"
    );
    (StatusCode::SERVICE_UNAVAILABLE, Html(body)).into_response()
}
