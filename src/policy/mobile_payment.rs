//! Mobile payment blocker.
//!
//! App-store policy: payment initiation is web-only. Mobile clients that
//! try to start a payment get a structured 403 pointing them at the web
//! flow. GET is always allowed through so payment history stays visible in
//! the apps.

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::messages;
use crate::http::request::is_mobile_client;
use crate::http::server::AppState;
use crate::tenant::context::current_tenant;
use crate::tenant::resolver::tenant_url;

fn is_payment_path(state: &AppState, path: &str) -> bool {
    state
        .config
        .payments
        .initiation_prefixes
        .iter()
        .any(|prefix| path.starts_with(prefix.as_str()))
}

/// Mobile payment blocker middleware.
pub async fn mobile_payment_blocker(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let mutating = matches!(
        *req.method(),
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    );
    if !mutating || !is_payment_path(&state, req.uri().path()) || !is_mobile_client(&req) {
        return next.run(req).await;
    }

    let subdomain = current_tenant(&req)
        .map(|t| t.academy().subdomain.clone())
        .unwrap_or_else(|| state.config.domain.default_tenant.clone());
    let web_url = tenant_url(
        &state.config.domain,
        &subdomain,
        &state.config.payments.web_purchase_path,
    );

    tracing::info!(
        path = %req.uri().path(),
        method = %req.method(),
        "Blocked mobile payment initiation"
    );

    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error_code": "MOBILE_PAYMENT_BLOCKED",
            "message_en": messages::MOBILE_PAYMENT_BLOCKED_EN,
            "message_ar": messages::MOBILE_PAYMENT_BLOCKED_AR,
            "web_url": web_url,
        })),
    )
        .into_response()
}
