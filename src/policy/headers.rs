//! Security header injection.
//!
//! # Responsibilities
//! - Append a Content-Security-Policy to HTML responses
//! - Add standard hardening headers (nosniff, frame-deny, referrer policy)
//!
//! # Design Decisions
//! - Non-HTML responses (JSON, assets) are left untouched
//! - Local mode permits the dev asset server and wildcard tenant
//!   subdomains; production appends a mixed-content block directive

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::config::{Environment, GatewayConfig};
use crate::http::server::AppState;

/// Assemble the CSP for the current environment, whitespace-normalized.
pub fn build_csp(config: &GatewayConfig) -> String {
    let base = &config.domain.base_domain;
    let tenant_hosts = format!("{}://*.{}", config.domain.scheme, base);

    let policy = match config.environment {
        Environment::Local => format!(
            "default-src 'self' {tenant_hosts} http://localhost:5173;
             script-src 'self' 'unsafe-inline' 'unsafe-eval' {tenant_hosts} http://localhost:5173;
             style-src 'self' 'unsafe-inline' {tenant_hosts} http://localhost:5173;
             img-src 'self' data: blob: {tenant_hosts};
             connect-src 'self' {tenant_hosts} http://localhost:5173 ws://localhost:5173;
             frame-ancestors 'none'"
        ),
        Environment::Production => format!(
            "default-src 'self' {tenant_hosts};
             script-src 'self' 'unsafe-inline' {tenant_hosts};
             style-src 'self' 'unsafe-inline' {tenant_hosts};
             img-src 'self' data: blob: {tenant_hosts};
             connect-src 'self' {tenant_hosts};
             frame-ancestors 'none';
             block-all-mixed-content"
        ),
    };

    // Collapse the formatting whitespace before sending.
    policy.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Security header middleware. Post-processes HTML responses only.
pub async fn security_headers(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;

    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html"));
    if !is_html {
        return response;
    }

    let headers = response.headers_mut();
    if let Ok(csp) = HeaderValue::from_str(&build_csp(&state.config)) {
        headers.insert(header::CONTENT_SECURITY_POLICY, csp);
    }
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csp_whitespace_is_normalized() {
        let config = GatewayConfig::default();
        let csp = build_csp(&config);
        assert!(!csp.contains('\n'));
        assert!(!csp.contains("  "));
    }

    #[test]
    fn production_blocks_mixed_content() {
        let mut config = GatewayConfig::default();
        config.environment = Environment::Production;
        assert!(build_csp(&config).ends_with("block-all-mixed-content"));

        config.environment = Environment::Local;
        let csp = build_csp(&config);
        assert!(!csp.contains("block-all-mixed-content"));
        assert!(csp.contains("http://localhost:5173"));
    }

    #[test]
    fn csp_allows_tenant_subdomains() {
        let config = GatewayConfig::default();
        assert!(build_csp(&config).contains("https://*.academy.test"));
    }
}
