//! Subdomain-based tenant resolution middleware.
//!
//! # Responsibilities
//! - Recognize infrastructure requests (assets, health, real-time UI
//!   frames) and pass them through without resolving at all
//! - Map the request host to an academy via the directory
//! - Attach the tenant context for every downstream stage
//!
//! # Failure semantics
//! Unknown subdomain → 404. Inactive academy → 503. A directory failure is
//! logged and degrades to "no tenant" rather than crashing the request.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::DomainConfig;
use crate::http::response::{error_json, html_error, wants_json};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::tenant::context::TenantContext;

/// Subdomain for a request host, relative to the platform base domain.
///
/// `None` means the host is the bare base domain (or empty) and the default
/// tenant applies. A host unrelated to the base domain is treated as a
/// literal subdomain and will fail lookup.
pub fn extract_subdomain(host: &str, base_domain: &str) -> Option<String> {
    let host = host
        .split(':')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if host.is_empty() || host == base_domain {
        return None;
    }
    match host.strip_suffix(&format!(".{base_domain}")) {
        Some(sub) if !sub.is_empty() => Some(sub.to_string()),
        Some(_) => None,
        None => Some(host),
    }
}

/// Absolute URL on a tenant's subdomain.
pub fn tenant_url(domain: &DomainConfig, subdomain: &str, path: &str) -> String {
    let base = format!(
        "{}://{}.{}",
        domain.scheme, subdomain, domain.base_domain
    );
    match url::Url::parse(&base).and_then(|u| u.join(path)) {
        Ok(u) => u.to_string(),
        Err(_) => format!("{base}{path}"),
    }
}

/// Host of a request, from the Host header (port stripped by the caller).
pub fn request_host<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
}

/// Tenant resolution middleware. Must run before every other gate.
pub async fn resolve_tenant(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let config = &state.config;
    let path = req.uri().path();

    // Infrastructure traffic is not tenant-aware; check before any lookup.
    let bypass_header = req.headers().contains_key(config.resolver.bypass_header.as_str());
    if bypass_header
        || config
            .resolver
            .bypass_prefixes
            .iter()
            .any(|p| path.starts_with(p.as_str()))
    {
        metrics::record_resolution("bypassed");
        return next.run(req).await;
    }

    let host = request_host(&req).unwrap_or("").to_string();
    let (subdomain, is_default) = match extract_subdomain(&host, &config.domain.base_domain) {
        Some(sub) => (sub, false),
        None => (config.domain.default_tenant.clone(), true),
    };

    match state.directory.find_by_subdomain(&subdomain) {
        Ok(Some(academy)) if academy.is_active => {
            tracing::debug!(subdomain = %subdomain, academy_id = academy.id, "Tenant resolved");
            metrics::record_resolution(if is_default { "default" } else { "resolved" });
            req.extensions_mut().insert(TenantContext::new(academy));
            next.run(req).await
        }
        Ok(Some(academy)) => {
            tracing::info!(
                subdomain = %subdomain,
                academy_id = academy.id,
                "Request for inactive academy rejected"
            );
            metrics::record_resolution("inactive");
            if wants_json(req.headers()) {
                error_json(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "ACADEMY_INACTIVE",
                    "This academy is currently unavailable.",
                )
            } else {
                html_error(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "This academy is currently unavailable.",
                )
            }
        }
        Ok(None) if is_default => {
            // The platform default tenant is missing from the directory.
            // Platform-level routes must still work, so degrade to no tenant.
            tracing::warn!(
                subdomain = %subdomain,
                host = %host,
                "Default tenant not found; continuing without tenant context"
            );
            metrics::record_resolution("default_missing");
            next.run(req).await
        }
        Ok(None) => {
            tracing::info!(subdomain = %subdomain, host = %host, path = %req.uri().path(), "Unknown tenant subdomain");
            metrics::record_resolution("not_found");
            if wants_json(req.headers()) {
                error_json(StatusCode::NOT_FOUND, "ACADEMY_NOT_FOUND", "Academy not found.")
            } else {
                html_error(StatusCode::NOT_FOUND, "Academy not found.")
            }
        }
        Err(e) => {
            // A resolution exception degrades to "no tenant" rather than
            // crashing the request.
            tracing::warn!(
                error = %e,
                host = %host,
                path = %req.uri().path(),
                "Tenant resolution failed; continuing without tenant context"
            );
            metrics::record_resolution("error");
            next.run(req).await
        }
    }
}
