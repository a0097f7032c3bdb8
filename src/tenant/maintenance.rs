//! Maintenance mode gate.
//!
//! Consults the tenant context; when the academy is in maintenance mode the
//! request is halted with a 503 unless one of the bypass rules applies.
//! Bypass checks run in order and each is independently sufficient:
//! 1. privileged principal (super admin, admin, supervisor) or the academy
//!    owner;
//! 2. path on the configured exclusion list (anchored, trailing-`*`
//!    wildcard);
//! 3. the maintenance page itself (avoids a redirect loop).

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::session::resolve_principal;
use crate::http::response::{maintenance_page, wants_json};
use crate::http::server::AppState;
use crate::tenant::context::current_tenant;

/// Anchored path match with an optional trailing-`*` wildcard.
pub fn path_matches(pattern: &str, path: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => path.starts_with(prefix),
        None => path == pattern,
    }
}

/// Maintenance gate middleware. Absence of tenant context means "proceed
/// normally" (platform-level routes).
pub async fn maintenance_gate(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(tenant) = current_tenant(&req) else {
        return next.run(req).await;
    };
    if !tenant.academy().maintenance_mode {
        return next.run(req).await;
    }

    let academy = tenant.academy();

    // 1. Privileged roles and the academy owner pass.
    if let Some(principal) = resolve_principal(&req, &state.users, &state.sessions) {
        if principal.role.bypasses_maintenance() || Some(principal.id) == academy.admin_id {
            tracing::debug!(
                academy_id = academy.id,
                user_id = principal.id,
                "Maintenance bypass for privileged principal"
            );
            return next.run(req).await;
        }
    }

    // 2. Excluded paths pass.
    let path = req.uri().path();
    if state
        .config
        .maintenance
        .excluded_paths
        .iter()
        .any(|pattern| path_matches(pattern, path))
    {
        return next.run(req).await;
    }

    // 3. The maintenance page itself passes.
    if path == state.config.maintenance.page_path {
        return next.run(req).await;
    }

    let message = academy
        .settings
        .maintenance_message
        .clone()
        .unwrap_or_else(|| state.config.maintenance.default_message.clone());

    if wants_json(req.headers()) {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "message": message }))).into_response()
    } else {
        maintenance_page(&message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_patterns_are_anchored() {
        assert!(path_matches("/login", "/login"));
        assert!(!path_matches("/login", "/login/extra"));
        assert!(!path_matches("/login", "/prefix/login"));
    }

    #[test]
    fn trailing_wildcard_matches_any_suffix() {
        assert!(path_matches("/admin/*", "/admin/settings"));
        assert!(path_matches("/admin/*", "/admin/"));
        assert!(!path_matches("/admin/*", "/admin"));
        assert!(!path_matches("/admin/*", "/other/admin/x"));
    }
}
