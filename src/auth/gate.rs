//! Authentication and role authorization gates.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::login::login_url;
use crate::auth::principal::{current_principal, CurrentPrincipal};
use crate::auth::role::Role;
use crate::auth::session::{self, session_token};
use crate::http::messages;
use crate::http::response::{error_json, html_error, wants_json};
use crate::http::server::AppState;
use crate::policy::locale::request_locale;
use crate::tenant::resolver::request_host;

/// Login wall. Resolves the principal from the session and attaches it to
/// the request; everything downstream can rely on it being present.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Tenancy is host-based here; routes carry no subdomain parameter, so
    // the login URL helper derives it from the host.
    let subdomain_param = None;

    let Some(token) = session_token(&req) else {
        return unauthenticated(&state, &req, subdomain_param, None);
    };
    let Some(session) = state.sessions.get(&token) else {
        return unauthenticated(&state, &req, subdomain_param, None);
    };
    let Some(principal) = state.users.find(session.user_id) else {
        // Session points at a deleted user; drop it.
        state.sessions.revoke(&token);
        return unauthenticated(&state, &req, subdomain_param, None);
    };

    if !principal.active {
        // Forced logout: an inactive account may not keep a live session.
        state.sessions.revoke(&token);
        tracing::info!(user_id = principal.id, "Inactive principal logged out");
        return unauthenticated(&state, &req, subdomain_param, Some("account_inactive"));
    }

    req.extensions_mut()
        .insert(CurrentPrincipal(Arc::new(principal)));
    next.run(req).await
}

fn unauthenticated<B>(
    state: &AppState,
    req: &Request<B>,
    subdomain_param: Option<&str>,
    error_flag: Option<&str>,
) -> Response {
    if wants_json(req.headers()) {
        return error_json(
            StatusCode::UNAUTHORIZED,
            error_flag.map(str::to_ascii_uppercase).as_deref().unwrap_or("UNAUTHENTICATED"),
            "Authentication required.",
        );
    }

    let mut url = login_url(subdomain_param, request_host(req), &state.config.domain);
    if let Some(flag) = error_flag {
        url.push_str("?error=");
        url.push_str(flag);
    }
    Redirect::temporary(&url).into_response()
}

/// Per-route role allow-list, OR-matched against the principal's role.
#[derive(Clone)]
pub struct RoleGateState {
    pub app: AppState,
    pub allowed: Arc<[Role]>,
}

impl RoleGateState {
    pub fn new(app: AppState, allowed: impl Into<Arc<[Role]>>) -> Self {
        Self {
            app,
            allowed: allowed.into(),
        }
    }
}

/// Role authorization gate. Runs after [`require_auth`].
pub async fn role_gate(
    State(gate): State<RoleGateState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(principal) = current_principal(&req) else {
        return unauthenticated(&gate.app, &req, None, None);
    };

    // Short-circuits on the first matching role.
    if gate.allowed.iter().any(|r| *r == principal.role) {
        return next.run(req).await;
    }

    let locale = request_locale(&req, &gate.app.config.locale.default);
    tracing::info!(
        user_id = principal.id,
        role = %principal.role,
        path = %req.uri().path(),
        "Role not in route allow-list"
    );

    let message = messages::localize(
        &locale,
        messages::ROLE_FORBIDDEN_EN,
        messages::ROLE_FORBIDDEN_AR,
    );
    if wants_json(req.headers()) {
        error_json(StatusCode::FORBIDDEN, "FORBIDDEN", message)
    } else {
        html_error(StatusCode::FORBIDDEN, message)
    }
}
