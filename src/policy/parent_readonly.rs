//! Parent read-only enforcement.
//!
//! Parent accounts observe, they do not mutate. POST stays allowed: parent
//! dashboards submit search and filter forms as POST, so blocking it would
//! break them. That leaves POST-shaped mutations open; known gap, kept as
//! the product defines it.

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::auth::principal::current_principal;
use crate::auth::role::Role;
use crate::http::messages;
use crate::http::response::{error_json, html_error, wants_json};
use crate::http::server::AppState;
use crate::policy::locale::request_locale;

/// Parent read-only middleware. Runs after the authentication gate.
pub async fn parent_read_only(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(principal) = current_principal(&req) {
        if principal.role == Role::Parent
            && !matches!(*req.method(), Method::GET | Method::HEAD | Method::POST)
        {
            tracing::info!(
                user_id = principal.id,
                method = %req.method(),
                path = %req.uri().path(),
                "Blocked mutating request from parent account"
            );
            let locale = request_locale(&req, &state.config.locale.default);
            let message = messages::localize(
                &locale,
                messages::PARENT_VIEW_ONLY_EN,
                messages::PARENT_VIEW_ONLY_AR,
            );
            return if wants_json(req.headers()) {
                error_json(StatusCode::FORBIDDEN, "PARENT_VIEW_ONLY", message)
            } else {
                html_error(StatusCode::FORBIDDEN, message)
            };
        }
    }
    next.run(req).await
}
