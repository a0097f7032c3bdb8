//! Locale selection.
//!
//! Resolution priority: explicit query parameter, session-stored locale,
//! the principal's stored preference, then the static default. The browser
//! Accept-Language header is deliberately never consulted. The selected
//! locale is persisted to the session and attached to the request.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::auth::session::{resolve_principal, session_token};
use crate::http::server::AppState;

/// Request extension carrying the selected locale.
#[derive(Debug, Clone)]
pub struct RequestLocale(pub String);

/// Locale attached by the selector, or the given fallback.
pub fn request_locale<B>(req: &Request<B>, fallback: &str) -> String {
    req.extensions()
        .get::<RequestLocale>()
        .map(|l| l.0.clone())
        .unwrap_or_else(|| fallback.to_string())
}

/// `lang` query parameter, if present.
fn lang_query_param(query: Option<&str>) -> Option<String> {
    query?.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name == "lang" && !value.is_empty()).then(|| value.to_string())
    })
}

/// Locale selector middleware.
pub async fn select_locale(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let supported = &state.config.locale.supported;
    let token = session_token(&req);

    // 1. Explicit query parameter.
    let mut chosen = lang_query_param(req.uri().query()).filter(|l| supported.contains(l));

    // 2. Session-stored locale.
    if chosen.is_none() {
        if let Some(token) = &token {
            chosen = state
                .sessions
                .locale(token)
                .filter(|l| supported.contains(l));
        }
    }

    // 3. The principal's stored preference.
    if chosen.is_none() {
        if let Some(principal) = resolve_principal(&req, &state.users, &state.sessions) {
            chosen = principal
                .preferred_locale
                .filter(|l| supported.contains(l));
        }
    }

    // 4. Static default. Never inferred from Accept-Language.
    let locale = chosen.unwrap_or_else(|| state.config.locale.default.clone());

    if let Some(token) = &token {
        state.sessions.set_locale(token, &locale);
    }
    req.extensions_mut().insert(RequestLocale(locale));
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lang_param_is_extracted() {
        assert_eq!(
            lang_query_param(Some("page=2&lang=en")),
            Some("en".to_string())
        );
        assert_eq!(lang_query_param(Some("page=2")), None);
        assert_eq!(lang_query_param(Some("lang=")), None);
        assert_eq!(lang_query_param(None), None);
    }
}
