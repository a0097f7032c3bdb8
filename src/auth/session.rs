//! Session and user stores.
//!
//! Sessions map opaque tokens to users and hold per-session state (the
//! selected locale). Tokens arrive as a bearer header or a session cookie.
//! Both stores are thread-safe in-memory maps; production wires them to the
//! platform session backend.

use axum::http::{header, Request};
use dashmap::DashMap;
use uuid::Uuid;

use crate::auth::principal::Principal;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "gateway_session";

/// Per-session state.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub user_id: u64,
    /// Locale persisted by the locale selector.
    pub locale: Option<String>,
}

/// Thread-safe session store.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, SessionData>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for a user, returning the opaque token.
    pub fn create(&self, user_id: u64) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(
            token.clone(),
            SessionData {
                user_id,
                locale: None,
            },
        );
        token
    }

    pub fn get(&self, token: &str) -> Option<SessionData> {
        self.sessions.get(token).map(|r| r.value().clone())
    }

    /// Revoke a session (forced logout).
    pub fn revoke(&self, token: &str) {
        self.sessions.remove(token);
    }

    pub fn set_locale(&self, token: &str, locale: &str) {
        if let Some(mut entry) = self.sessions.get_mut(token) {
            entry.locale = Some(locale.to_string());
        }
    }

    pub fn locale(&self, token: &str) -> Option<String> {
        self.sessions.get(token).and_then(|r| r.value().locale.clone())
    }
}

/// Thread-safe user store.
#[derive(Default)]
pub struct UserStore {
    users: DashMap<u64, Principal>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, principal: Principal) {
        self.users.insert(principal.id, principal);
    }

    pub fn find(&self, id: u64) -> Option<Principal> {
        self.users.get(&id).map(|r| r.value().clone())
    }
}

/// Session token from the Authorization header or session cookie.
pub fn session_token<B>(req: &Request<B>) -> Option<String> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        if let Ok(value) = value.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }

    let cookies = req.headers().get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Resolve the principal behind a request without enforcing anything.
///
/// Used by gates that treat the principal as optional (maintenance bypass,
/// locale selection). The authentication gate performs the enforcing
/// variant of this lookup.
pub fn resolve_principal<B>(
    req: &Request<B>,
    users: &UserStore,
    sessions: &SessionStore,
) -> Option<Principal> {
    let token = session_token(req)?;
    let session = sessions.get(&token)?;
    users.find(session.user_id)
}
