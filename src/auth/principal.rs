//! Authenticated principal.

use std::sync::Arc;

use axum::http::Request;
use serde::{Deserialize, Serialize};

use crate::auth::role::Role;

/// The authenticated user making a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: u64,
    pub name: String,
    pub role: Role,

    /// Inactive principals are forcibly logged out on any gated request.
    pub active: bool,

    /// Tenant affinity. `None` only for super admins.
    pub academy_id: Option<u64>,

    /// Stored locale preference, consulted by the locale selector.
    pub preferred_locale: Option<String>,
}

impl Principal {
    pub fn new(id: u64, name: impl Into<String>, role: Role, academy_id: Option<u64>) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            active: true,
            academy_id,
            preferred_locale: None,
        }
    }
}

/// Request extension carrying the authenticated principal.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Arc<Principal>);

/// Read the principal attached by the authentication gate, if any.
pub fn current_principal<B>(req: &Request<B>) -> Option<Arc<Principal>> {
    req.extensions().get::<CurrentPrincipal>().map(|p| p.0.clone())
}
