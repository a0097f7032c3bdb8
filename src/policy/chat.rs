//! Private teacher–student chat gating.
//!
//! Whether two users may chat privately is an external policy (subscription
//! links, academy settings). When disallowed, the user is redirected to the
//! tenant's group-chat listing with an error flag rather than shown an
//! error page.

use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{Path, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use dashmap::DashSet;

use crate::access::StoreError;
use crate::auth::principal::{current_principal, Principal};
use crate::http::server::AppState;

/// Path of the tenant group-chat listing, the fallback destination.
pub const GROUP_CHAT_PATH: &str = "/chat/groups";

/// External chat-permission check.
pub trait ChatPermissions: Send + Sync {
    fn can_chat(&self, principal: &Principal, target_user_id: u64) -> Result<bool, StoreError>;
}

/// In-memory allow-list of unordered user pairs.
#[derive(Default)]
pub struct AllowListChatPermissions {
    pairs: DashSet<(u64, u64)>,
}

impl AllowListChatPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(&self, a: u64, b: u64) {
        self.pairs.insert((a.min(b), a.max(b)));
    }
}

impl ChatPermissions for AllowListChatPermissions {
    fn can_chat(&self, principal: &Principal, target_user_id: u64) -> Result<bool, StoreError> {
        let key = (
            principal.id.min(target_user_id),
            principal.id.max(target_user_id),
        );
        Ok(self.pairs.contains(&key))
    }
}

/// Private chat gate middleware. Runs after the authentication gate on the
/// private-chat route.
pub async fn private_chat_gate(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(principal) = current_principal(&req) else {
        return next.run(req).await;
    };
    let Some(target) = params.get("user").and_then(|v| v.parse::<u64>().ok()) else {
        return next.run(req).await;
    };

    match state.chat.can_chat(&principal, target) {
        Ok(true) => next.run(req).await,
        Ok(false) => {
            tracing::info!(
                user_id = principal.id,
                target_user_id = target,
                "Private chat not permitted; redirecting to group chats"
            );
            chat_redirect()
        }
        Err(e) => {
            // Permission store down: fail closed, but still recover via
            // redirect instead of a hard error.
            tracing::warn!(error = %e, user_id = principal.id, "Chat permission check failed");
            chat_redirect()
        }
    }
}

fn chat_redirect() -> Response {
    Redirect::to(&format!("{GROUP_CHAT_PATH}?error=private_chat_disabled")).into_response()
}
