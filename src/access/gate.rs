//! Resource subscription gate.
//!
//! The content-access decision: for a route declared to serve a resource
//! type, find the subscription backing the requested resource and allow or
//! deny per its state. Every decision writes one audit row.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::access::audit::{
    record_best_effort, AccessLogEntry, AuditAction, AuditMetadata,
};
use crate::access::resource::ResourceType;
use crate::access::subscription::{PaymentStatus, Subscription, SubscriptionStatus};
use crate::auth::principal::current_principal;
use crate::http::messages;
use crate::http::request::{client_ip, detect_platform, user_agent, Platform};
use crate::http::response::{html_error, wants_json};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::policy::locale::request_locale;
use crate::tenant::context::current_tenant;
use crate::tenant::resolver::tenant_url;

/// Route parameter names that may carry the resource id, in priority order.
pub const RESOURCE_PARAMS: [&str; 6] = ["id", "session", "course", "lesson", "circle", "subscription"];

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    MissingAuthOrResource,
    NoSubscription,
    PaymentRequired,
    SubscriptionPaused,
    SubscriptionCancelled,
    SubscriptionInactive,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::MissingAuthOrResource => "missing_auth_or_resource",
            DenyReason::NoSubscription => "no_subscription",
            DenyReason::PaymentRequired => "payment_required",
            DenyReason::SubscriptionPaused => "subscription_paused",
            DenyReason::SubscriptionCancelled => "subscription_cancelled",
            DenyReason::SubscriptionInactive => "subscription_inactive",
        }
    }
}

/// Classify a failed `can_access` check, highest-priority reason first.
pub fn classify_denial(subscription: &Subscription) -> DenyReason {
    if subscription.payment_status != PaymentStatus::Paid {
        DenyReason::PaymentRequired
    } else if subscription.status == SubscriptionStatus::Paused {
        DenyReason::SubscriptionPaused
    } else if subscription.status == SubscriptionStatus::Cancelled {
        DenyReason::SubscriptionCancelled
    } else {
        DenyReason::SubscriptionInactive
    }
}

/// Request extension carrying the granted subscription for the handler.
#[derive(Debug, Clone)]
pub struct GrantedSubscription(pub Arc<Subscription>);

/// Per-route state for the subscription gate.
#[derive(Clone)]
pub struct SubscriptionGate {
    pub app: AppState,
    pub resource_type: ResourceType,
}

impl SubscriptionGate {
    pub fn new(app: AppState, resource_type: ResourceType) -> Self {
        Self { app, resource_type }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Subscription gate middleware. Runs after the authentication gate on
/// content-access routes.
pub async fn subscription_gate(
    State(gate): State<SubscriptionGate>,
    Path(params): Path<HashMap<String, String>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let resource_type = gate.resource_type;
    let platform = detect_platform(&req);
    let tenant = current_tenant(&req);
    let tenant_id = tenant.as_ref().map(|t| t.academy().id);
    let principal = current_principal(&req);
    let resource_id = RESOURCE_PARAMS
        .iter()
        .find_map(|name| params.get(*name))
        .and_then(|raw| raw.parse::<u64>().ok());

    let metadata = AuditMetadata {
        user_agent: user_agent(&req),
        ip: client_ip(&req),
        reason: None,
    };

    let (principal, resource_id) = match (principal, resource_id) {
        (Some(p), Some(r)) => (p, r),
        (principal, resource_id) => {
            return deny(
                &gate,
                &req,
                DenyReason::MissingAuthOrResource,
                Denied {
                    tenant_id,
                    user_id: principal.map(|p| p.id),
                    platform,
                    resource_id,
                    subscription: None,
                    metadata,
                },
            );
        }
    };

    // Resource-specific lookup: the owning teacher is the join key to the
    // student's subscriptions.
    let kind = resource_type.subscription_kind();
    let teacher_id = match gate.app.resources.teacher_of(resource_type, resource_id) {
        Ok(Some(teacher_id)) => Some(teacher_id),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(
                error = %e,
                resource_type = resource_type.as_str(),
                resource_id,
                "Resource lookup failed; denying access"
            );
            None
        }
    };

    let subscription = match teacher_id {
        Some(teacher_id) => {
            match gate
                .app
                .subscriptions
                .find_latest(kind, principal.id, teacher_id)
            {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        user_id = principal.id,
                        teacher_id,
                        "Subscription lookup failed; denying access"
                    );
                    None
                }
            }
        }
        None => None,
    };

    let Some(subscription) = subscription else {
        return deny(
            &gate,
            &req,
            DenyReason::NoSubscription,
            Denied {
                tenant_id,
                user_id: Some(principal.id),
                platform,
                resource_id: Some(resource_id),
                subscription: None,
                metadata,
            },
        );
    };

    if !subscription.can_access() {
        let reason = classify_denial(&subscription);
        return deny(
            &gate,
            &req,
            reason,
            Denied {
                tenant_id,
                user_id: Some(principal.id),
                platform,
                resource_id: Some(resource_id),
                subscription: Some(&subscription),
                metadata,
            },
        );
    }

    // Last-accessed bookkeeping is best-effort; a store hiccup must not
    // block a valid access.
    if let Err(e) =
        gate.app
            .subscriptions
            .record_access(kind, subscription.id, platform, unix_now())
    {
        tracing::warn!(error = %e, subscription_id = subscription.id, "Failed to update last access");
    }

    record_best_effort(
        gate.app.audit.as_ref(),
        AccessLogEntry {
            tenant_id,
            subscription_kind: Some(subscription.kind),
            subscription_id: Some(subscription.id),
            user_id: Some(principal.id),
            platform,
            action: AuditAction::AccessGranted,
            resource_type,
            resource_id: Some(resource_id),
            metadata,
        },
    );
    metrics::record_access_decision("access_granted", "granted");
    tracing::debug!(
        user_id = principal.id,
        subscription_id = subscription.id,
        resource_type = resource_type.as_str(),
        resource_id,
        "Content access granted"
    );

    req.extensions_mut()
        .insert(GrantedSubscription(Arc::new(subscription)));
    next.run(req).await
}

struct Denied<'a> {
    tenant_id: Option<u64>,
    user_id: Option<u64>,
    platform: Platform,
    resource_id: Option<u64>,
    subscription: Option<&'a Subscription>,
    metadata: AuditMetadata,
}

fn deny(gate: &SubscriptionGate, req: &Request<Body>, reason: DenyReason, denied: Denied<'_>) -> Response {
    let mut metadata = denied.metadata;
    metadata.reason = Some(reason.as_str().to_string());

    record_best_effort(
        gate.app.audit.as_ref(),
        AccessLogEntry {
            tenant_id: denied.tenant_id,
            subscription_kind: denied.subscription.map(|s| s.kind),
            subscription_id: denied.subscription.map(|s| s.id),
            user_id: denied.user_id,
            platform: denied.platform,
            action: AuditAction::AccessDenied,
            resource_type: gate.resource_type,
            resource_id: denied.resource_id,
            metadata,
        },
    );
    metrics::record_access_decision("access_denied", reason.as_str());
    tracing::info!(
        user_id = denied.user_id,
        resource_type = gate.resource_type.as_str(),
        resource_id = denied.resource_id,
        reason = reason.as_str(),
        "Content access denied"
    );

    if wants_json(req.headers()) {
        let config = &gate.app.config;
        let subdomain = current_tenant(req)
            .map(|t| t.academy().subdomain.clone())
            .unwrap_or_else(|| config.domain.default_tenant.clone());
        let web_url = tenant_url(
            &config.domain,
            &subdomain,
            &config.payments.web_purchase_path,
        );
        (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error_code": "ACCESS_DENIED",
                "reason": reason.as_str(),
                "web_url": web_url,
            })),
        )
            .into_response()
    } else {
        let locale = request_locale(req, &gate.app.config.locale.default);
        html_error(
            StatusCode::FORBIDDEN,
            messages::localize(&locale, messages::ACCESS_DENIED_EN, messages::ACCESS_DENIED_AR),
        )
    }
}
