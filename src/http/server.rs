//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the full gate pipeline
//! - Wire up middleware in the mandated order:
//!   resolver → maintenance → auth → roles → subscription → policy gates
//! - Bind the server to a listener with graceful shutdown
//!
//! The route handlers here are thin stand-ins for the real application;
//! every interesting decision happens in the middleware stack.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::access::audit::AuditSink;
use crate::access::gate::{subscription_gate, GrantedSubscription, SubscriptionGate};
use crate::access::resource::{InMemoryResources, ResourceStore, ResourceType};
use crate::access::subscription::{InMemorySubscriptions, SubscriptionStore};
use crate::access::InMemoryAuditLog;
use crate::auth::gate::{require_auth, role_gate, RoleGateState};
use crate::auth::principal::current_principal;
use crate::auth::role::Role;
use crate::auth::session::{SessionStore, UserStore};
use crate::config::GatewayConfig;
use crate::observability::metrics;
use crate::policy::chat::{private_chat_gate, AllowListChatPermissions, ChatPermissions};
use crate::policy::headers::security_headers;
use crate::policy::locale::select_locale;
use crate::policy::mobile_payment::mobile_payment_blocker;
use crate::policy::parent_read_only;
use crate::tenant::context::current_tenant;
use crate::tenant::directory::{AcademyDirectory, InMemoryDirectory};
use crate::tenant::maintenance::maintenance_gate;
use crate::tenant::resolver::resolve_tenant;

/// Application state injected into handlers and gates.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub directory: Arc<dyn AcademyDirectory>,
    pub users: Arc<UserStore>,
    pub sessions: Arc<SessionStore>,
    pub subscriptions: Arc<dyn SubscriptionStore>,
    pub resources: Arc<dyn ResourceStore>,
    pub audit: Arc<dyn AuditSink>,
    pub chat: Arc<dyn ChatPermissions>,
}

impl AppState {
    /// State backed entirely by in-memory stores (tests, local runs).
    pub fn in_memory(config: GatewayConfig) -> Self {
        Self {
            config: Arc::new(config),
            directory: Arc::new(InMemoryDirectory::new()),
            users: Arc::new(UserStore::new()),
            sessions: Arc::new(SessionStore::new()),
            subscriptions: Arc::new(InMemorySubscriptions::new()),
            resources: Arc::new(InMemoryResources::new()),
            audit: Arc::new(InMemoryAuditLog::new()),
            chat: Arc::new(AllowListChatPermissions::new()),
        }
    }
}

/// HTTP server for the tenant gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server over the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        let router = Self::build_router(state, &config);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState, config: &GatewayConfig) -> Router {
        // Role-gated admin and teacher surfaces.
        let admin = Router::new()
            .route("/dashboard", get(dashboard))
            .route_layer(middleware::from_fn_with_state(
                RoleGateState::new(
                    state.clone(),
                    vec![Role::SuperAdmin, Role::Admin, Role::Supervisor],
                ),
                role_gate,
            ));
        let teacher = Router::new()
            .route("/teacher/schedule", get(teacher_schedule))
            .route_layer(middleware::from_fn_with_state(
                RoleGateState::new(state.clone(), vec![Role::QuranTeacher, Role::AcademicTeacher]),
                role_gate,
            ));

        // Subscription-gated content surfaces, one gate per resource type.
        let content = Router::new()
            .merge(gated_route(
                "/quran/sessions/{session}",
                get(session_detail),
                &state,
                ResourceType::QuranSession,
            ))
            .merge(gated_route(
                "/api/quran/sessions/{session}",
                get(session_detail),
                &state,
                ResourceType::QuranSession,
            ))
            .merge(gated_route(
                "/academic/sessions/{session}",
                get(session_detail),
                &state,
                ResourceType::AcademicSession,
            ))
            .merge(gated_route(
                "/courses/interactive/{course}",
                get(course_detail),
                &state,
                ResourceType::InteractiveCourse,
            ))
            .merge(gated_route(
                "/courses/recorded/{course}",
                get(course_detail),
                &state,
                ResourceType::RecordedCourse,
            ))
            .merge(gated_route(
                "/courses/{course}",
                get(course_detail),
                &state,
                ResourceType::Course,
            ))
            .merge(gated_route(
                "/courses/{course}/lessons/{lesson}",
                get(course_detail),
                &state,
                ResourceType::Course,
            ));

        let chat = Router::new()
            .route("/chat/private/{user}", get(private_chat))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                private_chat_gate,
            ))
            .route("/chat/groups", get(group_chats));

        let protected = Router::new()
            .merge(admin)
            .merge(teacher)
            .merge(content)
            .merge(chat)
            .route(
                "/profile",
                get(profile).post(profile_search).delete(profile_delete),
            )
            .layer(middleware::from_fn_with_state(
                state.clone(),
                parent_read_only,
            ))
            .layer(middleware::from_fn_with_state(state.clone(), require_auth));

        let public = Router::new()
            .route("/", get(home))
            .route("/health", get(health))
            .route("/login", get(login_page))
            .route("/maintenance", get(maintenance_page))
            .route("/payments/checkout", get(checkout_page).post(start_checkout))
            .route("/payments/history", get(payment_history));

        Router::new()
            .merge(public)
            .merge(protected)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    )))
                    .layer(middleware::from_fn(track_requests))
                    .layer(middleware::from_fn_with_state(
                        state.clone(),
                        security_headers,
                    ))
                    .layer(middleware::from_fn_with_state(state.clone(), resolve_tenant))
                    .layer(middleware::from_fn_with_state(
                        state.clone(),
                        maintenance_gate,
                    ))
                    .layer(middleware::from_fn_with_state(state.clone(), select_locale))
                    .layer(middleware::from_fn_with_state(
                        state.clone(),
                        mobile_payment_blocker,
                    )),
            )
            .with_state(state)
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_domain = %self.config.domain.base_domain,
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// One content route wrapped in its subscription gate.
fn gated_route(
    path: &str,
    handler: axum::routing::MethodRouter<AppState>,
    state: &AppState,
    resource_type: ResourceType,
) -> Router<AppState> {
    Router::new().route(path, handler).route_layer(
        middleware::from_fn_with_state(
            SubscriptionGate::new(state.clone(), resource_type),
            subscription_gate,
        ),
    )
}

/// Request counter middleware.
async fn track_requests(req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let response = next.run(req).await;
    metrics::record_request(&method, response.status().as_u16());
    response
}

// --- Handlers (application stand-ins) ---

async fn health() -> &'static str {
    "ok"
}

async fn home(req: Request<Body>) -> Response {
    let academy = current_tenant(&req).map(|t| t.academy().name.clone());
    Json(json!({ "academy": academy })).into_response()
}

async fn login_page() -> Html<&'static str> {
    Html("<!DOCTYPE html>\n<html><body><h1>Sign in</h1></body></html>")
}

async fn maintenance_page(State(state): State<AppState>, req: Request<Body>) -> Response {
    match current_tenant(&req) {
        Some(tenant) if tenant.academy().maintenance_mode => {
            let message = tenant
                .academy()
                .settings
                .maintenance_message
                .clone()
                .unwrap_or_else(|| state.config.maintenance.default_message.clone());
            crate::http::response::maintenance_page(&message)
        }
        _ => Redirect::to("/").into_response(),
    }
}

async fn dashboard(req: Request<Body>) -> Response {
    let name = current_principal(&req).map(|p| p.name.clone());
    Json(json!({ "dashboard": "admin", "user": name })).into_response()
}

async fn teacher_schedule(req: Request<Body>) -> Response {
    let name = current_principal(&req).map(|p| p.name.clone());
    Json(json!({ "schedule": [], "teacher": name })).into_response()
}

async fn profile(req: Request<Body>) -> Response {
    let name = current_principal(&req).map(|p| p.name.clone());
    Json(json!({ "profile": name })).into_response()
}

async fn profile_search() -> Response {
    Json(json!({ "results": [] })).into_response()
}

async fn profile_delete() -> Response {
    (StatusCode::OK, Json(json!({ "deleted": true }))).into_response()
}

async fn session_detail(req: Request<Body>) -> Response {
    let subscription_id = req
        .extensions()
        .get::<GrantedSubscription>()
        .map(|s| s.0.id);
    Json(json!({ "status": "ok", "subscription_id": subscription_id })).into_response()
}

async fn course_detail(req: Request<Body>) -> Response {
    let subscription_id = req
        .extensions()
        .get::<GrantedSubscription>()
        .map(|s| s.0.id);
    Json(json!({ "status": "ok", "subscription_id": subscription_id })).into_response()
}

async fn checkout_page() -> Response {
    Json(json!({ "checkout": "form" })).into_response()
}

async fn start_checkout() -> Response {
    // The real handler hands off to a payment gateway; out of scope here.
    Json(json!({ "checkout": "started" })).into_response()
}

async fn payment_history() -> Response {
    Json(json!({ "payments": [] })).into_response()
}

async fn private_chat(Path(user): Path<u64>, req: Request<Body>) -> Response {
    let name = current_principal(&req).map(|p| p.name.clone());
    Json(json!({ "chat_with": user, "user": name })).into_response()
}

async fn group_chats() -> Response {
    Json(json!({ "groups": [] })).into_response()
}
