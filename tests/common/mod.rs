//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use academy_gateway::access::{
    AuditSink, InMemoryAuditLog, InMemoryResources, InMemorySubscriptions, ResourceType,
    Subscription,
};
use academy_gateway::auth::{Principal, SessionStore, UserStore};
use academy_gateway::config::GatewayConfig;
use academy_gateway::policy::AllowListChatPermissions;
use academy_gateway::tenant::{Academy, InMemoryDirectory};
use academy_gateway::{AppState, HttpServer, Shutdown};

/// A running gateway with handles to all of its in-memory stores.
pub struct TestEnv {
    pub addr: SocketAddr,
    pub directory: Arc<InMemoryDirectory>,
    pub users: Arc<UserStore>,
    pub sessions: Arc<SessionStore>,
    pub subscriptions: Arc<InMemorySubscriptions>,
    pub resources: Arc<InMemoryResources>,
    pub audit: Arc<InMemoryAuditLog>,
    pub chat: Arc<AllowListChatPermissions>,
    // Dropping this would shut the server down mid-test.
    _shutdown: Shutdown,
}

/// Spawn a gateway on an ephemeral port.
pub async fn spawn_gateway(config: GatewayConfig) -> TestEnv {
    spawn_gateway_with(config, None).await
}

/// Spawn a gateway with a custom audit sink.
pub async fn spawn_gateway_with(
    config: GatewayConfig,
    audit_override: Option<Arc<dyn AuditSink>>,
) -> TestEnv {
    let directory = Arc::new(InMemoryDirectory::new());
    let users = Arc::new(UserStore::new());
    let sessions = Arc::new(SessionStore::new());
    let subscriptions = Arc::new(InMemorySubscriptions::new());
    let resources = Arc::new(InMemoryResources::new());
    let audit = Arc::new(InMemoryAuditLog::new());
    let chat = Arc::new(AllowListChatPermissions::new());

    let state = AppState {
        config: Arc::new(config),
        directory: directory.clone(),
        users: users.clone(),
        sessions: sessions.clone(),
        subscriptions: subscriptions.clone(),
        resources: resources.clone(),
        audit: audit_override.unwrap_or_else(|| audit.clone()),
        chat: chat.clone(),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = HttpServer::new(state);
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    // Give the acceptor a moment to come up.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestEnv {
        addr,
        directory,
        users,
        sessions,
        subscriptions,
        resources,
        audit,
        chat,
        _shutdown: shutdown,
    }
}

impl TestEnv {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn seed_academy(&self, academy: Academy) {
        self.directory.insert(academy);
    }

    /// Insert a user and open a session for them, returning the token.
    pub fn seed_user(&self, principal: Principal) -> String {
        let id = principal.id;
        self.users.insert(principal);
        self.sessions.create(id)
    }

    pub fn seed_subscription(&self, subscription: Subscription) {
        self.subscriptions.insert(subscription);
    }

    pub fn seed_resource(&self, resource_type: ResourceType, id: u64, teacher_id: u64) {
        self.resources.insert(resource_type, id, teacher_id);
    }
}

/// Host header for a tenant on the default test base domain.
pub fn tenant_host(subdomain: &str) -> String {
    format!("{subdomain}.academy.test")
}

/// HTTP client that does not follow redirects (we assert on them).
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// Cookie header value for a session token.
pub fn session_cookie(token: &str) -> String {
    format!("gateway_session={token}")
}
