//! End-to-end tests for the request pipeline: tenant resolution, the
//! maintenance wall, authentication, roles and the platform policy gates.

mod common;

use axum::http::header;
use serde_json::Value;

use academy_gateway::auth::{Principal, Role};
use academy_gateway::config::GatewayConfig;
use academy_gateway::tenant::Academy;

use common::{client, session_cookie, spawn_gateway, tenant_host};

#[tokio::test]
async fn unknown_subdomain_is_rejected() {
    let env = spawn_gateway(GatewayConfig::default()).await;

    let res = client()
        .get(env.url("/"))
        .header(header::HOST, tenant_host("ghost"))
        .header(header::ACCEPT, "application/json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error_code"], "ACADEMY_NOT_FOUND");
}

#[tokio::test]
async fn inactive_academy_answers_503() {
    let env = spawn_gateway(GatewayConfig::default()).await;
    let mut academy = Academy::new(1, "alpha", "Alpha Academy");
    academy.is_active = false;
    env.seed_academy(academy);

    let res = client()
        .get(env.url("/"))
        .header(header::HOST, tenant_host("alpha"))
        .header(header::ACCEPT, "application/json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 503);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error_code"], "ACADEMY_INACTIVE");
}

#[tokio::test]
async fn bare_base_domain_falls_back_to_default_tenant() {
    let env = spawn_gateway(GatewayConfig::default()).await;
    env.seed_academy(Academy::new(1, "itqan-academy", "Itqan"));

    let res = client()
        .get(env.url("/"))
        .header(header::HOST, "academy.test")
        .header(header::ACCEPT, "application/json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["academy"], "Itqan");
}

#[tokio::test]
async fn health_endpoint_bypasses_tenant_resolution() {
    let env = spawn_gateway(GatewayConfig::default()).await;

    // No academy seeded; the bypass must answer before resolution fails.
    let res = client()
        .get(env.url("/health"))
        .header(header::HOST, tenant_host("ghost"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn maintenance_mode_walls_off_students() {
    let env = spawn_gateway(GatewayConfig::default()).await;
    let mut academy = Academy::new(1, "alpha", "Alpha Academy");
    academy.maintenance_mode = true;
    academy.settings.maintenance_message = Some("Back soon".to_string());
    env.seed_academy(academy);
    let token = env.seed_user(Principal::new(7, "Sara", Role::Student, Some(1)));

    let res = client()
        .get(env.url("/"))
        .header(header::HOST, tenant_host("alpha"))
        .header(header::ACCEPT, "application/json")
        .header(header::COOKIE, session_cookie(&token))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 503);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Back soon");
}

#[tokio::test]
async fn maintenance_mode_excludes_login_and_admins() {
    let env = spawn_gateway(GatewayConfig::default()).await;
    let mut academy = Academy::new(1, "alpha", "Alpha Academy");
    academy.maintenance_mode = true;
    env.seed_academy(academy);
    let admin_token = env.seed_user(Principal::new(2, "Omar", Role::Admin, Some(1)));

    // The login page stays reachable so people can still sign in.
    let res = client()
        .get(env.url("/login"))
        .header(header::HOST, tenant_host("alpha"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    // Admins pass the wall entirely.
    let res = client()
        .get(env.url("/"))
        .header(header::HOST, tenant_host("alpha"))
        .header(header::ACCEPT, "application/json")
        .header(header::COOKIE, session_cookie(&admin_token))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn unauthenticated_browser_is_redirected_to_tenant_login() {
    let env = spawn_gateway(GatewayConfig::default()).await;
    env.seed_academy(Academy::new(1, "alpha", "Alpha Academy"));

    let res = client()
        .get(env.url("/profile"))
        .header(header::HOST, tenant_host("alpha"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 307);
    let location = res.headers()[header::LOCATION].to_str().unwrap();
    assert_eq!(location, "https://alpha.academy.test/login");
}

#[tokio::test]
async fn unauthenticated_api_client_gets_401_json() {
    let env = spawn_gateway(GatewayConfig::default()).await;
    env.seed_academy(Academy::new(1, "alpha", "Alpha Academy"));

    let res = client()
        .get(env.url("/profile"))
        .header(header::HOST, tenant_host("alpha"))
        .header(header::ACCEPT, "application/json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error_code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn deactivated_account_is_forcibly_logged_out() {
    let env = spawn_gateway(GatewayConfig::default()).await;
    env.seed_academy(Academy::new(1, "alpha", "Alpha Academy"));
    let mut user = Principal::new(7, "Sara", Role::Student, Some(1));
    user.active = false;
    let token = env.seed_user(user);

    let res = client()
        .get(env.url("/profile"))
        .header(header::HOST, tenant_host("alpha"))
        .header(header::ACCEPT, "application/json")
        .header(header::COOKIE, session_cookie(&token))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error_code"], "ACCOUNT_INACTIVE");

    // The session is gone; replaying the token is plain unauthenticated.
    assert!(env.sessions.get(&token).is_none());
}

#[tokio::test]
async fn role_gate_enforces_the_allow_list() {
    let env = spawn_gateway(GatewayConfig::default()).await;
    env.seed_academy(Academy::new(1, "alpha", "Alpha Academy"));
    let student = env.seed_user(Principal::new(7, "Sara", Role::Student, Some(1)));
    let admin = env.seed_user(Principal::new(2, "Omar", Role::Admin, Some(1)));

    let res = client()
        .get(env.url("/dashboard"))
        .header(header::HOST, tenant_host("alpha"))
        .header(header::ACCEPT, "application/json")
        .header(header::COOKIE, session_cookie(&student))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error_code"], "FORBIDDEN");

    let res = client()
        .get(env.url("/dashboard"))
        .header(header::HOST, tenant_host("alpha"))
        .header(header::ACCEPT, "application/json")
        .header(header::COOKIE, session_cookie(&admin))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn locale_resolution_follows_the_priority_chain() {
    let env = spawn_gateway(GatewayConfig::default()).await;
    env.seed_academy(Academy::new(1, "alpha", "Alpha Academy"));

    let mut user = Principal::new(7, "Sara", Role::Student, Some(1));
    user.preferred_locale = Some("en".to_string());
    let token = env.seed_user(user);

    let get = |path: String, token: String| {
        client()
            .get(env.url(&path))
            .header(header::HOST, tenant_host("alpha"))
            .header(header::ACCEPT, "application/json")
            .header(header::COOKIE, session_cookie(&token))
            .send()
    };

    // Stored user preference beats the platform default.
    get("/profile".to_string(), token.clone()).await.unwrap();
    assert_eq!(env.sessions.locale(&token).as_deref(), Some("en"));

    // A session-stored locale beats the user preference.
    env.sessions.set_locale(&token, "ar");
    get("/profile".to_string(), token.clone()).await.unwrap();
    assert_eq!(env.sessions.locale(&token).as_deref(), Some("ar"));

    // An explicit query parameter beats everything and is persisted.
    get("/profile?lang=en".to_string(), token.clone())
        .await
        .unwrap();
    assert_eq!(env.sessions.locale(&token).as_deref(), Some("en"));

    // Unsupported values are ignored, falling through to the session.
    get("/profile?lang=fr".to_string(), token.clone())
        .await
        .unwrap();
    assert_eq!(env.sessions.locale(&token).as_deref(), Some("en"));

    // Without any signal a fresh session lands on the default.
    let anonymous = env.seed_user(Principal::new(8, "Adam", Role::Student, Some(1)));
    get("/profile".to_string(), anonymous.clone()).await.unwrap();
    assert_eq!(env.sessions.locale(&anonymous).as_deref(), Some("ar"));
}

#[tokio::test]
async fn mobile_clients_cannot_initiate_payments() {
    let env = spawn_gateway(GatewayConfig::default()).await;
    env.seed_academy(Academy::new(1, "alpha", "Alpha Academy"));

    // Reading payment pages from mobile is fine.
    let res = client()
        .get(env.url("/payments/checkout"))
        .header(header::HOST, tenant_host("alpha"))
        .header(header::USER_AGENT, "okhttp/4.9.0")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    // Initiating one is not.
    let res = client()
        .post(env.url("/payments/checkout"))
        .header(header::HOST, tenant_host("alpha"))
        .header(header::USER_AGENT, "okhttp/4.9.0")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error_code"], "MOBILE_PAYMENT_BLOCKED");
    let web_url = body["web_url"].as_str().unwrap();
    assert!(web_url.contains("alpha.academy.test"), "{web_url}");

    // Desktop browsers are unaffected.
    let res = client()
        .post(env.url("/payments/checkout"))
        .header(header::HOST, tenant_host("alpha"))
        .header(header::USER_AGENT, "Mozilla/5.0")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn parents_are_view_only() {
    let env = spawn_gateway(GatewayConfig::default()).await;
    env.seed_academy(Academy::new(1, "alpha", "Alpha Academy"));
    let parent = env.seed_user(Principal::new(3, "Huda", Role::Parent, Some(1)));
    let student = env.seed_user(Principal::new(7, "Sara", Role::Student, Some(1)));

    let res = client()
        .delete(env.url("/profile"))
        .header(header::HOST, tenant_host("alpha"))
        .header(header::ACCEPT, "application/json")
        .header(header::COOKIE, session_cookie(&parent))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error_code"], "PARENT_VIEW_ONLY");

    // POST stays allowed for parents (search-style forms use it).
    let res = client()
        .post(env.url("/profile"))
        .header(header::HOST, tenant_host("alpha"))
        .header(header::ACCEPT, "application/json")
        .header(header::COOKIE, session_cookie(&parent))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    // Other roles keep their mutating verbs.
    let res = client()
        .delete(env.url("/profile"))
        .header(header::HOST, tenant_host("alpha"))
        .header(header::ACCEPT, "application/json")
        .header(header::COOKIE, session_cookie(&student))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn private_chat_requires_permission() {
    let env = spawn_gateway(GatewayConfig::default()).await;
    env.seed_academy(Academy::new(1, "alpha", "Alpha Academy"));
    let student = env.seed_user(Principal::new(7, "Sara", Role::Student, Some(1)));
    env.chat.allow(7, 9);

    let res = client()
        .get(env.url("/chat/private/9"))
        .header(header::HOST, tenant_host("alpha"))
        .header(header::ACCEPT, "application/json")
        .header(header::COOKIE, session_cookie(&student))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = client()
        .get(env.url("/chat/private/10"))
        .header(header::HOST, tenant_host("alpha"))
        .header(header::COOKIE, session_cookie(&student))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 303);
    assert_eq!(
        res.headers()[header::LOCATION].to_str().unwrap(),
        "/chat/groups?error=private_chat_disabled"
    );
}

#[tokio::test]
async fn html_responses_carry_security_headers() {
    let env = spawn_gateway(GatewayConfig::default()).await;
    env.seed_academy(Academy::new(1, "alpha", "Alpha Academy"));

    let res = client()
        .get(env.url("/login"))
        .header(header::HOST, tenant_host("alpha"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let csp = res.headers()["content-security-policy"].to_str().unwrap();
    assert!(csp.contains("default-src"), "{csp}");
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");
    assert_eq!(res.headers()["x-frame-options"], "DENY");

    // JSON responses are left alone.
    let res = client()
        .get(env.url("/"))
        .header(header::HOST, tenant_host("alpha"))
        .header(header::ACCEPT, "application/json")
        .send()
        .await
        .unwrap();
    assert!(res.headers().get("content-security-policy").is_none());
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let env = spawn_gateway(GatewayConfig::default()).await;
    env.seed_academy(Academy::new(1, "alpha", "Alpha Academy"));

    let res = client()
        .get(env.url("/"))
        .header(header::HOST, tenant_host("alpha"))
        .send()
        .await
        .unwrap();

    assert!(res.headers().contains_key("x-request-id"));
}
