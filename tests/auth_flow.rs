//! Auth service lifecycle over HTTP: register, login, validate.

use std::sync::Arc;

use chrono::Utc;
use ordergate::auth::token::{self, TOKEN_TTL_SECS};
use ordergate::auth::AuthState;
use serde_json::json;

const SECRET: &str = "test-secret";

async fn spawn_auth() -> (Arc<AuthState>, String) {
    let state = Arc::new(AuthState::new(SECRET));
    let app = ordergate::auth::router(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (state, format!("http://{}", addr))
}

async fn register(client: &reqwest::Client, base: &str, email: &str, pw: &str, name: &str) -> reqwest::Response {
    client
        .post(format!("{}/register", base))
        .json(&json!({"email": email, "password": pw, "name": name}))
        .send()
        .await
        .unwrap()
}

async fn login(client: &reqwest::Client, base: &str, email: &str, pw: &str) -> reqwest::Response {
    client
        .post(format!("{}/login", base))
        .json(&json!({"email": email, "password": pw}))
        .send()
        .await
        .unwrap()
}

async fn validate(client: &reqwest::Client, base: &str, token: &str) -> reqwest::Response {
    client
        .post(format!("{}/validate", base))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn register_login_validate_round_trip() {
    let (_, base) = spawn_auth().await;
    let client = reqwest::Client::new();

    let resp = register(&client, &base, "a@x.com", "pw", "A").await;
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    let user_id = body["userId"].as_i64().unwrap();
    assert_eq!(body["message"], "User created successfully");

    let resp = login(&client, &base, "a@x.com", "pw").await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["id"], user_id);
    assert_eq!(body["user"]["name"], "A");
    // the hash must never appear in any response
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());

    let resp = validate(&client, &base, &token).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["valid"], true);
    assert_eq!(body["user"]["userId"], user_id);
    assert_eq!(body["user"]["email"], "a@x.com");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let (_, base) = spawn_auth().await;
    let client = reqwest::Client::new();

    assert_eq!(register(&client, &base, "a@x.com", "pw", "A").await.status(), 201);

    let resp = register(&client, &base, "a@x.com", "pw2", "A2").await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "duplicate_identity");
}

#[tokio::test]
async fn concurrent_registrations_of_one_email_create_one_user() {
    let (state, base) = spawn_auth().await;
    let client = reqwest::Client::new();

    let mut handles = Vec::new();
    for i in 0..8 {
        let client = client.clone();
        let base = base.clone();
        handles.push(tokio::spawn(async move {
            register(&client, &base, "dup@x.com", "pw", &format!("N{}", i))
                .await
                .status()
                .as_u16()
        }));
    }

    let mut created = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            201 => created += 1,
            400 => rejected += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    // exactly one winner; email stays unique in the store
    assert_eq!(created, 1);
    assert_eq!(rejected, 7);
    assert_eq!(state.users.filter(|u| u.email == "dup@x.com").len(), 1);
}

#[tokio::test]
async fn register_requires_email_and_password() {
    let (_, base) = spawn_auth().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/register", base))
        .json(&json!({"email": "a@x.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "invalid_input");
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
    let (_, base) = spawn_auth().await;
    let client = reqwest::Client::new();
    register(&client, &base, "a@x.com", "pw", "A").await;

    let wrong_pw = login(&client, &base, "a@x.com", "wrong").await;
    assert_eq!(wrong_pw.status(), 401);
    let wrong_pw_body: serde_json::Value = wrong_pw.json().await.unwrap();

    let unknown = login(&client, &base, "nobody@x.com", "pw").await;
    assert_eq!(unknown.status(), 401);
    let unknown_body: serde_json::Value = unknown.json().await.unwrap();

    // identical bodies: no existence leakage
    assert_eq!(wrong_pw_body, unknown_body);
    assert_eq!(wrong_pw_body["error"]["code"], "invalid_credentials");
}

#[tokio::test]
async fn expired_token_fails_validation() {
    let (state, base) = spawn_auth().await;
    let client = reqwest::Client::new();
    register(&client, &base, "a@x.com", "pw", "A").await;
    let user = state.users.find(|u| u.email == "a@x.com").unwrap();

    // well past expiry plus the verifier's default leeway
    let iat = Utc::now().timestamp() - TOKEN_TTL_SECS - 300;
    let expired = token::issue_at(user.id, &user.email, iat, SECRET).unwrap();

    let resp = validate(&client, &base, &expired).await;
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "invalid_token");
}

#[tokio::test]
async fn tampered_token_fails_validation() {
    let (_, base) = spawn_auth().await;
    let client = reqwest::Client::new();
    register(&client, &base, "a@x.com", "pw", "A").await;
    let resp = login(&client, &base, "a@x.com", "pw").await;
    let body: serde_json::Value = resp.json().await.unwrap();
    let token = body["token"].as_str().unwrap();

    // re-sign with a different secret: signature check must fail
    let forged = token::issue(1, "a@x.com", "other-secret").unwrap();
    assert_ne!(forged, token);
    let resp = validate(&client, &base, &forged).await;
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "invalid_token");
}

#[tokio::test]
async fn token_for_deleted_user_is_rejected_at_validation() {
    let (state, base) = spawn_auth().await;
    let client = reqwest::Client::new();
    register(&client, &base, "gone@x.com", "pw", "G").await;
    let resp = login(&client, &base, "gone@x.com", "pw").await;
    let body: serde_json::Value = resp.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    let user = state.users.find(|u| u.email == "gone@x.com").unwrap();
    state.users.remove(user.id).unwrap();

    // cryptographically still valid, but the identity is gone
    let resp = validate(&client, &base, &token).await;
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "identity_not_found");
}

#[tokio::test]
async fn validate_without_authorization_header_fails() {
    let (_, base) = spawn_auth().await;
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}/validate", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn health_reports_running() {
    let (_, base) = spawn_auth().await;
    let resp = reqwest::get(format!("{}/health", base)).await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "Auth Service is running");
}
