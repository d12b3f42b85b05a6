#![allow(dead_code)]

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use serde_json::{json, Value};
use studybud::{app, store, AppState, Config};

pub const PASSWORD: &str = "Secr3t!";

/// A server over a fresh in-memory database, with cheap password hashing.
pub async fn server() -> TestServer {
    let config = Config {
        bcrypt_cost: 4,
        ..Config::default()
    };
    let db_pool = store::memory().await.unwrap();
    TestServer::new(app(AppState::new(db_pool, &config), &config)).unwrap()
}

pub async fn register(server: &TestServer, username: &str) -> Value {
    let response = server
        .post("/api/register")
        .json(&json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": PASSWORD,
            "confirm_password": PASSWORD,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json()
}

/// Registers `username` and returns its access and refresh tokens.
pub async fn login(server: &TestServer, username: &str) -> (String, String) {
    register(server, username).await;
    let body: Value = server
        .post("/api/login")
        .json(&json!({ "username": username, "password": PASSWORD }))
        .await
        .json();
    (
        body["tokens"]["access"].as_str().unwrap().to_owned(),
        body["tokens"]["refresh"].as_str().unwrap().to_owned(),
    )
}

pub trait Bearer {
    fn bearer(self, token: &str) -> Self;
}

impl Bearer for TestRequest {
    fn bearer(self, token: &str) -> Self {
        self.add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        )
    }
}
