#![allow(dead_code)]

use admin_service::config::config_from_lookup;
use admin_service::users::{hash_password, UserDirectory, UserRecord};
use admin_service::{build_router, AppState};
use anyhow::Result;
use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::HashMap;

pub const SIGNING_KEY: &str = "integration-signing-key-0123456789";
pub const COOKIE_NAME: &str = "portal_session";
pub const PASSWORD: &str = "correct horse battery staple";

pub struct TestPortal {
    pub state: AppState,
    pub app: Router,
}

pub fn portal() -> Result<TestPortal> {
    let env: HashMap<&str, &str> = HashMap::from([
        ("JWT_SIGNING_KEY", SIGNING_KEY),
        ("JWT_ISSUER", "test-issuer"),
        ("JWT_AUDIENCE", "test-audience"),
        ("JWT_ACCESS_TTL_SECONDS", "300"),
        ("SESSION_COOKIE_NAME", COOKIE_NAME),
    ]);
    let config = config_from_lookup(|key| env.get(key).map(|value| value.to_string()))?;

    let hash = hash_password(PASSWORD)?;
    let users = UserDirectory::from_records([
        user("root", &hash, &["Admins", "SuperUsers"]),
        user("ops", &hash, &["Admins"]),
        user("guest", &hash, &[]),
    ])?;

    let state = AppState::from_config(&config, users)?;
    let app = build_router(state.clone());
    Ok(TestPortal { state, app })
}

fn user(username: &str, hash: &str, groups: &[&str]) -> UserRecord {
    UserRecord {
        username: username.to_string(),
        password_hash: hash.to_string(),
        groups: groups.iter().map(|g| g.to_string()).collect(),
    }
}

pub fn login_request(username: &str, password: &str) -> Result<Request<Body>> {
    let body = serde_json::json!({ "username": username, "password": password }).to_string();
    Ok(Request::builder()
        .method("POST")
        .uri("/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))?)
}

pub async fn json_body(response: Response) -> Result<Value> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}

pub async fn text_body(response: Response) -> Result<String> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(String::from_utf8(bytes.to_vec())?)
}
