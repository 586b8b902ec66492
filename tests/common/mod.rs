#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use itinerary_api::app::{app, AppState};
use itinerary_api::auth::{issue_token, Claims, IdentityResolver};
use itinerary_api::config::SecurityConfig;
use itinerary_api::database::MemoryTripStore;
use itinerary_api::services::ContentGenerator;

pub const JWT_SECRET: &str = "integration-secret";
pub const SERVICE_KEY: &str = "integration-service-key";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryTripStore>,
}

pub fn security() -> SecurityConfig {
    SecurityConfig {
        service_key: SecretString::from(SERVICE_KEY.to_string()),
        jwt_secret: SecretString::from(JWT_SECRET.to_string()),
        jwt_audience: None,
    }
}

/// Router over a fresh in-memory store.
pub fn test_app(generator: ContentGenerator) -> TestApp {
    let store = Arc::new(MemoryTripStore::new());
    let state = AppState::new(IdentityResolver::new(&security()), store.clone(), generator);
    TestApp {
        router: app(state),
        store,
    }
}

pub fn mock_app() -> TestApp {
    test_app(ContentGenerator::mock())
}

pub fn user_bearer(user_id: &str) -> String {
    let claims = Claims::new(user_id, chrono::Duration::hours(1));
    let token = issue_token(&claims, &SecretString::from(JWT_SECRET.to_string())).expect("token");
    format!("Bearer {}", token)
}

pub fn service_bearer() -> String {
    format!("Bearer {}", SERVICE_KEY)
}

pub async fn post_json(
    router: &Router,
    uri: &str,
    authorization: Option<&str>,
    body: Value,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(auth) = authorization {
        builder = builder.header("authorization", auth);
    }
    let request = builder.body(Body::from(serde_json::to_vec(&body)?))?;
    send(router, request).await
}

pub async fn get(router: &Router, uri: &str) -> Result<(StatusCode, Value)> {
    let request = Request::builder().method("GET").uri(uri).body(Body::empty())?;
    send(router, request).await
}

async fn send(router: &Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}
