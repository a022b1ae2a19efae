//! Request helpers for router tests.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::state::test_helpers::test_app_state;

/// Router over a fresh in-memory store with no CORS origins.
pub fn test_app() -> Router {
    super::app(test_app_state(), &[])
}

/// Send one request and return the status with the parsed JSON body.
/// Empty bodies come back as `Value::Null`, plain-text responses as a
/// `Value::String`.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    match body {
        Some(json) => send_raw(app, method, uri, Some("application/json"), json.to_string()).await,
        None => send_raw(app, method, uri, None, String::new()).await,
    }
}

/// Send a request with an arbitrary body and optional content type.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: String,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }

    let response = app.clone().oneshot(builder.body(Body::from(body)).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}
