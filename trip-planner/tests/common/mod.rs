//! Shared helpers for router-level tests.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use service_core::retry::RetryConfig;
use std::sync::Arc;
use tower::util::ServiceExt;
use trip_planner::config::ModelConfig;
use trip_planner::services::providers::mock::MockCompletionProvider;
use trip_planner::services::PlanService;
use trip_planner::startup::build_router;
use trip_planner::AppState;

pub fn models() -> ModelConfig {
    ModelConfig {
        text_model: "gpt-4-turbo".to_string(),
        temperature: 0.7,
    }
}

pub fn app_with(provider: Arc<MockCompletionProvider>) -> Router {
    let planner = PlanService::new(provider, &models(), RetryConfig::no_retry());
    build_router(AppState::new(Arc::new(planner)))
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("body is utf-8")
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).expect("body is JSON")
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_form(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let body = serde_urlencoded::to_string(fields).expect("Failed to encode form");
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub fn post_multipart(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let boundary = "----trip-planner-test-boundary";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn full_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("destination", "Paris"),
        ("duration", "3"),
        ("budget", "moderate"),
        ("interests", "art, food"),
        ("travelStyle", "cultural"),
    ]
}

pub fn without(field: &str) -> Vec<(&'static str, &'static str)> {
    full_fields()
        .into_iter()
        .filter(|(name, _)| *name != field)
        .collect()
}

pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}
