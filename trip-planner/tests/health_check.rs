//! Probe, metrics and middleware tests.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{app_with, body_json, body_text, send};
use reqwest::Client;
use service_core::config::Config;
use std::sync::Arc;
use std::time::Duration;
use trip_planner::config::PlannerConfig;
use trip_planner::services::metrics::init_metrics;
use trip_planner::services::providers::mock::MockCompletionProvider;
use trip_planner::startup::Application;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_check_returns_ok() {
    let app = app_with(Arc::new(MockCompletionProvider::replying("")));

    let response = send(app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "trip-planner");
}

#[tokio::test]
async fn readiness_follows_provider_health() {
    let ready = app_with(Arc::new(MockCompletionProvider::replying("")));
    assert_eq!(send(ready, get("/ready")).await.status(), StatusCode::OK);

    let not_ready = app_with(Arc::new(MockCompletionProvider::disabled()));
    assert_eq!(
        send(not_ready, get("/ready")).await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn metrics_endpoint_exports_prometheus_text() {
    init_metrics();
    let app = app_with(Arc::new(MockCompletionProvider::replying("<p>ok</p>")));

    // Generate some traffic first
    let _ = send(app.clone(), get("/health")).await;

    let response = send(app, get("/metrics")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("http_requests_total"));
}

#[tokio::test]
async fn index_page_renders_form() {
    let app = app_with(Arc::new(MockCompletionProvider::replying("")));

    let response = send(app, get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(response).await;
    assert!(page.contains("name=\"travelStyle\""));
    assert!(page.contains("action=\"/generate-plan\""));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = app_with(Arc::new(MockCompletionProvider::replying("")));

    let response = send(app, get("/nowhere")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Not found: /nowhere");
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let app = app_with(Arc::new(MockCompletionProvider::replying("")));

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = send(app, request).await;

    assert_eq!(response.headers()["x-request-id"], "req-42");
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert!(response.headers().contains_key(header::CONTENT_SECURITY_POLICY));
}

#[tokio::test]
async fn application_serves_over_tcp() {
    let common = Config {
        host: "127.0.0.1".to_string(),
        port: 0, // Random port
        log_level: "info".to_string(),
    };
    let config = PlannerConfig::from_lookup(common, |key| match key {
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        _ => None,
    })
    .expect("Failed to load config");

    let app = Application::build_with_provider(
        config,
        Arc::new(MockCompletionProvider::replying("<h1>Lima</h1>")),
    )
    .await
    .expect("Failed to build application");
    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    let response = Client::new()
        .post(format!("http://127.0.0.1:{}/api/generate-plan", port))
        .json(&serde_json::json!({
            "destination": "Lima",
            "duration": 2,
            "budget": "budget",
            "travelStyle": "relaxed"
        }))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["planHtml"], "<h1>Lima</h1>");
}
