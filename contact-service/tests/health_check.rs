mod common;

use chrono::DateTime;
use common::{FailingStore, TestApp};
use std::sync::Arc;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "contact-service");

    let time = body["time"].as_str().expect("time missing");
    assert!(DateTime::parse_from_rfc3339(time).is_ok(), "bad timestamp: {}", time);
}

#[tokio::test]
async fn health_check_ignores_broken_storage() {
    let app = TestApp::spawn_with_store(Some(Arc::new(FailingStore::default()))).await;

    let response = app.get("/health").await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .header("x-request-id", "req-42")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.headers()["x-request-id"], "req-42");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}

#[tokio::test]
async fn cors_allows_any_origin_with_credentials() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .request(reqwest::Method::OPTIONS, format!("{}/contact", app.address))
        .header("Origin", "https://www.example.es")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(
        headers["access-control-allow-origin"],
        "https://www.example.es"
    );
    assert_eq!(headers["access-control-allow-credentials"], "true");
}
