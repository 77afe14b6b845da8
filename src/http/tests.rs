//! Tests for the HTTP client

use super::*;
use crate::error::Error;
use crate::types::BackoffType;
use serde_json::json;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn no_retry_client(base_url: &str) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(base_url)
        .max_retries(0)
        .build();
    HttpClient::with_config(config)
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_defaults() {
    let config = HttpClientConfig::default();
    assert!(config.base_url.is_none());
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.backoff_type, BackoffType::Exponential);
}

#[test]
fn test_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.example.com")
        .timeout(Duration::from_secs(5))
        .max_retries(1)
        .header("X-Custom", "value")
        .user_agent("test-agent")
        .build();

    assert_eq!(config.base_url.as_deref(), Some("https://api.example.com"));
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.max_retries, 1);
    assert_eq!(config.default_headers.get("X-Custom").unwrap(), "value");
    assert_eq!(config.user_agent, "test-agent");
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("limit", "10")
        .header("Accept", "application/json")
        .json(json!({"a": 1}));

    assert_eq!(config.query.get("limit").unwrap(), "10");
    assert_eq!(config.headers.get("Accept").unwrap(), "application/json");
    assert!(config.body.is_some());
}

// ============================================================================
// Backoff Tests
// ============================================================================

#[test_case(BackoffType::Constant, 0, 100 ; "constant first attempt")]
#[test_case(BackoffType::Constant, 3, 100 ; "constant later attempt")]
#[test_case(BackoffType::Linear, 0, 100 ; "linear first attempt")]
#[test_case(BackoffType::Linear, 2, 300 ; "linear third attempt")]
#[test_case(BackoffType::Exponential, 0, 100 ; "exponential first attempt")]
#[test_case(BackoffType::Exponential, 3, 800 ; "exponential fourth attempt")]
fn test_calculate_backoff(backoff_type: BackoffType, attempt: u32, expected_ms: u64) {
    let config = HttpClientConfig::builder()
        .backoff(
            backoff_type,
            Duration::from_millis(100),
            Duration::from_secs(60),
        )
        .build();
    let client = HttpClient::with_config(config);

    assert_eq!(
        client.calculate_backoff(attempt),
        Duration::from_millis(expected_ms)
    );
}

#[test]
fn test_backoff_capped_at_max() {
    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Exponential,
            Duration::from_millis(100),
            Duration::from_millis(250),
        )
        .build();
    let client = HttpClient::with_config(config);

    assert_eq!(client.calculate_backoff(10), Duration::from_millis(250));
}

// ============================================================================
// Request Tests
// ============================================================================

#[tokio::test]
async fn test_get_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"id": 1, "name": "Alice"}]
        })))
        .mount(&server)
        .await;

    let client = no_retry_client(&server.uri());
    let body: serde_json::Value = client.get_json("/api/users").await.unwrap();

    assert_eq!(body["users"][0]["name"], "Alice");
}

#[tokio::test]
async fn test_query_params_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .and(query_param("limit", "5"))
        .and(header("X-Token", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = no_retry_client(&server.uri());
    let config = RequestConfig::new()
        .query("limit", "5")
        .header("X-Token", "secret");

    let body: serde_json::Value = client
        .get_json_with_config("/api/items", config)
        .await
        .unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_retry_on_500_then_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .max_retries(3)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_millis(100),
        )
        .build();
    let client = HttpClient::with_config(config);

    let body: serde_json::Value = client.get_json("/api/flaky").await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_client_error_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .expect(1)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .max_retries(3)
        .build();
    let client = HttpClient::with_config(config);

    let err = client.get("/api/missing").await.unwrap_err();
    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "Not found");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_put_and_delete() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/users/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = no_retry_client(&server.uri());
    client
        .put("/api/users/1", json!({"id": 1, "name": "Alice"}))
        .await
        .unwrap();
    client.delete("/api/users/1").await.unwrap();
}

// ============================================================================
// URL Building Tests
// ============================================================================

#[tokio::test]
async fn test_build_url_joins_base_and_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    // Trailing and leading slashes collapse into a single separator
    let client = no_retry_client(&format!("{}/", server.uri()));
    client.get("/v1/items").await.unwrap();
}

#[tokio::test]
async fn test_absolute_url_bypasses_base() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/absolute"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = no_retry_client("https://unused.example.com");
    let response = client
        .get(&format!("{}/absolute", server.uri()))
        .await
        .unwrap();
    assert!(response.status().is_success());
}
