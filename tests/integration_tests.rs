//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML config → REST cursor → repository
//! traversals and direct operations.

use pagerepo::http::{HttpClient, HttpClientConfig};
use pagerepo::repository::{Repository, SearchParams, TraversalOp};
use pagerepo::rest::{RestConfig, RestCursor, RestSource};
use pagerepo::types::JsonValue;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Initialize logging for test runs; honors `RUST_LOG`, idempotent
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_test_writer()
        .try_init();
}

fn no_retry_client(base_url: &str) -> HttpClient {
    HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url(base_url)
            .max_retries(0)
            .build(),
    )
}

fn users_config(base_url: &str, page_size: u32) -> RestConfig {
    RestConfig::new(base_url, "/users")
        .with_record_path("users")
        .with_page_size(page_size)
}

fn page(ids: &[u32]) -> JsonValue {
    let users: Vec<JsonValue> = ids
        .iter()
        .map(|id| json!({"id": id, "name": format!("user-{id}")}))
        .collect();
    json!({ "users": users })
}

async fn mount_page(server: &MockServer, offset: &str, limit: &str, body: JsonValue) {
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("offset", offset))
        .and(query_param("limit", limit))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Traversal Integration Tests
// ============================================================================

#[tokio::test]
async fn test_get_all_materializes_every_page() {
    init_tracing();
    let server = MockServer::start().await;

    // The cursor opens at the configured page size; get_all raises it to the
    // repository ceiling for every subsequent fetch
    mount_page(&server, "0", "2", page(&[1, 2])).await;
    mount_page(&server, "2", "3", page(&[3, 4])).await;

    let cursor = RestCursor::open(no_retry_client(&server.uri()), users_config(&server.uri(), 2))
        .await
        .unwrap();

    let mut repo: Repository<JsonValue> = Repository::new(3);
    repo.attach(Some(Box::new(cursor))).unwrap();

    let all = repo.get_all().await;
    let ids: Vec<u64> = all.iter().map(|u| u["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_find_fetches_single_record_pages_and_stops_early() {
    init_tracing();
    let server = MockServer::start().await;

    mount_page(&server, "0", "2", page(&[1, 2])).await;
    // find drops the page size to one record per fetch and stops at the match
    mount_page(&server, "2", "1", page(&[3])).await;

    let cursor = RestCursor::open(no_retry_client(&server.uri()), users_config(&server.uri(), 2))
        .await
        .unwrap();

    let mut repo: Repository<JsonValue> = Repository::new(100);
    repo.attach(Some(Box::new(cursor))).unwrap();

    let found = repo.find(|u| u["id"] == 3).await.unwrap();
    assert_eq!(found["name"], "user-3");
}

#[tokio::test]
async fn test_get_all_fault_notifies_and_returns_empty() {
    init_tracing();
    let server = MockServer::start().await;

    mount_page(&server, "0", "2", page(&[1, 2])).await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let cursor = RestCursor::open(no_retry_client(&server.uri()), users_config(&server.uri(), 2))
        .await
        .unwrap();

    let notifications = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&notifications);

    let mut repo: Repository<JsonValue> = Repository::new(2);
    repo.on_iteration_error(move |event| {
        assert_eq!(event.operation(), TraversalOp::GetAll);
        seen.fetch_add(1, Ordering::SeqCst);
    });
    repo.attach(Some(Box::new(cursor))).unwrap();

    let all = repo.get_all().await;
    assert!(all.is_empty());
    assert_eq!(notifications.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Direct Operation Integration Tests
// ============================================================================

#[tokio::test]
async fn test_direct_operations_through_repository() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "bob"})))
        .mount(&server)
        .await;

    let updated = json!({"id": 7, "name": "bobby"});
    Mock::given(method("PUT"))
        .and(path("/users/7"))
        .and(body_json(&updated))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/users/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let source = RestSource::new(
        no_retry_client(&server.uri()),
        users_config(&server.uri(), 2),
    );
    let repo: Repository<JsonValue> = Repository::new(100).with_source(source);

    let params = SearchParams::new().with("id", 7);
    let record = repo.get(&params).await.unwrap().unwrap();
    assert_eq!(record["name"], "bob");

    repo.update(&updated).await.unwrap();
    repo.delete(&updated).await.unwrap();

    // Bulk delete has no server-side equivalent for this source
    let err = repo.delete_all(|_| true).await.unwrap_err();
    assert!(err.is_unsupported());
}
