//! Serves the HTTP surface on an ephemeral port and drives it with `reqwest`.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use travel_feedback::{
    transport, FeedbackRecord, FeedbackRepository, FeedbackStore, InMemoryFeedbackStore,
    NewFeedback, StoreError,
};

const STORE_DETAIL: &str = "duplicate key value violates unique constraint \"testimonials_pkey\"";

/// In-memory store whose reads and writes can be made to fail, and whose
/// writes can be held open until released.
#[derive(Default)]
struct UnreliableStore {
    inner: InMemoryFeedbackStore,
    fail_list: AtomicBool,
    fail_create: AtomicBool,
    hold_create: AtomicBool,
    create_entered: Notify,
    create_release: Notify,
}

#[async_trait]
impl FeedbackStore for UnreliableStore {
    async fn list(&self, table: &str) -> Result<Vec<FeedbackRecord>, StoreError> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("connection refused"));
        }
        self.inner.list(table).await
    }

    async fn create(&self, table: &str, input: &NewFeedback) -> Result<(), StoreError> {
        if self.hold_create.load(Ordering::SeqCst) {
            self.create_entered.notify_one();
            self.create_release.notified().await;
        }
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(StoreError::rejected(STORE_DETAIL));
        }
        self.inner.create(table, input).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("connection refused"));
        }
        Ok(())
    }
}

fn valid_body() -> Value {
    json!({
        "name": "Jo",
        "location": "",
        "message": "Had a great trip overall!",
        "rating": 5
    })
}

async fn spawn_server() -> Result<(String, tokio::task::JoinHandle<()>), Box<dyn std::error::Error>> {
    spawn_server_with(Arc::new(InMemoryFeedbackStore::new())).await
}

async fn spawn_server_with(
    store: Arc<dyn FeedbackStore>,
) -> Result<(String, tokio::task::JoinHandle<()>), Box<dyn std::error::Error>> {
    let repository = Arc::new(FeedbackRepository::new(store, "testimonials"));
    let router = transport::http::create_router(transport::http::AppState { repository });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Ok((format!("http://{}", addr), server))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_feedback_endpoints() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, server) = spawn_server().await?;
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    // Health: the in-memory store is always reachable.
    let health = client.get(format!("{}/health", base_url)).send().await?;
    assert_eq!(health.status(), 200);
    let body: Value = health.json().await?;
    assert_eq!(body["data"]["status"], "ok");

    // Empty list to start with.
    let list: Value = client
        .get(format!("{}/api/feedback", base_url))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(list["success"], true);
    assert_eq!(list["data"], json!([]));

    // Valid submission; blank location comes back as null.
    let created = client
        .post(format!("{}/api/feedback", base_url))
        .json(&json!({
            "name": "Jo",
            "location": "",
            "message": "Had a great trip overall!",
            "rating": 5
        }))
        .send()
        .await?;
    assert_eq!(created.status(), 201);
    let body: Value = created.json().await?;
    assert_eq!(body["data"]["location"], Value::Null);
    assert_eq!(body["data"]["rating"], 5);

    // Invalid submission names the first failing field.
    let rejected = client
        .post(format!("{}/api/feedback", base_url))
        .json(&json!({ "name": "", "message": "short", "rating": 3 }))
        .send()
        .await?;
    assert_eq!(rejected.status(), 400);
    let body: Value = rejected.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["field"], "name");
    assert_eq!(body["error"], "Name is required");

    // Malformed body.
    let malformed = client
        .post(format!("{}/api/feedback", base_url))
        .header("content-type", "application/json")
        .body("{\"name\": \"Jo\"")
        .send()
        .await?;
    assert_eq!(malformed.status(), 422);

    // Only the valid submission was stored.
    let list: Value = client
        .get(format!("{}/api/feedback", base_url))
        .send()
        .await?
        .json()
        .await?;
    let records = list["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], "Jo");
    assert_eq!(records[0]["message"], "Had a great trip overall!");
    assert!(records[0]["id"].is_i64());
    assert!(records[0]["created_at"].is_string());

    server.abort();
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_fractional_rating_is_a_rating_error() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, server) = spawn_server().await?;
    let client = reqwest::Client::new();

    let mut body = valid_body();
    body["rating"] = json!(4.5);
    let rejected = client
        .post(format!("{}/api/feedback", base_url))
        .json(&body)
        .send()
        .await?;
    assert_eq!(rejected.status(), 400);
    let response: Value = rejected.json().await?;
    assert_eq!(response["field"], "rating");
    assert_eq!(response["error"], "Rating must be between 1 and 5");

    // Field order still applies: a blank name wins over a fractional rating.
    body["name"] = json!("");
    let response: Value = client
        .post(format!("{}/api/feedback", base_url))
        .json(&body)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(response["field"], "name");

    // A whole number written as a float is accepted.
    let mut body = valid_body();
    body["rating"] = json!(4.0);
    let created = client
        .post(format!("{}/api/feedback", base_url))
        .json(&body)
        .send()
        .await?;
    assert_eq!(created.status(), 201);
    let response: Value = created.json().await?;
    assert_eq!(response["data"]["rating"], 4);

    server.abort();
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_store_failures_over_http() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(UnreliableStore::default());
    let (base_url, server) = spawn_server_with(store.clone()).await?;
    let client = reqwest::Client::new();

    // Write failure: generic message, no store detail.
    store.fail_create.store(true, Ordering::SeqCst);
    let failed = client
        .post(format!("{}/api/feedback", base_url))
        .json(&valid_body())
        .send()
        .await?;
    assert_eq!(failed.status(), 502);
    let text = failed.text().await?;
    assert!(!text.contains("duplicate key"), "store detail leaked: {text}");
    let response: Value = serde_json::from_str(&text)?;
    assert_eq!(response["success"], false);
    assert_eq!(
        response["error"],
        "We couldn't save your feedback right now. Please try again."
    );
    assert!(response.get("field").is_none());
    assert!(store.inner.is_empty("testimonials").await);
    store.fail_create.store(false, Ordering::SeqCst);

    // Read failure: the list degrades to empty, health reports the outage.
    store.fail_list.store(true, Ordering::SeqCst);
    let listed = client.get(format!("{}/api/feedback", base_url)).send().await?;
    assert_eq!(listed.status(), 200);
    let response: Value = listed.json().await?;
    assert_eq!(response, json!({ "success": true, "data": [] }));
    let health = client.get(format!("{}/health", base_url)).send().await?;
    assert_eq!(health.status(), 503);
    store.fail_list.store(false, Ordering::SeqCst);

    server.abort();
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_submission_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(UnreliableStore::default());
    store.hold_create.store(true, Ordering::SeqCst);
    let (base_url, server) = spawn_server_with(store.clone()).await?;
    let client = reqwest::Client::new();

    let first = {
        let client = client.clone();
        let url = format!("{}/api/feedback", base_url);
        tokio::spawn(async move { client.post(url).json(&valid_body()).send().await })
    };
    store.create_entered.notified().await;

    let mut second_body = valid_body();
    second_body["name"] = json!("Sam");
    let second = client
        .post(format!("{}/api/feedback", base_url))
        .json(&second_body)
        .send()
        .await?;
    assert_eq!(second.status(), 409);
    let response: Value = second.json().await?;
    assert_eq!(response["success"], false);
    assert_eq!(response["error"], "a feedback submission is already in progress");

    store.create_release.notify_one();
    let first = first.await??;
    assert_eq!(first.status(), 201);

    let listed: Value = client
        .get(format!("{}/api/feedback", base_url))
        .send()
        .await?
        .json()
        .await?;
    let records = listed["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], "Jo");

    server.abort();
    Ok(())
}
