use std::sync::Arc;

use catalog_api::app::{build_app, services::AppServices};
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory store, bound to an ephemeral port.
        let app = build_app(Arc::new(AppServices::in_memory()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create(client: &reqwest::Client, srv: &TestServer, body: serde_json::Value) -> reqwest::Response {
    client
        .post(srv.url("/products"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn chair_lifecycle_end_to_end() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Create
    let res = create(&client, &srv, json!({ "name": "Chair" })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res
        .headers()
        .get(reqwest::header::LOCATION)
        .expect("location header")
        .to_str()
        .unwrap()
        .to_string();
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(location, format!("/products/{id}"));

    // Fetch through the location reference
    let res = client.get(srv.url(&location)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["id"], id);
    assert_eq!(fetched["name"], "Chair");

    // Duplicate name, different case
    let res = create(&client, &srv, json!({ "name": "chair" })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "duplicate_name");

    // Fuzzy search by name segment
    let res = client.get(srv.url("/products/hai")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let hits: serde_json::Value = res.json().await.unwrap();
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["id"], id);
    assert_eq!(hits[0]["name"], "Chair");

    // Delete returns the prior state
    let res = client
        .delete(srv.url(&format!("/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let deleted: serde_json::Value = res.json().await.unwrap();
    assert_eq!(deleted["name"], "Chair");

    // Gone
    let res = client
        .get(srv.url(&format!("/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_rejects_empty_and_missing_names() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for body in [json!({ "name": "" }), json!({})] {
        let res = create(&client, &srv, body).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let err: serde_json::Value = res.json().await.unwrap();
        assert_eq!(err["error"], "invalid_argument");
        assert_eq!(err["message"], "Product name cannot be empty.");
    }

    let res = client.get(srv.url("/products")).send().await.unwrap();
    let all: serde_json::Value = res.json().await.unwrap();
    assert!(all.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_ignores_client_supplied_id() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = create(&client, &srv, json!({ "id": 500, "name": "Desk" })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_ne!(created["id"], 500);
}

#[tokio::test]
async fn search_fallback_and_miss() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create(&client, &srv, json!({ "name": "Chair" })).await;
    create(&client, &srv, json!({ "name": "Table" })).await;

    let all: serde_json::Value = client
        .get(srv.url("/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 2);

    // Empty name query falls back to the full list.
    let res = client.get(srv.url("/products?name=")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fallback: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fallback, all);

    let res = client.get(srv.url("/products?name=TAB")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let hits: serde_json::Value = res.json().await.unwrap();
    assert_eq!(hits.as_array().unwrap().len(), 1);

    let res = client.get(srv.url("/products/sofa")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let err: serde_json::Value = res.json().await.unwrap();
    assert!(err["message"].as_str().unwrap().contains("'sofa'"));
}

#[tokio::test]
async fn update_rules() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let created: serde_json::Value = create(&client, &srv, json!({ "name": "Chair" }))
        .await
        .json()
        .await
        .unwrap();
    let id = created["id"].as_i64().unwrap();
    let url = srv.url(&format!("/products/{id}"));

    // Path and payload ids disagree.
    let res = client
        .put(&url)
        .json(&json!({ "id": id + 1, "name": "Stool" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Successful replacement.
    let res = client
        .put(&url)
        .json(&json!({ "id": id, "name": "Armchair", "version": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let confirmation: serde_json::Value = res.json().await.unwrap();
    assert_eq!(confirmation["message"], "Product updated successfully.");
    assert_eq!(confirmation["version"], 2);

    // Stale version on a live record.
    let res = client
        .put(&url)
        .json(&json!({ "id": id, "name": "Stool", "version": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["error"], "concurrent_modification");

    // Record deleted before the update.
    client.delete(&url).send().await.unwrap();
    let res = client
        .put(&url)
        .json(&json!({ "id": id, "name": "Stool" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_and_update_require_numeric_ids() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.delete(srv.url("/products/chair")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.delete(srv.url("/products/42")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_body_gets_json_error() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/products"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["error"], "invalid_body");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/products")).send().await.unwrap();
    assert!(res.headers().contains_key("x-request-id"));

    let supplied = "0190b6a1-7c2e-7a3b-9d4f-1e2d3c4b5a69";
    let res = client
        .get(srv.url("/products"))
        .header("x-request-id", supplied)
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], supplied);
}
