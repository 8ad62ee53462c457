//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use lrutide::{api::create_router, AppState, Cache};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;

// == Helper Functions ==

fn create_state(capacity: usize) -> AppState {
    AppState::new(Cache::new(capacity, None).unwrap())
}

fn app(state: &AppState) -> Router {
    create_router(state.clone())
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(state: &AppState, method: &str, uri: &str, body: Option<&str>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app(state).oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn set(state: &AppState, json: &str) -> Response {
    send(state, "PUT", "/set", Some(json)).await
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let state = create_state(100);

    let response = set(&state, r#"{"key":"test_key","value":"test_value"}"#).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("test_key"));
    assert_eq!(json["replaced"], false);
}

#[tokio::test]
async fn test_set_endpoint_overwrite_reports_replaced() {
    let state = create_state(100);

    set(&state, r#"{"key":"k","value":"v1"}"#).await;
    let response = set(&state, r#"{"key":"k","value":"v2"}"#).await;

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["replaced"], true);
}

#[tokio::test]
async fn test_set_endpoint_negative_ttl() {
    let state = create_state(100);

    let response = set(&state, r#"{"key":"k","value":"v","ttl":-1}"#).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("Invalid TTL"));
    assert_eq!(state.cache.size(), 0);
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_success() {
    let state = create_state(100);
    set(&state, r#"{"key":"get_key","value":"get_value"}"#).await;

    let response = send(&state, "GET", "/get/get_key", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "get_key");
    assert_eq!(json["value"], "get_value");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let state = create_state(100);

    let response = send(&state, "GET", "/get/missing", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("missing"));
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint() {
    let state = create_state(100);
    set(&state, r#"{"key":"del_key","value":"v"}"#).await;

    let response = send(&state, "DELETE", "/del/del_key", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&state, "GET", "/get/del_key", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&state, "DELETE", "/del/del_key", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == EXISTS / TTL Endpoint Tests ==

#[tokio::test]
async fn test_exists_endpoint() {
    let state = create_state(100);
    set(&state, r#"{"key":"present","value":"v"}"#).await;

    let json = body_to_json(send(&state, "GET", "/exists/present", None).await.into_body()).await;
    assert_eq!(json["exists"], true);

    let json = body_to_json(send(&state, "GET", "/exists/absent", None).await.into_body()).await;
    assert_eq!(json["exists"], false);
}

#[tokio::test]
async fn test_ttl_endpoint() {
    let state = create_state(100);
    set(&state, r#"{"key":"timed","value":"v","ttl":30}"#).await;
    set(&state, r#"{"key":"forever","value":"v"}"#).await;

    let json = body_to_json(send(&state, "GET", "/ttl/timed", None).await.into_body()).await;
    assert_eq!(json["expires"], true);
    assert!(json["ttl"].as_f64().unwrap() > 29.0);

    let json = body_to_json(send(&state, "GET", "/ttl/forever", None).await.into_body()).await;
    assert_eq!(json["expires"], false);
    assert!(json["ttl"].is_null());

    let response = send(&state, "GET", "/ttl/absent", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == KEYS / CLEANUP / CLEAR Endpoint Tests ==

#[tokio::test]
async fn test_keys_cleanup_and_clear() {
    let state = create_state(100);
    set(&state, r#"{"key":"a","value":"1"}"#).await;
    set(&state, r#"{"key":"b","value":"2","ttl":0.05}"#).await;
    set(&state, r#"{"key":"c","value":"3"}"#).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let json = body_to_json(send(&state, "POST", "/cleanup", None).await.into_body()).await;
    assert_eq!(json["removed"], 1);

    let json = body_to_json(send(&state, "GET", "/keys", None).await.into_body()).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["keys"][0], "c");
    assert_eq!(json["keys"][1], "a");

    let response = send(&state, "POST", "/clear", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.cache.size(), 0);
}

// == STATS Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let state = create_state(100);
    set(&state, r#"{"key":"stats_key","value":"v"}"#).await;
    send(&state, "GET", "/get/stats_key", None).await; // hit
    send(&state, "GET", "/get/nonexistent", None).await; // miss

    let response = send(&state, "GET", "/stats", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["puts"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["hit_rate"], 0.5);

    send(&state, "POST", "/stats/reset", None).await;
    let json = body_to_json(send(&state, "GET", "/stats", None).await.into_body()).await;
    assert_eq!(json["hits"], 0);
    assert_eq!(json["total_entries"], 1);
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let state = create_state(100);

    let response = send(&state, "GET", "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Error Response Tests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let state = create_state(100);

    let response = set(&state, r#"{"key": "missing value"}"#).await;

    // Axum returns 422 for JSON body deserialization errors
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_empty_key_request() {
    let state = create_state(100);

    let response = set(&state, r#"{"key":"","value":"v"}"#).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == TTL Expiration and Eviction via API Tests ==

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let state = create_state(100);
    set(&state, r#"{"key":"ttl_key","value":"v","ttl":0.1}"#).await;

    let response = send(&state, "GET", "/get/ttl_key", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(200)).await;

    let response = send(&state, "GET", "/get/ttl_key", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_lru_eviction_via_api() {
    let state = create_state(2);
    set(&state, r#"{"key":"a","value":"1"}"#).await;
    set(&state, r#"{"key":"b","value":"2"}"#).await;
    send(&state, "GET", "/get/a", None).await;
    set(&state, r#"{"key":"c","value":"3"}"#).await;

    assert_eq!(
        send(&state, "GET", "/get/b", None).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        send(&state, "GET", "/get/a", None).await.status(),
        StatusCode::OK
    );
}
