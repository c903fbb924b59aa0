use super::http::{AppState, router, start_http_server};
use super::message::{PullResponse, PushResponse};
use crate::broker::Broker;
use crate::persistence::{MemoryStore, PayloadStore};
use crate::utils::error::StoreError;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use futures::future::join_all;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;

#[derive(Debug)]
struct ReadOnlyStore;

impl PayloadStore for ReadOnlyStore {
    fn create(&self, _id: &str, _payload: &[u8]) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("read-only file system")))
    }

    fn fetch_and_delete(&self, id: &str) -> Result<Vec<u8>, StoreError> {
        Err(StoreError::NotFound(id.to_string()))
    }
}

fn state_with(store: Box<dyn PayloadStore>) -> AppState {
    AppState {
        broker: Arc::new(Broker::new(store)),
        max_payload_bytes: 1024,
    }
}

fn test_app() -> (Router, Arc<Broker>) {
    let state = state_with(Box::new(MemoryStore::new()));
    let broker = state.broker.clone();
    (router(state), broker)
}

async fn push(app: &Router, body: String) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/push")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn pull(app: &Router) -> Response {
    app.clone()
        .oneshot(Request::builder().uri("/pull").body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn push_ok(app: &Router, priority: i64, data: &str) -> String {
    let response = push(app, json!({ "priority": priority, "data": data }).to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: PushResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    body.message_id
}

async fn pull_ok(app: &Router) -> PullResponse {
    let response = pull(app).await;
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_push_pull_scenario() {
    let (app, _) = test_app();

    let i1 = push_ok(&app, 3, "x").await;
    let i2 = push_ok(&app, 7, "y").await;

    let first = pull_ok(&app).await;
    assert_eq!((first.message_id, first.data), (i2, "y".to_string()));

    let second = pull_ok(&app).await;
    assert_eq!((second.message_id, second.data), (i1, "x".to_string()));

    let empty = pull(&app).await;
    assert_eq!(empty.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(empty).await.is_empty());
}

#[tokio::test]
async fn test_wire_format_uses_camel_case() {
    let (app, _) = test_app();
    let response = push(&app, r#"{"priority": 1, "data": "hello"}"#.to_string()).await;
    assert_eq!(response.headers()["content-type"], "application/json");
    let value: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    let id = value["messageId"].as_str().unwrap().to_string();

    let response = pull(&app).await;
    let value: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(value, json!({ "messageId": id, "data": "hello" }));
}

#[tokio::test]
async fn test_malformed_push_is_rejected_before_broker() {
    let (app, broker) = test_app();

    for body in [
        "not json".to_string(),
        json!({ "data": "no priority" }).to_string(),
        json!({ "priority": "high", "data": "x" }).to_string(),
        json!({ "priority": 1, "data": 42 }).to_string(),
    ] {
        let response = push(&app, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
    assert_eq!(broker.pending(), 0);
}

#[tokio::test]
async fn test_oversized_push_is_rejected() {
    let (app, broker) = test_app();
    let data = "z".repeat(4096);
    let response = push(&app, json!({ "priority": 1, "data": data }).to_string()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("exceeds 1024 bytes"), "body was {body}");
    assert_eq!(broker.pending(), 0);
}

#[tokio::test]
async fn test_wrong_method_and_unknown_route() {
    let (app, _) = test_app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/push").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/pull")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_failure_on_push_is_server_error() {
    let app = router(state_with(Box::new(ReadOnlyStore)));
    let response = push(&app, json!({ "priority": 1, "data": "x" }).to_string()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("read-only file system"), "body was {body}");

    assert_eq!(pull(&app).await.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_divergence_on_pull_is_server_error() {
    let (app, broker) = test_app();
    let id = push_ok(&app, 1, "gone").await;
    broker.store().fetch_and_delete(&id).unwrap();

    let response = pull(&app).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(pull(&app).await.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_non_utf8_payload_is_server_error() {
    let (app, broker) = test_app();
    broker.push(1, &[0xff, 0xfe]).unwrap();

    let response = pull(&app).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"OK");
}

#[tokio::test]
async fn test_concurrent_http_clients() {
    let (app, broker) = test_app();

    let pushed: Vec<String> = join_all((0..32).map(|i| {
        let app = app.clone();
        async move { push_ok(&app, i % 4, &format!("m{i}")).await }
    }))
    .await;
    assert_eq!(broker.pending(), 32);

    let pulled: Vec<PullResponse> = join_all((0..32).map(|_| {
        let app = app.clone();
        async move { pull_ok(&app).await }
    }))
    .await;

    let pushed: HashSet<_> = pushed.into_iter().collect();
    let pulled: HashSet<_> = pulled.into_iter().map(|p| p.message_id).collect();
    assert_eq!(pushed, pulled);
    assert_eq!(pull(&app).await.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_server_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(start_http_server(
        listener,
        state_with(Box::new(MemoryStore::new())),
        async move {
            let _ = stop_rx.await;
        },
    ));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /pull HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();
    assert!(raw.starts_with("HTTP/1.1 204"), "response was {raw}");

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
