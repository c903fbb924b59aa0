//! HTTP transport
//!
//! Translates HTTP requests into broker operations:
//! - `POST /push` with `{"priority": <int>, "data": <string>}` answers
//!   `{"messageId": ...}`
//! - `GET /pull` answers `{"messageId": ..., "data": ...}`, or `204 No Content`
//!   when nothing is pending
//! - `GET /health` answers `OK`
//!
//! Malformed or oversized bodies are rejected here with `400` and never reach
//! the broker.
//! Broker calls run on the blocking pool because stores do synchronous I/O.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    body::{Bytes, HttpBody},
    extract::{DefaultBodyLimit, Request, State, rejection::BytesRejection},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::broker::Broker;
use crate::transport::message::{PullResponse, PushRequest, PushResponse};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub broker: Arc<Broker>,
    pub max_payload_bytes: usize,
}

/// Builds the router with request logging and the push body limit applied.
pub fn router(state: AppState) -> Router {
    let body_limit = state.max_payload_bytes;
    Router::new()
        .route("/push", post(push_handler))
        .route("/pull", get(pull_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Serves the API on `listener` until `shutdown` resolves.
pub async fn start_http_server<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("HTTP server listening on http://{addr}");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Logs method, route, status, response size and latency for every request.
async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let content_length = response.body().size_hint().exact().unwrap_or(0);
    info!(
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        content_length,
        elapsed_us = start.elapsed().as_micros() as u64,
        "Request processed"
    );
    response
}

async fn push_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            warn!("Rejected push body: {e}");
            return bad_request(format!(
                "request body exceeds {} bytes or could not be read",
                state.max_payload_bytes
            ));
        }
    };

    let request: PushRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected push request: {e}");
            return bad_request(format!("invalid push request: {e}"));
        }
    };

    let broker = state.broker.clone();
    let pushed = tokio::task::spawn_blocking(move || {
        broker.push(request.priority, request.data.as_bytes())
    })
    .await;

    match pushed {
        Ok(Ok(message_id)) => Json(PushResponse { message_id }).into_response(),
        Ok(Err(e)) => internal_error(format!("Error: {e}")),
        Err(e) => internal_error(format!("push task failed: {e}")),
    }
}

async fn pull_handler(State(state): State<AppState>) -> Response {
    let broker = state.broker.clone();
    let pulled = tokio::task::spawn_blocking(move || broker.pull()).await;

    let message = match pulled {
        Ok(Ok(Some(message))) => message,
        Ok(Ok(None)) => return StatusCode::NO_CONTENT.into_response(),
        Ok(Err(e)) => return internal_error(format!("Error reading message: {e}")),
        Err(e) => return internal_error(format!("pull task failed: {e}")),
    };

    match String::from_utf8(message.payload) {
        Ok(data) => Json(PullResponse {
            message_id: message.id,
            data,
        })
        .into_response(),
        Err(e) => {
            error!("Message {} has a non UTF-8 payload: {e}", message.id);
            internal_error(format!("message {} is not valid UTF-8", message.id))
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

fn bad_request(detail: String) -> Response {
    (StatusCode::BAD_REQUEST, detail).into_response()
}

fn internal_error(detail: String) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, detail).into_response()
}
