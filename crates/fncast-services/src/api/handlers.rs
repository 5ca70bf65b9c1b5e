//! HTTP request handlers.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use fncast_types::Event;

use super::ApiState;
use crate::TRIGGER_ATTRIBUTE;

/// Value of the `trigger` attribute on events produced by this adapter.
pub const HTTP_TRIGGER: &str = "http";

/// Build all API routes.
pub fn api_routes() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ingest", post(ingest))
        .route("/ingest/raw", post(ingest_raw))
}

/// JSON body accepted by `POST /ingest`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    /// Raw payload text handed to the pipeline; missing means empty.
    #[serde(default)]
    pub payload: String,
    /// Content type of `payload`; blank or missing means `application/json`.
    #[serde(default, alias = "content_type")]
    pub content_type: Option<String>,
}

/// Body of a non-200 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Server start time, set once at process start.
static START_TIME: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();

/// Returns basic health status, version, and uptime.
pub async fn health_check() -> Json<serde_json::Value> {
    let start = START_TIME.get_or_init(std::time::Instant::now);
    let uptime_secs = start.elapsed().as_secs();
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": uptime_secs
    }))
}

/// `POST /ingest`: payload and content type in a JSON envelope.
pub async fn ingest(State(state): State<ApiState>, Json(req): Json<IngestRequest>) -> Response {
    let event = Event::new(None, None, req.payload, req.content_type.unwrap_or_default())
        .with_attribute(TRIGGER_ATTRIBUTE, HTTP_TRIGGER);
    run_pipeline(&state, event).await
}

/// `POST /ingest/raw`: the body is the payload, the `Content-Type` header
/// values (joined by `,`) are its content type.
pub async fn ingest_raw(State(state): State<ApiState>, headers: HeaderMap, body: String) -> Response {
    let content_type = headers
        .get_all(CONTENT_TYPE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join(",");
    let event = Event::new(None, None, body, content_type)
        .with_attribute(TRIGGER_ATTRIBUTE, HTTP_TRIGGER);
    run_pipeline(&state, event).await
}

async fn run_pipeline(state: &ApiState, event: Event) -> Response {
    let cancel = state.shutdown.child_token();
    match state.orchestrator.process(&event, &cancel).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            warn!(event_id = %event.id(), error = %e, "http ingest aborted");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
