//! System endpoints: service info, health check, server time, echo.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{ApiInfoResponse, EchoRequest, EchoResponse, HealthResponse, TimeResponse};
use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};

/// Route catalogue advertised by `GET /`.
const ENDPOINTS: &[(&str, &str)] = &[
    ("GET /", "This endpoint"),
    ("GET /health", "Health check"),
    ("GET /time", "Current server time"),
    ("GET /items", "List all items"),
    ("POST /items", "Create new item"),
    ("GET /items/{item_id}", "Get specific item"),
    ("PUT /items/{item_id}", "Update item"),
    ("DELETE /items/{item_id}", "Delete item"),
    ("POST /echo", "Echo message back"),
    ("WS /ws", "WebSocket echo connection"),
    ("WS /ws/broadcast", "WebSocket broadcast connection"),
];

/// `GET /` — Service name, version and route catalogue.
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    summary = "API information",
    responses(
        (status = 200, description = "Service information", body = ApiInfoResponse),
    )
)]
pub async fn root_handler() -> impl IntoResponse {
    let endpoints: BTreeMap<String, String> = ENDPOINTS
        .iter()
        .map(|(route, description)| ((*route).to_string(), (*description).to_string()))
        .collect();
    Json(ApiInfoResponse {
        message: "Node-RED Study API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, current timestamp and the number of open broadcast connections.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            broadcast_connections: state.dispatcher.registry().size().await,
        }),
    )
}

/// `GET /time` — Current server time.
#[utoipa::path(
    get,
    path = "/time",
    tag = "System",
    summary = "Current server time",
    responses(
        (status = 200, description = "Server time", body = TimeResponse),
    )
)]
pub async fn time_handler() -> impl IntoResponse {
    let now = Utc::now();
    Json(TimeResponse {
        timestamp: now.to_rfc3339(),
        unix: now.timestamp_micros() as f64 / 1_000_000.0,
    })
}

/// `POST /echo` — Echo a message back with the server timestamp.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] if the body has no `content`.
#[utoipa::path(
    post,
    path = "/echo",
    tag = "System",
    summary = "Echo message",
    request_body = EchoRequest,
    responses(
        (status = 200, description = "Echoed message", body = EchoResponse),
        (status = 422, description = "Malformed message", body = ErrorResponse),
    )
)]
pub async fn echo_handler(
    payload: Result<Json<EchoRequest>, JsonRejection>,
) -> Result<Json<EchoResponse>, ApiError> {
    let Json(req) = payload?;
    Ok(Json(EchoResponse {
        echoed: req.content,
        original_timestamp: req.timestamp,
        server_timestamp: Utc::now().to_rfc3339(),
    }))
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/time", get(time_handler))
        .route("/echo", post(echo_handler))
}
