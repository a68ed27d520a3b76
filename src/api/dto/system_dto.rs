//! DTOs for the informational and utility endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response body for `GET /`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiInfoResponse {
    /// Service name.
    pub message: String,
    /// Crate version.
    pub version: String,
    /// Route → description catalogue.
    pub endpoints: BTreeMap<String, String>,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"healthy"` while the server answers.
    pub status: String,
    /// Current server time (ISO-8601).
    pub timestamp: String,
    /// Crate version.
    pub version: String,
    /// Number of open `/ws/broadcast` connections.
    pub broadcast_connections: usize,
}

/// Response body for `GET /time`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TimeResponse {
    /// Current server time (ISO-8601).
    pub timestamp: String,
    /// Current server time as fractional Unix seconds.
    pub unix: f64,
}

/// Request body for `POST /echo`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EchoRequest {
    /// Text to echo back.
    pub content: String,
    /// Optional client-side timestamp, returned untouched.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Response body for `POST /echo`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EchoResponse {
    /// The request's `content`.
    pub echoed: String,
    /// The request's `timestamp`, if any.
    pub original_timestamp: Option<String>,
    /// Server time when the echo was produced (ISO-8601).
    pub server_timestamp: String,
}
