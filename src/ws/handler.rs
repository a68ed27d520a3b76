//! Axum WebSocket upgrade handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::broadcast::run_broadcast_connection;
use super::echo::run_echo_connection;
use crate::app_state::AppState;

/// `GET /ws` — Upgrade to the echo channel.
pub async fn echo_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let shutdown = state.shutdown.clone();
    let idle_timeout = state.ws_idle_timeout;
    let send_timeout = state.ws_send_timeout;

    ws.on_upgrade(move |socket| {
        run_echo_connection(socket, shutdown, idle_timeout, send_timeout)
    })
}

/// `GET /ws/broadcast` — Upgrade to the broadcast channel.
pub async fn broadcast_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let dispatcher = Arc::clone(&state.dispatcher);
    let idle_timeout = state.ws_idle_timeout;

    ws.on_upgrade(move |socket| run_broadcast_connection(socket, dispatcher, idle_timeout))
}
