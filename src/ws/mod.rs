//! WebSocket layer: echo and broadcast channels.
//!
//! `/ws` answers every text frame on the same connection. `/ws/broadcast`
//! fans every text frame out to all open broadcast connections through the
//! [`dispatcher::Dispatcher`] and its [`registry::ConnectionRegistry`].

pub mod broadcast;
pub mod connection;
pub mod dispatcher;
pub mod echo;
pub mod handler;
pub mod messages;
pub mod peer;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_support;

use axum::Router;
use axum::routing::get;

use crate::app_state::AppState;

/// WebSocket routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(handler::echo_handler))
        .route("/ws/broadcast", get(handler::broadcast_handler))
}
