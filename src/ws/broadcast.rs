//! Broadcast channel connection loop (`/ws/broadcast`).
//!
//! `Connecting → Open → Closing → Closed`. Entering `Open` registers the
//! connection and sends the welcome; every text frame received while open
//! is fanned out through the [`Dispatcher`]. Whatever ends the session
//! (peer close, receive error, failed welcome, eviction, shutdown, idle
//! timeout) runs the same cleanup: unregister, cancel, close.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use super::connection::{CloseReason, ConnectionState, Inbound, Lifecycle, next_text};
use super::dispatcher::Dispatcher;
use super::peer::{Peer, WsPeer};
use super::registry::Connection;

/// Channel name used in logs.
const CHANNEL: &str = "broadcast";

/// Serves one upgraded `/ws/broadcast` socket until it closes.
pub async fn run_broadcast_connection(
    socket: WebSocket,
    dispatcher: Arc<Dispatcher<WsPeer>>,
    idle_timeout: Option<Duration>,
) {
    let (sink, stream) = socket.split();
    // Not a child of the server's root token: shutdown goes through
    // `Dispatcher::shutdown`, which sends the close frame first.
    let connection = Connection::new(WsPeer::new(sink), CancellationToken::new());
    drive_broadcast_connection(connection, stream, &dispatcher, idle_timeout).await;
}

/// Runs the broadcast state machine for an accepted connection and returns
/// why it ended.
pub async fn drive_broadcast_connection<P, S>(
    connection: Connection<P>,
    mut inbound: S,
    dispatcher: &Dispatcher<P>,
    idle_timeout: Option<Duration>,
) -> CloseReason
where
    P: Peer,
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let mut lifecycle = Lifecycle::new(connection.id(), CHANNEL);

    let reason = match dispatcher.open(&connection).await {
        Ok(()) => {
            lifecycle.transition(ConnectionState::Open);
            loop {
                match next_text(&mut inbound, connection.cancel_token(), idle_timeout).await {
                    Inbound::Text(text) => {
                        tracing::debug!(connection_id = %connection.id(), message = %text, "broadcast message received");
                        dispatcher.dispatch(&text).await;
                    }
                    Inbound::Closed(reason) => break reason,
                }
            }
        }
        Err(error) => CloseReason::SendFailed(error),
    };

    lifecycle.transition(ConnectionState::Closing);
    if dispatcher.close(connection.id()).await && !matches!(reason, CloseReason::PeerClosed) {
        // Still registered, so neither eviction nor shutdown has closed the
        // socket yet.
        dispatcher.close_peer(&connection).await;
    }
    lifecycle.finish(&reason);
    reason
}
