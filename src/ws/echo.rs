//! Echo channel connection loop (`/ws`).
//!
//! Every text frame is answered with an `echo` envelope on the same
//! connection. No registry, no shared state.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use super::connection::{CloseReason, ConnectionState, Inbound, Lifecycle, next_text};
use super::messages::Envelope;
use super::peer::{Peer, PeerError, WsPeer};
use crate::domain::ConnectionId;

/// Channel name used in logs.
const CHANNEL: &str = "echo";

/// Serves one upgraded `/ws` socket until it closes.
///
/// `shutdown` is the server's root token; cancelling it ends the loop and
/// sends the client a close frame. Replies and the close frame are each
/// abandoned after `send_timeout`.
pub async fn run_echo_connection(
    socket: WebSocket,
    shutdown: CancellationToken,
    idle_timeout: Option<Duration>,
    send_timeout: Duration,
) {
    let (sink, stream) = socket.split();
    let mut peer = WsPeer::new(sink);
    drive_echo_connection(&mut peer, stream, &shutdown, idle_timeout, send_timeout).await;
}

/// Runs the echo loop and returns why it ended.
pub async fn drive_echo_connection<P, S>(
    peer: &mut P,
    mut inbound: S,
    cancel: &CancellationToken,
    idle_timeout: Option<Duration>,
    send_timeout: Duration,
) -> CloseReason
where
    P: Peer,
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let id = ConnectionId::new();
    let mut lifecycle = Lifecycle::new(id, CHANNEL);
    lifecycle.transition(ConnectionState::Open);

    let reason = loop {
        match next_text(&mut inbound, cancel, idle_timeout).await {
            Inbound::Text(text) => {
                tracing::debug!(connection_id = %id, message = %text, "echo message received");
                let reply = Envelope::echo(&text).to_json();
                match tokio::time::timeout(send_timeout, peer.send_text(&reply)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(error)) => break CloseReason::SendFailed(error),
                    Err(_) => break CloseReason::SendFailed(PeerError::Timeout(send_timeout)),
                }
            }
            Inbound::Closed(reason) => break reason,
        }
    };

    lifecycle.transition(ConnectionState::Closing);
    if !matches!(reason, CloseReason::PeerClosed | CloseReason::SendFailed(_))
        && tokio::time::timeout(send_timeout, peer.close()).await.is_err()
    {
        tracing::debug!(connection_id = %id, "close signal timed out");
    }
    lifecycle.finish(&reason);
    reason
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::ws::test_support::{MockPeer, parse};
    use futures_util::stream;
    use std::sync::atomic::Ordering;

    const SEND_TIMEOUT: Duration = Duration::from_millis(100);

    #[tokio::test]
    async fn replies_once_per_frame() {
        let (mut peer, mut rx) = MockPeer::new();
        let frames: Vec<Result<Message, axum::Error>> =
            vec![Ok(Message::text("ping")), Ok(Message::text(""))];
        let token = CancellationToken::new();

        let reason =
            drive_echo_connection(&mut peer, stream::iter(frames), &token, None, SEND_TIMEOUT)
                .await;
        assert!(matches!(reason, CloseReason::PeerClosed));

        let first = parse(&rx.recv().await.unwrap_or_default());
        assert_eq!(first.get("type"), Some(&serde_json::json!("echo")));
        assert_eq!(first.get("message"), Some(&serde_json::json!("ping")));
        assert!(first.get("connections").is_none());

        let second = parse(&rx.recv().await.unwrap_or_default());
        assert_eq!(second.get("message"), Some(&serde_json::json!("")));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn send_failure_ends_connection() {
        let mut peer = MockPeer::broken();
        let frames: Vec<Result<Message, axum::Error>> = vec![Ok(Message::text("ping"))];
        let token = CancellationToken::new();

        let reason =
            drive_echo_connection(&mut peer, stream::iter(frames), &token, None, SEND_TIMEOUT)
                .await;
        assert!(matches!(reason, CloseReason::SendFailed(_)));
    }

    #[tokio::test]
    async fn shutdown_closes_connection() {
        let (mut peer, _rx) = MockPeer::new();
        let closed = peer.closed_flag();
        let token = CancellationToken::new();
        token.cancel();

        let frames = stream::pending::<Result<Message, axum::Error>>();
        let reason = drive_echo_connection(&mut peer, frames, &token, None, SEND_TIMEOUT).await;
        assert!(matches!(reason, CloseReason::Cancelled));
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn wedged_peer_does_not_hold_up_shutdown() {
        let mut peer = MockPeer::wedged();
        let token = CancellationToken::new();
        token.cancel();

        let frames = stream::pending::<Result<Message, axum::Error>>();
        let Ok(reason) = tokio::time::timeout(
            Duration::from_secs(2),
            drive_echo_connection(&mut peer, frames, &token, None, SEND_TIMEOUT),
        )
        .await
        else {
            panic!("echo loop never finished after shutdown");
        };
        assert!(matches!(reason, CloseReason::Cancelled));
    }

    #[tokio::test]
    async fn stalled_reply_ends_connection() {
        let mut peer = MockPeer::stalled();
        let frames: Vec<Result<Message, axum::Error>> = vec![Ok(Message::text("ping"))];
        let token = CancellationToken::new();

        let reason = drive_echo_connection(
            &mut peer,
            stream::iter(frames).chain(stream::pending()),
            &token,
            None,
            SEND_TIMEOUT,
        )
        .await;
        assert!(matches!(reason, CloseReason::SendFailed(PeerError::Timeout(_))));
    }
}
