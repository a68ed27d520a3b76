//! Per-connection lifecycle shared by the echo and broadcast channels.
//!
//! Both channels read frames the same way: wait for the next text frame,
//! or for cancellation, or for the idle deadline, whichever comes first.
//! How a connection ended is recorded as a [`CloseReason`] so that a failed
//! send and a peer-initiated close are distinct signals that still run
//! through one cleanup path.

use std::fmt;
use std::time::Duration;

use axum::extract::ws::Message;
use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use super::peer::PeerError;
use crate::domain::ConnectionId;

/// Lifecycle state of a single connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Upgrade accepted, not yet serving frames.
    Connecting,
    /// Receiving frames.
    Open,
    /// Leaving the registry and releasing the socket.
    Closing,
    /// Terminal; no further sends.
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Why a connection left the `Open` state.
#[derive(Debug)]
pub enum CloseReason {
    /// The client sent a close frame or the stream ended.
    PeerClosed,
    /// Reading from the socket failed.
    ReceiveFailed(String),
    /// Writing to the socket failed.
    SendFailed(PeerError),
    /// No frame arrived within the idle timeout.
    IdleTimeout,
    /// The server cancelled the connection (eviction or shutdown).
    Cancelled,
}

impl CloseReason {
    /// Returns `true` for reasons that are a normal end of a session.
    #[must_use]
    pub const fn is_normal(&self) -> bool {
        matches!(self, Self::PeerClosed | Self::Cancelled)
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeerClosed => f.write_str("peer closed"),
            Self::ReceiveFailed(e) => write!(f, "receive failed: {e}"),
            Self::SendFailed(e) => write!(f, "send failed: {e}"),
            Self::IdleTimeout => f.write_str("idle timeout"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Tracks and logs a connection's state transitions.
#[derive(Debug)]
pub struct Lifecycle {
    id: ConnectionId,
    channel: &'static str,
    state: ConnectionState,
}

impl Lifecycle {
    /// Starts tracking a connection in [`ConnectionState::Connecting`].
    #[must_use]
    pub fn new(id: ConnectionId, channel: &'static str) -> Self {
        tracing::debug!(connection_id = %id, channel, state = %ConnectionState::Connecting, "ws connection accepted");
        Self {
            id,
            channel,
            state: ConnectionState::Connecting,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Moves to `next`, logging the transition.
    pub fn transition(&mut self, next: ConnectionState) {
        tracing::debug!(
            connection_id = %self.id,
            channel = self.channel,
            from = %self.state,
            to = %next,
            "ws state transition"
        );
        self.state = next;
    }

    /// Logs the final close reason and moves to [`ConnectionState::Closed`].
    pub fn finish(&mut self, reason: &CloseReason) {
        if reason.is_normal() {
            tracing::info!(connection_id = %self.id, channel = self.channel, %reason, "ws connection closed");
        } else {
            tracing::warn!(connection_id = %self.id, channel = self.channel, %reason, "ws connection closed");
        }
        self.transition(ConnectionState::Closed);
    }
}

/// Outcome of waiting for the next inbound frame.
#[derive(Debug)]
pub enum Inbound {
    /// A text frame carrying this payload.
    Text(String),
    /// The connection is over.
    Closed(CloseReason),
}

/// Waits for the next text frame on `inbound`.
///
/// Binary, ping and pong frames are skipped. Cancellation of `cancel` wins
/// over a frame that becomes ready at the same time.
pub async fn next_text<S>(
    inbound: &mut S,
    cancel: &CancellationToken,
    idle_timeout: Option<Duration>,
) -> Inbound
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        let frame = tokio::select! {
            biased;
            () = cancel.cancelled() => return Inbound::Closed(CloseReason::Cancelled),
            frame = recv_with_deadline(inbound, idle_timeout) => frame,
        };

        match frame {
            Ok(Some(Ok(Message::Text(text)))) => return Inbound::Text(text.as_str().to_owned()),
            Ok(Some(Ok(Message::Close(_))) | None) => {
                return Inbound::Closed(CloseReason::PeerClosed);
            }
            Ok(Some(Ok(_))) => {}
            Ok(Some(Err(e))) => return Inbound::Closed(CloseReason::ReceiveFailed(e.to_string())),
            Err(_elapsed) => return Inbound::Closed(CloseReason::IdleTimeout),
        }
    }
}

/// Reads one item, bounded by the idle deadline when one is set.
async fn recv_with_deadline<S>(
    inbound: &mut S,
    idle_timeout: Option<Duration>,
) -> Result<Option<Result<Message, axum::Error>>, tokio::time::error::Elapsed>
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    match idle_timeout {
        Some(limit) => tokio::time::timeout(limit, inbound.next()).await,
        None => Ok(inbound.next().await),
    }
}
