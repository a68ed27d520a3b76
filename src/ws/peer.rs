//! Outbound half of a WebSocket connection.
//!
//! [`Peer`] is the seam between connection bookkeeping and the transport:
//! the registry and dispatcher only ever talk to a `Peer`, which lets them
//! be driven by in-memory peers in tests.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::SinkExt;
use futures_util::stream::SplitSink;

/// Failure to deliver a frame to a peer.
///
/// Every variant is permanent for the connection: there is no retry.
#[derive(Debug, thiserror::Error)]
pub enum PeerError {
    /// The underlying transport rejected the frame.
    #[error("transport error: {0}")]
    Transport(String),

    /// The peer did not accept the frame before the send deadline.
    #[error("send timed out after {0:?}")]
    Timeout(Duration),

    /// The peer is already closed.
    #[error("peer closed")]
    Closed,
}

/// Something a text frame can be written to.
pub trait Peer: fmt::Debug + Send + Sync + 'static {
    /// Writes one text frame.
    ///
    /// # Errors
    ///
    /// Returns [`PeerError`] if the frame could not be delivered.
    fn send_text(&mut self, text: &str) -> impl Future<Output = Result<(), PeerError>> + Send;

    /// Sends a close signal and releases the transport. Does not wait for
    /// the remote side to acknowledge.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// [`Peer`] backed by the sink half of an axum [`WebSocket`].
#[derive(Debug)]
pub struct WsPeer {
    sink: SplitSink<WebSocket, Message>,
}

impl WsPeer {
    /// Wraps the sink half of a split WebSocket.
    #[must_use]
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self { sink }
    }
}

impl Peer for WsPeer {
    async fn send_text(&mut self, text: &str) -> Result<(), PeerError> {
        self.sink
            .send(Message::text(text.to_owned()))
            .await
            .map_err(|e| PeerError::Transport(e.to_string()))
    }

    async fn close(&mut self) {
        // Either call fails once the socket is gone; nothing left to do then.
        let _ = self.sink.send(Message::Close(None)).await;
        let _ = self.sink.close().await;
    }
}
