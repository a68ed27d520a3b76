//! Broadcast fan-out over the connection registry.
//!
//! [`Dispatcher`] owns the broadcast channel's shared behaviour: admitting
//! a connection with its welcome, fanning one inbound message out to every
//! live connection, evicting recipients whose send failed, and draining
//! the registry on shutdown. Delivery is best-effort and at-most-once.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;

use super::messages::Envelope;
use super::peer::{Peer, PeerError};
use super::registry::{Connection, ConnectionRegistry};
use crate::domain::ConnectionId;

/// Outcome of one broadcast pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Registry size at snapshot time; the `connections` value sent.
    pub recipients: usize,
    /// Number of successful sends.
    pub delivered: usize,
    /// Connections removed because their send failed.
    pub evicted: Vec<ConnectionId>,
}

/// Fans broadcast envelopes out to a [`ConnectionRegistry`].
#[derive(Debug)]
pub struct Dispatcher<P> {
    registry: Arc<ConnectionRegistry<P>>,
    send_timeout: Duration,
}

impl<P: Peer> Dispatcher<P> {
    /// Creates a dispatcher over `registry`. Each individual send is
    /// abandoned and counted as failed after `send_timeout`.
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry<P>>, send_timeout: Duration) -> Self {
        Self {
            registry,
            send_timeout,
        }
    }

    /// Returns the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ConnectionRegistry<P>> {
        &self.registry
    }

    /// Registers `connection` and sends it the welcome envelope.
    ///
    /// The connection's peer lock is held across both steps, so a broadcast
    /// that snapshots the registry in between queues behind the welcome.
    ///
    /// # Errors
    ///
    /// Returns [`PeerError`] if the welcome could not be delivered. The
    /// connection stays registered; the caller is expected to
    /// [`close`](Self::close) it.
    pub async fn open(&self, connection: &Connection<P>) -> Result<(), PeerError> {
        let mut peer = connection.peer().lock().await;
        self.registry.register(connection.clone()).await;
        let welcome = Envelope::welcome().to_json();
        match tokio::time::timeout(self.send_timeout, peer.send_text(&welcome)).await {
            Ok(result) => result,
            Err(_) => Err(PeerError::Timeout(self.send_timeout)),
        }
    }

    /// Sends `message` to every registered connection, the sender included.
    ///
    /// One envelope is built per pass, so every recipient sees the same
    /// timestamp and connection count. Sends run concurrently; a failed or
    /// timed-out send never holds up the others. Failed recipients are
    /// unregistered and cancelled after the pass.
    pub async fn dispatch(&self, message: &str) -> DispatchReport {
        let recipients = self.registry.snapshot().await;
        let payload = Envelope::broadcast(message, recipients.len()).to_json();

        let outcomes = join_all(recipients.iter().map(|connection| {
            let payload = payload.as_str();
            async move { (connection.id(), self.send(connection, payload).await) }
        }))
        .await;

        let mut delivered = 0;
        let mut evicted = Vec::new();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(()) => delivered += 1,
                Err(error) => {
                    tracing::warn!(connection_id = %id, %error, "broadcast send failed, evicting");
                    evicted.push(id);
                }
            }
        }

        for id in &evicted {
            self.close(*id).await;
        }

        tracing::debug!(
            recipients = recipients.len(),
            delivered,
            evicted = evicted.len(),
            "broadcast dispatched"
        );

        DispatchReport {
            recipients: recipients.len(),
            delivered,
            evicted,
        }
    }

    /// Unregisters a connection and cancels its receive loop.
    ///
    /// Returns `false` if it was no longer registered; calling this twice
    /// is harmless.
    pub async fn close(&self, id: ConnectionId) -> bool {
        match self.registry.unregister(id).await {
            Some(connection) => {
                connection.cancel();
                true
            }
            None => false,
        }
    }

    /// Drains the registry, cancels every connection and sends each a
    /// close signal. Does not wait for clients to acknowledge.
    ///
    /// Returns the number of connections that were closed.
    pub async fn shutdown(&self) -> usize {
        let drained = self.registry.drain().await;
        for connection in &drained {
            connection.cancel();
        }
        join_all(drained.iter().map(|connection| self.close_peer(connection))).await;
        tracing::info!(closed = drained.len(), "broadcast channel shut down");
        drained.len()
    }

    /// Sends `connection` a close signal, giving up after the send timeout.
    ///
    /// Returns `false` if the signal timed out.
    pub async fn close_peer(&self, connection: &Connection<P>) -> bool {
        let close = async { connection.peer().lock().await.close().await };
        if tokio::time::timeout(self.send_timeout, close).await.is_err() {
            tracing::debug!(connection_id = %connection.id(), "close signal timed out");
            return false;
        }
        true
    }

    /// Sends one frame, bounded by the send timeout.
    async fn send(&self, connection: &Connection<P>, payload: &str) -> Result<(), PeerError> {
        let send = async { connection.peer().lock().await.send_text(payload).await };
        match tokio::time::timeout(self.send_timeout, send).await {
            Ok(result) => result,
            Err(_) => Err(PeerError::Timeout(self.send_timeout)),
        }
    }
}
