//! Live-connection tracking for the broadcast channel.
//!
//! [`ConnectionRegistry`] is the only shared mutable state of the
//! broadcast channel. Its lock guards membership alone: it is held while
//! copying or mutating the list and never across network I/O. Each
//! connection's outbound [`Peer`] sits behind its own async mutex inside
//! [`Connection`], so a slow socket only ever blocks itself.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use super::peer::Peer;
use crate::domain::ConnectionId;

/// Handle to one accepted broadcast connection.
///
/// Cloning is cheap and every clone refers to the same peer and the same
/// cancellation token; the registry stores one clone, the connection's own
/// task keeps another.
#[derive(Debug)]
pub struct Connection<P> {
    id: ConnectionId,
    peer: Arc<Mutex<P>>,
    cancel: CancellationToken,
}

impl<P> Clone for Connection<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            peer: Arc::clone(&self.peer),
            cancel: self.cancel.clone(),
        }
    }
}

impl<P: Peer> Connection<P> {
    /// Wraps a peer under a fresh [`ConnectionId`].
    #[must_use]
    pub fn new(peer: P, cancel: CancellationToken) -> Self {
        Self {
            id: ConnectionId::new(),
            peer: Arc::new(Mutex::new(peer)),
            cancel,
        }
    }

    /// Returns the connection identifier.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns the lock guarding the outbound peer.
    #[must_use]
    pub fn peer(&self) -> &Mutex<P> {
        &self.peer
    }

    /// Returns the token that ends this connection's receive loop.
    #[must_use]
    pub const fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Signals the connection's task to stop receiving.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

/// Ordered set of live broadcast connections.
///
/// Invariant: a [`ConnectionId`] appears at most once. Membership changes
/// only through [`register`](Self::register), [`unregister`](Self::unregister)
/// and [`drain`](Self::drain).
#[derive(Debug)]
pub struct ConnectionRegistry<P> {
    connections: RwLock<Vec<Connection<P>>>,
}

impl<P: Peer> ConnectionRegistry<P> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(Vec::new()),
        }
    }

    /// Appends a connection to the live set.
    ///
    /// Returns `false` and leaves the registry untouched if the same
    /// connection is already registered.
    pub async fn register(&self, connection: Connection<P>) -> bool {
        let mut connections = self.connections.write().await;
        if connections.iter().any(|c| c.id == connection.id) {
            return false;
        }
        connections.push(connection);
        true
    }

    /// Removes a connection, returning it if it was present.
    ///
    /// Removing an absent connection is a no-op: eviction after a failed
    /// send and the connection's own close path may both call this.
    pub async fn unregister(&self, id: ConnectionId) -> Option<Connection<P>> {
        let mut connections = self.connections.write().await;
        let idx = connections.iter().position(|c| c.id == id)?;
        Some(connections.remove(idx))
    }

    /// Returns the live connections in registration order.
    pub async fn snapshot(&self) -> Vec<Connection<P>> {
        self.connections.read().await.clone()
    }

    /// Returns the number of live connections.
    pub async fn size(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Returns `true` if no connection is registered.
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }

    /// Removes and returns every connection.
    pub async fn drain(&self) -> Vec<Connection<P>> {
        std::mem::take(&mut *self.connections.write().await)
    }
}

impl<P: Peer> Default for ConnectionRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}
