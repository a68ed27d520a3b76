//! In-memory [`Peer`] used by the registry, dispatcher and channel tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

use super::peer::{Peer, PeerError};

#[derive(Debug, Clone, Copy)]
enum Behaviour {
    Healthy,
    Broken,
    Stalled,
    Wedged,
}

/// Peer that records delivered frames on a channel.
#[derive(Debug)]
pub struct MockPeer {
    tx: mpsc::UnboundedSender<String>,
    behaviour: Behaviour,
    closed: Arc<AtomicBool>,
}

impl MockPeer {
    /// Healthy peer plus the receiver that sees every delivered frame.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        Self::with(Behaviour::Healthy)
    }

    /// Peer whose every send fails.
    pub fn broken() -> Self {
        Self::with(Behaviour::Broken).0
    }

    /// Peer whose sends never complete.
    pub fn stalled() -> Self {
        Self::with(Behaviour::Stalled).0
    }

    /// Peer whose sends and close signal both never complete.
    pub fn wedged() -> Self {
        Self::with(Behaviour::Wedged).0
    }

    fn with(behaviour: Behaviour) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let peer = Self {
            tx,
            behaviour,
            closed: Arc::new(AtomicBool::new(false)),
        };
        (peer, rx)
    }

    /// Flag set once [`Peer::close`] has run.
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }
}

impl Peer for MockPeer {
    async fn send_text(&mut self, text: &str) -> Result<(), PeerError> {
        match self.behaviour {
            Behaviour::Healthy => self
                .tx
                .send(text.to_owned())
                .map_err(|_| PeerError::Closed),
            Behaviour::Broken => Err(PeerError::Transport("broken pipe".to_string())),
            Behaviour::Stalled | Behaviour::Wedged => {
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }

    async fn close(&mut self) {
        if matches!(self.behaviour, Behaviour::Wedged) {
            std::future::pending::<()>().await;
        }
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Parses a delivered frame into JSON.
pub fn parse(frame: &str) -> serde_json::Value {
    serde_json::from_str(frame).unwrap_or_default()
}
