//! Shared application state injected into all Axum handlers.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::domain::ItemStore;
use crate::ws::dispatcher::Dispatcher;
use crate::ws::peer::WsPeer;
use crate::ws::registry::ConnectionRegistry;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// In-memory item catalogue behind the CRUD endpoints.
    pub items: Arc<ItemStore>,
    /// Broadcast fan-out and its connection registry.
    pub dispatcher: Arc<Dispatcher<WsPeer>>,
    /// Root shutdown token; echo connections end when it is cancelled.
    pub shutdown: CancellationToken,
    /// Idle receive timeout applied to both WebSocket channels.
    pub ws_idle_timeout: Option<Duration>,
    /// Bound on a single outbound WebSocket frame, close frames included.
    pub ws_send_timeout: Duration,
}

impl AppState {
    /// Builds empty state from configuration.
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        Self {
            items: Arc::new(ItemStore::new()),
            dispatcher: Arc::new(Dispatcher::new(registry, config.ws_send_timeout)),
            shutdown: CancellationToken::new(),
            ws_idle_timeout: config.ws_idle_timeout,
            ws_send_timeout: config.ws_send_timeout,
        }
    }
}
