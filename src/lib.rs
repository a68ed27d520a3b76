//! # study-gateway
//!
//! Demonstration REST API and WebSocket gateway used to teach HTTP and
//! WebSocket integration from low-code automation tools.
//!
//! The HTTP side is a small in-memory item CRUD plus a few utility
//! endpoints. The WebSocket side has two channels: `/ws` echoes every text
//! frame back to its sender, `/ws/broadcast` fans every text frame out to
//! all open broadcast connections (sender included), best-effort.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)  ──►  ItemStore (domain/)
//!     │
//!     ├── WS Handlers (ws/)
//!     │     ├── echo loop
//!     │     └── broadcast loop ──►  Dispatcher ──► ConnectionRegistry
//!     │
//!     └── Server lifecycle (server)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod openapi;
pub mod server;
pub mod ws;
