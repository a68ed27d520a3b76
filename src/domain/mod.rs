//! Domain layer: connection identity and the item catalogue.
//!
//! The item store is the stateless-per-call CRUD collaborator; the
//! connection identifier keys the WebSocket broadcast registry.

pub mod connection_id;
pub mod item;
pub mod item_store;

pub use connection_id::ConnectionId;
pub use item::{Item, ItemFields};
pub use item_store::ItemStore;
