//! Item DTOs for list and mutation responses.
//!
//! Request bodies use [`crate::domain::ItemFields`] directly.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Item;

/// Response body for `GET /items`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemListResponse {
    /// Number of stored items.
    pub count: usize,
    /// All items in insertion order.
    pub items: Vec<Item>,
}

/// Response body for create, update and delete.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemMutationResponse {
    /// Human-readable outcome.
    pub message: String,
    /// The created, updated or deleted item.
    pub item: Item,
}

impl ItemMutationResponse {
    /// `POST /items` outcome.
    #[must_use]
    pub fn created(item: Item) -> Self {
        Self::with("Item created successfully", item)
    }

    /// `PUT /items/{id}` outcome.
    #[must_use]
    pub fn updated(item: Item) -> Self {
        Self::with("Item updated successfully", item)
    }

    /// `DELETE /items/{id}` outcome.
    #[must_use]
    pub fn deleted(item: Item) -> Self {
        Self::with("Item deleted successfully", item)
    }

    fn with(message: &str, item: Item) -> Self {
        Self {
            message: message.to_string(),
            item,
        }
    }
}
