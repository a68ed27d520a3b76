//! In-memory item storage.
//!
//! [`ItemStore`] keeps every item in insertion order inside a single
//! [`tokio::sync::RwLock`]. Each call holds the lock only for a list scan,
//! so store traffic never blocks the WebSocket channels.

use tokio::sync::RwLock;

use super::item::{Item, ItemFields};
use crate::error::ApiError;

/// Ordered, in-memory collection of [`Item`]s.
///
/// # Identifiers
///
/// New items get `id = current count + 1`. Ids are not reserved after a
/// delete, so delete followed by create can produce two items sharing an
/// id. Lookups, updates and deletes act on the first match.
#[derive(Debug, Default)]
pub struct ItemStore {
    items: RwLock<Vec<Item>>,
}

impl ItemStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all items in insertion order.
    pub async fn list(&self) -> Vec<Item> {
        self.items.read().await.clone()
    }

    /// Appends a new item and returns it.
    pub async fn create(&self, fields: ItemFields) -> Item {
        let mut items = self.items.write().await;
        let id = items.len() as u64 + 1;
        let item = Item::new(id, fields);
        items.push(item.clone());
        tracing::info!(item_id = id, name = %item.name, "item created");
        item
    }

    /// Returns the item with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ItemNotFound`] if no item has this id.
    pub async fn get(&self, id: u64) -> Result<Item, ApiError> {
        self.items
            .read()
            .await
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or(ApiError::ItemNotFound(id))
    }

    /// Replaces the fields of the item with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ItemNotFound`] if no item has this id.
    pub async fn update(&self, id: u64, fields: ItemFields) -> Result<Item, ApiError> {
        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(ApiError::ItemNotFound(id))?;
        item.apply(fields);
        tracing::info!(item_id = id, "item updated");
        Ok(item.clone())
    }

    /// Removes the item with the given id, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ItemNotFound`] if no item has this id.
    pub async fn delete(&self, id: u64) -> Result<Item, ApiError> {
        let mut items = self.items.write().await;
        let idx = items
            .iter()
            .position(|item| item.id == id)
            .ok_or(ApiError::ItemNotFound(id))?;
        let removed = items.remove(idx);
        tracing::info!(item_id = id, "item deleted");
        Ok(removed)
    }

    /// Returns the number of stored items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Returns `true` if the store holds no items.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn fields(name: &str) -> ItemFields {
        ItemFields {
            name: name.to_string(),
            description: None,
            price: 9.99,
            quantity: 1,
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let store = ItemStore::new();
        let a = store.create(fields("a")).await;
        let b = store.create(fields("b")).await;
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn get_nonexistent_returns_error() {
        let store = ItemStore::new();
        let result = store.get(1).await;
        assert!(matches!(result, Err(ApiError::ItemNotFound(1))));
    }

    #[tokio::test]
    async fn update_keeps_created_at() {
        let store = ItemStore::new();
        let created = store.create(fields("a")).await;
        let Ok(updated) = store.update(created.id, fields("renamed")).await else {
            panic!("update should succeed");
        };
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.is_some());

        let fetched = tokio_test::assert_ok!(store.get(created.id).await);
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn delete_removes_item() {
        let store = ItemStore::new();
        let created = store.create(fields("a")).await;
        let removed = tokio_test::assert_ok!(store.delete(created.id).await);
        assert_eq!(removed.id, created.id);
        assert!(store.is_empty().await);
        assert!(store.delete(created.id).await.is_err());
    }

    #[tokio::test]
    async fn delete_then_create_reuses_count_based_id() {
        let store = ItemStore::new();
        let _ = store.create(fields("a")).await;
        let _ = store.create(fields("b")).await;
        let _ = store.delete(1).await;

        // One item left (id 2), so the next id is 2 again.
        let c = store.create(fields("c")).await;
        assert_eq!(c.id, 2);

        let Ok(first) = store.get(2).await else {
            panic!("id 2 should exist");
        };
        assert_eq!(first.name, "b");
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let store = ItemStore::new();
        let _ = store.create(fields("a")).await;
        let _ = store.create(fields("b")).await;
        let names: Vec<String> = store.list().await.into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }
}
