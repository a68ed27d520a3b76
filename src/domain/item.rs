//! Catalogue item held by the in-memory store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Client-supplied item fields, shared by create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemFields {
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price.
    pub price: f64,
    /// Stock quantity. Defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// A stored item.
///
/// `id` is assigned by [`super::ItemStore::create`]; `created_at` is fixed
/// at creation and `updated_at` is only present after an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Unit price.
    pub price: f64,
    /// Stock quantity.
    pub quantity: i64,
    /// Store-assigned identifier.
    pub id: u64,
    /// Creation timestamp (ISO-8601).
    pub created_at: DateTime<Utc>,
    /// Last update timestamp (ISO-8601), absent until the first update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Builds a fresh item from client fields.
    #[must_use]
    pub fn new(id: u64, fields: ItemFields) -> Self {
        Self {
            name: fields.name,
            description: fields.description,
            price: fields.price,
            quantity: fields.quantity,
            id,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Replaces the client fields, keeping `id` and `created_at`.
    pub fn apply(&mut self, fields: ItemFields) {
        self.name = fields.name;
        self.description = fields.description;
        self.price = fields.price;
        self.quantity = fields.quantity;
        self.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn quantity_defaults_to_one() {
        let Ok(fields) = serde_json::from_str::<ItemFields>(r#"{"name":"pen","price":1.5}"#)
        else {
            panic!("fields should parse");
        };
        assert_eq!(fields.quantity, 1);
        assert!(fields.description.is_none());
    }

    #[test]
    fn mistyped_price_is_rejected() {
        let parsed = serde_json::from_str::<ItemFields>(r#"{"name":"pen","price":"cheap"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn apply_preserves_identity_and_creation_time() {
        let mut item = Item::new(
            3,
            ItemFields {
                name: "pen".to_string(),
                description: None,
                price: 1.0,
                quantity: 1,
            },
        );
        let created = item.created_at;
        item.apply(ItemFields {
            name: "pencil".to_string(),
            description: Some("HB".to_string()),
            price: 0.5,
            quantity: 10,
        });
        assert_eq!(item.id, 3);
        assert_eq!(item.created_at, created);
        assert_eq!(item.name, "pencil");
        assert!(item.updated_at.is_some());
    }

    #[test]
    fn fresh_item_omits_updated_at() {
        let item = Item::new(
            1,
            ItemFields {
                name: "pen".to_string(),
                description: None,
                price: 1.0,
                quantity: 1,
            },
        );
        let json = serde_json::to_value(&item).unwrap_or_default();
        assert!(json.get("updated_at").is_none());
        assert_eq!(json.get("id"), Some(&serde_json::json!(1)));
    }
}
