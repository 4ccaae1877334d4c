//! Inventory data model shared by the API client and the local collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier assigned to an item by the remote API.
pub type ItemId = i64;

/// Lifecycle status of a tracked item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemStatus {
    /// On the shelf
    #[default]
    #[serde(rename = "active")]
    Active,
    /// Pulled from the shelf (soft removal)
    #[serde(rename = "removed")]
    Removed,
    /// Marked down for quick sale
    #[serde(rename = "discounted")]
    Discounted,
    /// Moved to another display or location
    #[serde(rename = "re-merchandised")]
    ReMerchandised,
}

impl ItemStatus {
    /// Wire name of the status, also used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Removed => "removed",
            Self::Discounted => "discounted",
            Self::ReMerchandised => "re-merchandised",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inventory item as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Remote identifier
    pub id: ItemId,
    /// Product name
    pub name: String,
    /// EAN/UPC barcode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Expiry date as sent by the API (`YYYY-MM-DD` or RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    /// Units on hand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    /// Unit price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Store location name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Product category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Lifecycle status
    #[serde(default)]
    pub status: ItemStatus,
    /// Set once the item passes the approval workflow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
    /// When the item was approved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    /// Who approved it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    /// Attributes this crate does not model, kept so writes do not drop them
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Creates an active item with only the required fields set.
    #[must_use]
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            barcode: None,
            expiry_date: None,
            quantity: None,
            price: None,
            location: None,
            category: None,
            status: ItemStatus::Active,
            approved: None,
            approved_at: None,
            approved_by: None,
            extra: Map::new(),
        }
    }

    /// Whether the approval stamp has been applied.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.approved.unwrap_or(false)
    }
}

/// Create/update payload for an item; also the input of form validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    /// Product name (required)
    pub name: String,
    /// EAN/UPC barcode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    /// Units on hand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    /// Unit price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Store location name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Product category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Lifecycle status, server default when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_names() {
        let statuses: Vec<ItemStatus> =
            serde_json::from_value(json!(["active", "removed", "discounted", "re-merchandised"]))
                .unwrap();
        assert_eq!(
            statuses,
            vec![
                ItemStatus::Active,
                ItemStatus::Removed,
                ItemStatus::Discounted,
                ItemStatus::ReMerchandised
            ]
        );
        assert_eq!(ItemStatus::ReMerchandised.to_string(), "re-merchandised");
    }

    #[test]
    fn test_item_keeps_unknown_attributes() {
        let raw = json!({
            "id": 7,
            "name": "Milk",
            "expiry_date": "2025-01-01",
            "status": "discounted",
            "supplier": "Acme Dairy"
        });

        let item: Item = serde_json::from_value(raw).unwrap();
        assert_eq!(item.status, ItemStatus::Discounted);
        assert_eq!(item.extra.get("supplier"), Some(&json!("Acme Dairy")));

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["supplier"], json!("Acme Dairy"));
        assert!(back.get("approved").is_none());
    }

    #[test]
    fn test_item_status_defaults_to_active() {
        let item: Item = serde_json::from_value(json!({"id": 1, "name": "Eggs"})).unwrap();
        assert_eq!(item.status, ItemStatus::Active);
        assert!(!item.is_approved());
    }
}
