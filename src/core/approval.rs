//! Item approval workflow.
//!
//! Approval settings are a single persisted record. Approving an item stamps
//! it in the locally cached item collection (see [`crate::core::items`]) and
//! writes the whole collection back. A cache that did not load cleanly is
//! never rewritten.

use crate::core::items::{get_local_items, save_local_items};
use crate::errors::Result;
use crate::models::{Item, ItemId};
use crate::storage::{APPROVAL_SETTINGS_KEY, LoadSource, Loaded, Storage, load_json, save_json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Approver recorded when the caller does not name one.
pub const DEFAULT_APPROVER: &str = "System";

/// Whether new items must be approved before they count as active stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApprovalSettings {
    /// Approval feature switched on
    pub enabled: bool,
    /// New items must be approved
    pub require_approval: bool,
}

impl ApprovalSettings {
    /// Approval applies only when the feature is on and required.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.enabled && self.require_approval
    }
}

/// Loads the approval settings, defaulting to disabled.
pub async fn get_approval_settings(storage: &dyn Storage) -> Loaded<ApprovalSettings> {
    load_json(storage, APPROVAL_SETTINGS_KEY).await
}

/// Persists the approval settings.
pub async fn save_approval_settings(
    storage: &dyn Storage,
    settings: &ApprovalSettings,
) -> Result<()> {
    save_json(storage, APPROVAL_SETTINGS_KEY, settings).await?;
    info!(
        "Saved approval settings (enabled: {}, require approval: {})",
        settings.enabled, settings.require_approval
    );
    Ok(())
}

/// Marks the cached item `item_id` as approved by `approver`
/// ([`DEFAULT_APPROVER`] when `None`).
///
/// Other items are written back untouched. Returns the stamped item, or
/// `None` when no cached item has that id. Nothing is written unless the
/// cache loaded as [`LoadSource::Stored`] and an item matched.
pub async fn approve_item(
    storage: &dyn Storage,
    item_id: ItemId,
    approver: Option<&str>,
) -> Result<Option<Item>> {
    let Loaded { value: mut items, source } = get_local_items(storage).await;
    if source != LoadSource::Stored {
        debug!("Item cache is {:?}, not approving {}", source, item_id);
        return Ok(None);
    }

    let approver = approver.unwrap_or(DEFAULT_APPROVER);
    let now = Utc::now();

    let mut approved = None;
    for item in items.iter_mut().filter(|item| item.id == item_id) {
        item.approved = Some(true);
        item.approved_at = Some(now);
        item.approved_by = Some(approver.to_string());
        approved = Some(item.clone());
    }

    if approved.is_none() {
        debug!("No cached item {} to approve", item_id);
        return Ok(None);
    }

    save_local_items(storage, &items).await?;
    info!("Item {} approved by {}", item_id, approver);
    Ok(approved)
}

/// Items that have not been approved yet.
#[must_use]
pub fn pending_approval(items: &[Item]) -> Vec<&Item> {
    items.iter().filter(|item| !item.is_approved()).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::storage::{ITEMS_KEY, MemoryStorage};

    async fn seed_items(storage: &MemoryStorage) -> Result<Vec<Item>> {
        let mut bread = Item::new(2, "Bread");
        bread
            .extra
            .insert("aisle".to_string(), serde_json::json!("4B"));
        let items = vec![Item::new(1, "Milk"), bread];
        save_local_items(storage, &items).await?;
        Ok(items)
    }

    #[tokio::test]
    async fn test_settings_default_disabled() {
        let storage = MemoryStorage::new();
        let loaded = get_approval_settings(&storage).await;
        assert_eq!(loaded.source, LoadSource::Missing);
        assert!(!loaded.value.enabled);
        assert!(!loaded.value.is_required());
    }

    #[tokio::test]
    async fn test_settings_use_camel_case_keys() -> Result<()> {
        let storage = MemoryStorage::new();
        let settings = ApprovalSettings {
            enabled: true,
            require_approval: true,
        };
        save_approval_settings(&storage, &settings).await?;

        let raw = storage.get(APPROVAL_SETTINGS_KEY).await?.unwrap();
        assert!(raw.contains("requireApproval"));
        assert!(get_approval_settings(&storage).await.value.is_required());
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_item_stamps_only_matching_item() -> Result<()> {
        let storage = MemoryStorage::new();
        let original = seed_items(&storage).await?;

        let approved = approve_item(&storage, 1, Some("Dana")).await?.unwrap();
        assert!(approved.is_approved());
        assert_eq!(approved.approved_by.as_deref(), Some("Dana"));
        assert!(approved.approved_at.is_some());

        let items = get_local_items(&storage).await.value;
        assert_eq!(items[0], approved);
        assert_eq!(items[1], original[1]);
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_item_default_approver() -> Result<()> {
        let storage = MemoryStorage::new();
        seed_items(&storage).await?;

        let approved = approve_item(&storage, 2, None).await?.unwrap();
        assert_eq!(approved.approved_by.as_deref(), Some(DEFAULT_APPROVER));
        assert_eq!(approved.extra.get("aisle"), Some(&serde_json::json!("4B")));
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_missing_item_leaves_collection_unchanged() -> Result<()> {
        let storage = MemoryStorage::new();
        let original = seed_items(&storage).await?;

        let raw_before = storage.get(ITEMS_KEY).await?;

        assert!(approve_item(&storage, 99, None).await?.is_none());
        assert_eq!(storage.get(ITEMS_KEY).await?, raw_before);
        assert_eq!(get_local_items(&storage).await.value, original);
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_with_corrupt_cache_leaves_it_untouched() -> Result<()> {
        let storage = MemoryStorage::new();
        storage.set(ITEMS_KEY, "[{broken").await?;

        assert!(approve_item(&storage, 1, None).await?.is_none());
        assert_eq!(storage.get(ITEMS_KEY).await?.as_deref(), Some("[{broken"));
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_with_unreadable_items_leaves_cache_untouched() -> Result<()> {
        let storage = MemoryStorage::new();
        for raw in [
            r#"[{"id":"a1","name":"Milk","status":"active"}]"#,
            r#"[{"id":1,"name":"Milk","status":"expired","price":"1.99"}]"#,
        ] {
            storage.set(ITEMS_KEY, raw).await?;

            assert!(approve_item(&storage, 1, None).await?.is_none());
            assert!(approve_item(&storage, 99, None).await?.is_none());
            assert_eq!(storage.get(ITEMS_KEY).await?.as_deref(), Some(raw));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_with_empty_store_writes_nothing() -> Result<()> {
        let storage = MemoryStorage::new();

        assert!(approve_item(&storage, 1, None).await?.is_none());
        assert_eq!(storage.get(ITEMS_KEY).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_pending_approval() -> Result<()> {
        let storage = MemoryStorage::new();
        seed_items(&storage).await?;
        approve_item(&storage, 1, None).await?;

        let items = get_local_items(&storage).await.value;
        let pending = pending_approval(&items);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, 2);
        Ok(())
    }
}
