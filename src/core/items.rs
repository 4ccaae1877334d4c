//! Locally cached item collection.
//!
//! The dashboard keeps a copy of the items it last fetched under
//! `verishelf-items`; the approval workflow stamps items in this copy.

use crate::errors::Result;
use crate::models::Item;
use crate::storage::{ITEMS_KEY, Loaded, Storage, load_json, save_json};
use tracing::debug;

/// Loads the locally cached items.
pub async fn get_local_items(storage: &dyn Storage) -> Loaded<Vec<Item>> {
    load_json(storage, ITEMS_KEY).await
}

/// Replaces the locally cached items.
pub async fn save_local_items(storage: &dyn Storage, items: &[Item]) -> Result<()> {
    save_json(storage, ITEMS_KEY, items).await?;
    debug!("Cached {} item(s) locally", items.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LoadSource, MemoryStorage};

    #[tokio::test]
    async fn test_local_items_round_trip() -> Result<()> {
        let storage = MemoryStorage::new();
        assert_eq!(get_local_items(&storage).await.source, LoadSource::Missing);

        let items = vec![Item::new(1, "Milk"), Item::new(2, "Bread")];
        save_local_items(&storage, &items).await?;

        let loaded = get_local_items(&storage).await;
        assert_eq!(loaded.source, LoadSource::Stored);
        assert_eq!(loaded.value, items);
        Ok(())
    }
}
