//! `SQLite` storage backend.
//!
//! Persists key-value pairs in the `kv_entries` table through `SeaORM`. Writes
//! look the key up first and then update or insert, refreshing `updated_at`.

use super::Storage;
use crate::{
    entities::{KvEntry, kv_entry},
    errors::Result,
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use tracing::{debug, info, instrument};

/// Storage backed by a `SeaORM` database connection.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db: DatabaseConnection,
}

impl SqliteStorage {
    /// Wraps an existing connection. The `kv_entries` table must exist
    /// (see [`crate::config::database::create_tables`]).
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects to `database_url` and ensures the table exists.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let db = crate::config::database::init_store_database(database_url).await?;
        Ok(Self::new(db))
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn find_entry(&self, key: &str) -> Result<Option<kv_entry::Model>> {
        KvEntry::find()
            .filter(kv_entry::Column::Key.eq(key))
            .one(&self.db)
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.find_entry(key).await?.map(|entry| entry.value);
        debug!("Stored value present for '{}': {}", key, value.is_some());
        Ok(value)
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().naive_utc();

        if let Some(entry) = self.find_entry(key).await? {
            let mut active_model: kv_entry::ActiveModel = entry.into();
            active_model.value = Set(value.to_string());
            active_model.updated_at = Set(now);
            active_model.update(&self.db).await?;
        } else {
            let new_entry = kv_entry::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value.to_string()),
                updated_at: Set(now),
                ..Default::default()
            };
            new_entry.insert(&self.db).await?;
        }

        info!("Stored value for '{}'", key);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<()> {
        let result = KvEntry::delete_many()
            .filter(kv_entry::Column::Key.eq(key))
            .exec(&self.db)
            .await?;
        debug!("Removed {} row(s) for '{}'", result.rows_affected, key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{init_test_tracing, setup_sqlite_storage};

    #[tokio::test]
    async fn test_set_and_get_new_key() -> Result<()> {
        init_test_tracing();
        let storage = setup_sqlite_storage().await?;

        storage.set("test_key_1", "test_value_1").await?;
        let retrieved = storage.get("test_key_1").await?;

        assert_eq!(
            retrieved,
            Some("test_value_1".to_string()),
            "Retrieved value should match the set value for a new key."
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_set_updates_existing_key() -> Result<()> {
        init_test_tracing();
        let storage = setup_sqlite_storage().await?;

        storage.set("test_key_update", "initial_value").await?;
        storage.set("test_key_update", "updated_value").await?;

        assert_eq!(
            storage.get("test_key_update").await?,
            Some("updated_value".to_string())
        );

        let rows = KvEntry::find().all(storage.connection()).await?;
        assert_eq!(rows.len(), 1, "Updating a key must not add a second row.");
        Ok(())
    }

    #[tokio::test]
    async fn test_get_non_existent_key() -> Result<()> {
        init_test_tracing();
        let storage = setup_sqlite_storage().await?;

        assert!(storage.get("this_key_does_not_exist").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_key() -> Result<()> {
        let storage = setup_sqlite_storage().await?;
        storage.set("gone", "soon").await?;
        storage.remove("gone").await?;
        storage.remove("never_there").await?;

        assert!(storage.get("gone").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_collections_round_trip_through_sqlite() -> Result<()> {
        let storage = setup_sqlite_storage().await?;

        crate::core::tags::add_tag(&storage, "Dairy").await?;
        crate::core::tags::add_tag(&storage, "Frozen").await?;

        let tags = crate::core::tags::get_tags(&storage).await;
        assert_eq!(tags.value, vec!["Dairy".to_string(), "Frozen".to_string()]);
        Ok(())
    }
}
