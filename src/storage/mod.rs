//! Local key-value storage.
//!
//! Every persisted collection (tags, custom fields, approval settings, tax
//! settings, unit preferences, cached items) is a single JSON document under
//! a fixed key. Modules receive a [`Storage`] implementation instead of
//! touching a global store, so tests can swap in [`MemoryStorage`].
//!
//! Reads never fail: [`load_json`] returns a [`Loaded`] value that falls back
//! to the type's default and records whether the data was absent or had to
//! be recovered from a bad read. Writes return errors normally.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use crate::errors::Result;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

/// Key holding the tag list
pub const TAGS_KEY: &str = "verishelf-tags";
/// Key holding custom field definitions
pub const CUSTOM_FIELDS_KEY: &str = "verishelf-custom-fields";
/// Key holding approval settings
pub const APPROVAL_SETTINGS_KEY: &str = "verishelf-approval-settings";
/// Key holding tax settings
pub const TAX_SETTINGS_KEY: &str = "verishelf-tax-settings";
/// Key holding unit preferences
pub const UNITS_KEY: &str = "verishelf-units";
/// Key holding the locally cached item collection
pub const ITEMS_KEY: &str = "verishelf-items";

/// String key-value store scoped to this application.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns the raw value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Where a loaded value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Parsed from a stored value
    Stored,
    /// Nothing stored yet; the default was used
    Missing,
    /// A value existed (or the read failed) but could not be used; the default was used
    Recovered,
}

/// A value read from storage together with its [`LoadSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    /// The parsed value, or the default
    pub value: T,
    /// How `value` was obtained
    pub source: LoadSource,
}

impl<T> Loaded<T> {
    /// True when the default replaced unreadable data.
    #[must_use]
    pub fn was_recovered(&self) -> bool {
        self.source == LoadSource::Recovered
    }

    /// Discards the source flag.
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Reads and parses the JSON document under `key`, degrading to `T::default()`.
pub async fn load_json<T>(storage: &dyn Storage, key: &str) -> Loaded<T>
where
    T: DeserializeOwned + Default,
{
    let raw = match storage.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No stored value for '{}'", key);
            return Loaded {
                value: T::default(),
                source: LoadSource::Missing,
            };
        }
        Err(e) => {
            warn!("Failed to read '{}' from storage, using default: {}", key, e);
            return Loaded {
                value: T::default(),
                source: LoadSource::Recovered,
            };
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Loaded {
            value,
            source: LoadSource::Stored,
        },
        Err(e) => {
            warn!("Stored value for '{}' is not valid, using default: {}", key, e);
            Loaded {
                value: T::default(),
                source: LoadSource::Recovered,
            }
        }
    }
}

/// Serializes `value` as JSON and writes it under `key`.
pub async fn save_json<T>(storage: &dyn Storage, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw).await?;
    debug!("Saved '{}' ({} bytes)", key, raw.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    struct FailingStorage;

    #[async_trait]
    impl Storage for FailingStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Config {
                message: "store offline".to_string(),
            })
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Config {
                message: "store offline".to_string(),
            })
        }

        async fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_load_missing_key_is_flagged_missing() {
        let storage = MemoryStorage::new();
        let loaded: Loaded<Vec<String>> = load_json(&storage, TAGS_KEY).await;
        assert!(loaded.value.is_empty());
        assert_eq!(loaded.source, LoadSource::Missing);
        assert!(!loaded.was_recovered());
    }

    #[tokio::test]
    async fn test_load_corrupt_value_is_recovered() -> Result<()> {
        let storage = MemoryStorage::new();
        storage.set(TAGS_KEY, "{not json").await?;

        let loaded: Loaded<Vec<String>> = load_json(&storage, TAGS_KEY).await;
        assert!(loaded.value.is_empty());
        assert!(loaded.was_recovered());
        Ok(())
    }

    #[tokio::test]
    async fn test_load_wrong_shape_is_recovered() -> Result<()> {
        let storage = MemoryStorage::new();
        storage.set(TAGS_KEY, r#"{"tags": 3}"#).await?;

        let loaded: Loaded<Vec<String>> = load_json(&storage, TAGS_KEY).await;
        assert_eq!(loaded.source, LoadSource::Recovered);
        Ok(())
    }

    #[tokio::test]
    async fn test_backend_read_failure_is_recovered() {
        let loaded: Loaded<Vec<String>> = load_json(&FailingStorage, TAGS_KEY).await;
        assert!(loaded.value.is_empty());
        assert!(loaded.was_recovered());
    }

    #[tokio::test]
    async fn test_backend_write_failure_propagates() {
        let result = save_json(&FailingStorage, TAGS_KEY, &vec!["a".to_string()]).await;
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[tokio::test]
    async fn test_save_then_load_is_stored() -> Result<()> {
        let storage = MemoryStorage::new();
        save_json(&storage, TAGS_KEY, &vec!["dairy".to_string()]).await?;

        let loaded: Loaded<Vec<String>> = load_json(&storage, TAGS_KEY).await;
        assert_eq!(loaded.source, LoadSource::Stored);
        assert_eq!(loaded.into_inner(), vec!["dairy".to_string()]);
        Ok(())
    }
}
