//! Tag list management.
//!
//! Tags are plain strings kept in insertion order without duplicates. Each
//! mutator reads the whole list, changes it, and writes it back; two callers
//! racing on the same store can lose one update (last write wins).

use crate::errors::Result;
use crate::storage::{Loaded, Storage, TAGS_KEY, load_json, save_json};
use tracing::{debug, info};

/// Loads the stored tag list.
pub async fn get_tags(storage: &dyn Storage) -> Loaded<Vec<String>> {
    load_json(storage, TAGS_KEY).await
}

/// Replaces the stored tag list.
pub async fn save_tags(storage: &dyn Storage, tags: &[String]) -> Result<()> {
    save_json(storage, TAGS_KEY, tags).await
}

/// Adds `tag` unless it is already present. Returns the resulting list.
pub async fn add_tag(storage: &dyn Storage, tag: &str) -> Result<Vec<String>> {
    let mut tags = get_tags(storage).await.into_inner();

    if tags.iter().any(|existing| existing == tag) {
        debug!("Tag '{}' already present", tag);
        return Ok(tags);
    }

    tags.push(tag.to_string());
    save_tags(storage, &tags).await?;
    info!("Added tag '{}'", tag);
    Ok(tags)
}

/// Removes every entry equal to `tag`. Returns the resulting list.
pub async fn delete_tag(storage: &dyn Storage, tag: &str) -> Result<Vec<String>> {
    let mut tags = get_tags(storage).await.into_inner();
    tags.retain(|existing| existing != tag);
    save_tags(storage, &tags).await?;
    info!("Deleted tag '{}'", tag);
    Ok(tags)
}
