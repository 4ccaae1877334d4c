//! Custom field definitions.
//!
//! Stores user-defined item attributes (label, type, options, ...) as
//! free-form JSON objects. Each definition gets an id taken from its creation
//! time in milliseconds.

use crate::errors::Result;
use crate::storage::{CUSTOM_FIELDS_KEY, Loaded, Storage, load_json, save_json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// One custom field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldDefinition {
    /// Creation timestamp (ms since the epoch), unique per collection
    pub id: i64,
    /// Everything else about the field
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl CustomFieldDefinition {
    /// Convenience accessor for a string attribute.
    #[must_use]
    pub fn attribute_str(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }
}

/// Loads all custom field definitions.
pub async fn get_custom_fields(storage: &dyn Storage) -> Loaded<Vec<CustomFieldDefinition>> {
    load_json(storage, CUSTOM_FIELDS_KEY).await
}

/// Replaces the stored definitions.
pub async fn save_custom_fields(
    storage: &dyn Storage,
    fields: &[CustomFieldDefinition],
) -> Result<()> {
    save_json(storage, CUSTOM_FIELDS_KEY, fields).await
}

/// Appends a new definition stamped with the current time.
///
/// When the clock would repeat an id already in use (two fields created in
/// the same millisecond), the id is moved past the largest existing one.
pub async fn add_custom_field(
    storage: &dyn Storage,
    mut attributes: Map<String, Value>,
) -> Result<CustomFieldDefinition> {
    let mut fields = get_custom_fields(storage).await.into_inner();

    let now_ms = Utc::now().timestamp_millis();
    let id = match fields.iter().map(|field| field.id).max() {
        Some(max_id) if max_id >= now_ms => max_id + 1,
        _ => now_ms,
    };

    attributes.remove("id");
    let field = CustomFieldDefinition { id, attributes };
    fields.push(field.clone());
    save_custom_fields(storage, &fields).await?;

    info!("Added custom field {}", id);
    Ok(field)
}

/// Merges `patch` into the definition with `id`. Unknown ids change nothing.
///
/// Returns the updated definition, or `None` when `id` was not found.
pub async fn update_custom_field(
    storage: &dyn Storage,
    id: i64,
    patch: Map<String, Value>,
) -> Result<Option<CustomFieldDefinition>> {
    let mut fields = get_custom_fields(storage).await.into_inner();

    let Some(field) = fields.iter_mut().find(|field| field.id == id) else {
        debug!("Custom field {} not found, nothing to update", id);
        return Ok(None);
    };

    for (key, value) in patch {
        if key != "id" {
            field.attributes.insert(key, value);
        }
    }
    let updated = field.clone();

    save_custom_fields(storage, &fields).await?;
    info!("Updated custom field {}", id);
    Ok(Some(updated))
}

/// Removes the definition with `id`. Returns the remaining definitions.
pub async fn delete_custom_field(
    storage: &dyn Storage,
    id: i64,
) -> Result<Vec<CustomFieldDefinition>> {
    let mut fields = get_custom_fields(storage).await.into_inner();
    fields.retain(|field| field.id != id);
    save_custom_fields(storage, &fields).await?;
    info!("Deleted custom field {}", id);
    Ok(fields)
}
