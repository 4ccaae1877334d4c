//! Entity module - Contains the SeaORM entity definitions for the local store.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod kv_entry;

pub use kv_entry::{Column as KvEntryColumn, Entity as KvEntry, Model as KvEntryModel};
