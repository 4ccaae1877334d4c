/// Database connection and table creation for the local store
pub mod database;

/// Application settings loaded from `verishelf.toml` and the environment
pub mod settings;

pub use settings::{ApiConfig, AppConfig, StorageConfig, load_app_configuration, load_config};
