//! Application context - wires configuration, the local store and the API
//! client together for the dashboard and mobile front ends.

use crate::api::ApiClient;
use crate::config::{self, AppConfig};
use crate::errors::Result;
use crate::storage::{SqliteStorage, Storage};
use std::sync::Arc;
use tracing::{error, info};

/// Everything a screen needs: settings, local storage and the remote API.
#[derive(Clone)]
pub struct AppContext {
    /// Validated configuration
    pub config: Arc<AppConfig>,
    /// Local key-value store for tags, settings and cached items
    pub storage: Arc<dyn Storage>,
    /// Client for the remote inventory API
    pub api: ApiClient,
}

impl AppContext {
    /// Builds a context from already-validated configuration and a store.
    #[must_use]
    pub fn new(config: AppConfig, storage: Arc<dyn Storage>) -> Self {
        let api = ApiClient::from_config(&config.api);
        Self {
            config: Arc::new(config),
            storage,
            api,
        }
    }

    /// Validates `config`, opens its `SQLite` store and builds the context.
    pub async fn from_config(config: AppConfig) -> Result<Self> {
        config.validate()?;

        let storage = SqliteStorage::connect(&config.storage.database_url)
            .await
            .inspect(|_| info!("Local store opened."))
            .inspect_err(|e| error!("Failed to open local store: {}", e))?;

        Ok(Self::new(config, Arc::new(storage)))
    }

    /// Loads `.env`, `verishelf.toml` and the environment, then builds the context.
    pub async fn bootstrap() -> Result<Self> {
        let app_config = config::load_app_configuration()
            .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
        Self::from_config(app_config).await
    }
}
