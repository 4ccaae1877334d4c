//! Application configuration loading.
//!
//! Settings come from an optional `verishelf.toml` file and are then
//! overridden by environment variables (a `.env` file is loaded first when
//! present). The resulting [`AppConfig`] is validated before use.

use crate::api::DEV_BYPASS_KEY;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "verishelf.toml";

/// Full application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Remote REST API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Local key-value store settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API server, without the `/api/v1` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token sent with every request
    #[serde(default)]
    pub api_key: String,
    /// Whether the `dev-bypass` sentinel key is accepted
    #[serde(default)]
    pub allow_dev_bypass: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            allow_dev_bypass: false,
        }
    }
}

/// Local store settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// `SeaORM` connection URL of the `SQLite` database
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_database_url() -> String {
    crate::config::database::DEFAULT_DATABASE_URL.to_string()
}

impl AppConfig {
    /// Applies overrides from a variable lookup (normally the process environment).
    ///
    /// Recognised variables: `VERISHELF_API_URL`, `VERISHELF_API_KEY`,
    /// `VERISHELF_ALLOW_DEV_BYPASS` and `DATABASE_URL`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("VERISHELF_API_URL") {
            self.api.base_url = url;
        }
        if let Some(key) = lookup("VERISHELF_API_KEY") {
            self.api.api_key = key;
        }
        if let Some(flag) = lookup("VERISHELF_ALLOW_DEV_BYPASS") {
            self.api.allow_dev_bypass = matches!(flag.trim(), "1" | "true" | "yes");
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.storage.database_url = url;
        }
    }

    /// Checks the configuration for values that cannot work.
    ///
    /// # Errors
    /// Returns `Error::Config` when the base URL is empty, or when the
    /// `dev-bypass` key is configured without `allow_dev_bypass`.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::Config {
                message: "api.base_url cannot be empty".to_string(),
            });
        }

        if self.api.api_key == DEV_BYPASS_KEY {
            if !self.api.allow_dev_bypass {
                return Err(Error::Config {
                    message: format!(
                        "api key '{DEV_BYPASS_KEY}' disables authentication; set allow_dev_bypass to use it"
                    ),
                });
            }
            warn!("Development auth bypass enabled; requests will be sent without credentials");
        }

        Ok(())
    }
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config file {}: {e}", path_ref.display()),
    })
}

/// Loads `.env`, the optional `verishelf.toml`, and environment overrides.
///
/// # Errors
/// Returns an error if an existing config file is malformed or the final
/// configuration fails validation.
pub fn load_app_configuration() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config = if Path::new(DEFAULT_CONFIG_PATH).exists() {
        load_config(DEFAULT_CONFIG_PATH)?
    } else {
        debug!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
        AppConfig::default()
    };

    config.apply_overrides(|name| std::env::var(name).ok());
    config.validate()?;

    info!(
        "Configuration loaded (api: {}, store: {})",
        config.api.base_url, config.storage.database_url
    );
    Ok(config)
}
