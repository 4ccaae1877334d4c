//! REST API client for the VeriShelf inventory service.
//!
//! A thin mapping from typed calls to HTTP requests under `{base}/api/v1`.
//! There is no retry, caching or request de-duplication: each call issues
//! exactly one request and overlapping calls resolve independently.

pub mod client;
pub mod query;

pub use client::{ApiClient, InventoryStats, Location};
pub use query::{ItemQuery, SortOrder};

/// Path prefix every endpoint lives under.
pub const API_PREFIX: &str = "/api/v1";

/// API key that makes the client skip the `Authorization` header.
///
/// Meant for local development only; [`crate::config::AppConfig::validate`]
/// refuses it unless `allow_dev_bypass` is set.
pub const DEV_BYPASS_KEY: &str = "dev-bypass";

/// Window used by [`ApiClient::get_expiring_items`] when none is given.
pub const DEFAULT_EXPIRING_DAYS: u32 = 30;
