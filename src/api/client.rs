//! HTTP client for the inventory REST API.
//!
//! Requests carry `Authorization: Bearer <key>` unless the key is the
//! [`DEV_BYPASS_KEY`] sentinel, in which case no credentials are sent at all.
//! Responses shaped `{"data": ...}` are unwrapped; anything else is used as
//! is. Non-2xx responses become [`Error::Api`] with the server's `message`
//! when it sent one.

use super::{API_PREFIX, DEFAULT_EXPIRING_DAYS, DEV_BYPASS_KEY, ItemQuery};
use crate::config::ApiConfig;
use crate::errors::{Error, Result};
use crate::models::{Item, ItemId, NewItem};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, instrument, warn};

/// A store location as listed by `GET /locations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Server-assigned id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Display name
    pub name: String,
    /// Any other attributes the server sends
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Dashboard counters from `GET /stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryStats {
    /// Number of items in stock
    pub total_items: Option<u64>,
    /// Items already past their expiry date
    pub expired: Option<u64>,
    /// Items inside the expiring window
    pub expiring_soon: Option<u64>,
    /// Stock value in store currency
    pub total_value: Option<f64>,
    /// Any other counters the server sends
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Client bound to one API key and server.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("dev_bypass", &self.is_dev_bypass())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client. One trailing `/` is stripped from `base_url`.
    #[must_use]
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Self {
        let api_key = api_key.into();
        if api_key == DEV_BYPASS_KEY {
            warn!("API client created with the dev-bypass key; requests will be unauthenticated");
        }

        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: base_url.strip_suffix('/').unwrap_or(base_url).to_string(),
        }
    }

    /// Creates a client from the `[api]` configuration section.
    #[must_use]
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.api_key.clone(), &config.base_url)
    }

    /// Base URL without the trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// True when requests are sent without an `Authorization` header.
    #[must_use]
    pub fn is_dev_bypass(&self) -> bool {
        self.api_key == DEV_BYPASS_KEY
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, endpoint)
    }

    /// Builds the request for `method endpoint` without sending it.
    ///
    /// `data` is serialized as the JSON body only for POST, PUT and PATCH.
    pub fn build_request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        data: Option<&Value>,
    ) -> Result<Request> {
        let sends_body = method == Method::POST || method == Method::PUT || method == Method::PATCH;

        let mut builder = self
            .http
            .request(method, self.url(endpoint))
            .header(CONTENT_TYPE, "application/json");

        if !query.is_empty() {
            builder = builder.query(query);
        }
        if !self.is_dev_bypass() {
            builder = builder.bearer_auth(&self.api_key);
        }
        if sends_body && let Some(data) = data {
            builder = builder.body(serde_json::to_vec(data)?);
        }

        builder.build().map_err(Into::into)
    }

    /// Sends one request and returns the parsed JSON body.
    ///
    /// Returns `Ok(None)` for 204 responses and empty bodies.
    ///
    /// # Errors
    /// `Error::Http` on transport failure, `Error::Api` on a non-2xx status,
    /// `Error::Serialization` when a success body is not JSON.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        data: Option<&Value>,
    ) -> Result<Option<Value>> {
        self.request_with_query(method, endpoint, &[], data).await
    }

    #[instrument(skip(self, query, data), fields(base_url = %self.base_url))]
    async fn request_with_query(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        data: Option<&Value>,
    ) -> Result<Option<Value>> {
        let request = self.build_request(method, endpoint, query, data)?;
        debug!("{} {}", request.method(), request.url());

        let response = self.http.execute(request).await?;
        read_response(response).await
    }

    /// `GET /items` with the options set in `query`.
    pub async fn get_items(&self, query: &ItemQuery) -> Result<Vec<Item>> {
        let body = self
            .request_with_query(Method::GET, "/items", &query.to_pairs(), None)
            .await?;
        decode(body)
    }

    /// `GET /items/{id}`.
    pub async fn get_item(&self, id: ItemId) -> Result<Item> {
        let body = self
            .request(Method::GET, &format!("/items/{id}"), None)
            .await?;
        decode(body)
    }

    /// `POST /items`.
    pub async fn create_item(&self, item: &NewItem) -> Result<Item> {
        let payload = serde_json::to_value(item)?;
        let body = self
            .request(Method::POST, "/items", Some(&payload))
            .await?;
        decode(body)
    }

    /// `PUT /items/{id}`.
    pub async fn update_item(&self, id: ItemId, item: &NewItem) -> Result<Item> {
        let payload = serde_json::to_value(item)?;
        let body = self
            .request(Method::PUT, &format!("/items/{id}"), Some(&payload))
            .await?;
        decode(body)
    }

    /// `DELETE /items/{id}`. Any success body is ignored.
    pub async fn delete_item(&self, id: ItemId) -> Result<()> {
        self.request(Method::DELETE, &format!("/items/{id}"), None)
            .await?;
        Ok(())
    }

    /// `GET /items/expiring?days=N`, defaulting to [`DEFAULT_EXPIRING_DAYS`].
    pub async fn get_expiring_items(&self, days: Option<u32>) -> Result<Vec<Item>> {
        let days = days.unwrap_or(DEFAULT_EXPIRING_DAYS);
        let body = self
            .request(Method::GET, &format!("/items/expiring?days={days}"), None)
            .await?;
        decode(body)
    }

    /// `GET /locations`.
    pub async fn get_locations(&self) -> Result<Vec<Location>> {
        let body = self.request(Method::GET, "/locations", None).await?;
        decode(body)
    }

    /// `GET /stats`.
    pub async fn get_stats(&self) -> Result<InventoryStats> {
        let body = self.request(Method::GET, "/stats", None).await?;
        decode(body)
    }

    /// `POST /items/bulk` with body `{"items": [...]}`.
    pub async fn bulk_create_items(&self, items: &[NewItem]) -> Result<Vec<Item>> {
        let payload = json!({ "items": items });
        let body = self
            .request(Method::POST, "/items/bulk", Some(&payload))
            .await?;
        decode(body)
    }
}

async fn read_response(response: Response) -> Result<Option<Value>> {
    let status = response.status();

    if !status.is_success() {
        let message = error_message(status, response.bytes().await.ok().as_deref());
        warn!("API request failed ({}): {}", status.as_u16(), message);
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }

    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Best-effort error text: the body's `message`, else the status reason.
fn error_message(status: StatusCode, body: Option<&[u8]>) -> String {
    body.and_then(|bytes| serde_json::from_slice::<Value>(bytes).ok())
        .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_owned))
        .or_else(|| status.canonical_reason().map(str::to_owned))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

/// Takes `data` out of a `{"data": ...}` envelope, or returns the body as is.
#[must_use]
pub fn unwrap_envelope(body: Option<Value>) -> Value {
    match body {
        Some(Value::Object(mut map)) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        Some(other) => other,
        None => Value::Null,
    }
}

fn decode<T: DeserializeOwned>(body: Option<Value>) -> Result<T> {
    serde_json::from_value(unwrap_envelope(body)).map_err(Into::into)
}
