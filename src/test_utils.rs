//! Shared test utilities for VeriShelf.
//!
//! Helpers for tracing output, an in-memory `SQLite` store, and a one-shot
//! axum server for exercising the API client without a real backend.

#![allow(clippy::unwrap_used)]

use crate::{errors::Result, storage::SqliteStorage};
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, oneshot};
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once; later calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates a `SqliteStorage` over a fresh in-memory database with tables created.
pub async fn setup_sqlite_storage() -> Result<SqliteStorage> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(SqliteStorage::new(db))
}

/// The first request a [`TestServer`] received.
#[derive(Debug)]
pub struct RecordedRequest {
    /// HTTP method
    pub method: Method,
    /// Path and query, e.g. `/api/v1/items?page=2`
    pub uri: String,
    /// All request headers
    pub headers: HeaderMap,
    /// Raw request body
    pub body: Bytes,
}

impl RecordedRequest {
    /// Header value as text, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Body parsed as JSON (`Null` when empty).
    pub fn body_json(&self) -> Value {
        if self.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&self.body).unwrap()
        }
    }
}

/// A server that answers every request with one canned response and records
/// the first request it sees.
pub struct TestServer {
    /// `http://127.0.0.1:<port>`
    pub base_url: String,
    received: oneshot::Receiver<RecordedRequest>,
}

impl TestServer {
    /// Waits for the recorded request.
    pub async fn request(self) -> RecordedRequest {
        self.received.await.unwrap()
    }
}

#[derive(Clone)]
struct CannedReply {
    status: StatusCode,
    body: String,
    recorder: Arc<Mutex<Option<oneshot::Sender<RecordedRequest>>>>,
}

async fn record_and_reply(
    State(reply): State<CannedReply>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(tx) = reply.recorder.lock().await.take() {
        let _ = tx.send(RecordedRequest {
            method,
            uri: uri.to_string(),
            headers,
            body,
        });
    }

    if reply.body.is_empty() {
        reply.status.into_response()
    } else {
        (
            reply.status,
            [(header::CONTENT_TYPE, "application/json")],
            reply.body,
        )
            .into_response()
    }
}

/// Starts a [`TestServer`] replying with `status` and `body` on any route.
pub async fn serve_once(status: u16, body: &str) -> Result<TestServer> {
    let (tx, rx) = oneshot::channel();
    let reply = CannedReply {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.to_string(),
        recorder: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new().fallback(record_and_reply).with_state(reply);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    Ok(TestServer {
        base_url,
        received: rx,
    })
}
