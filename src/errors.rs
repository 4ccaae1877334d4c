use thiserror::Error;

/// Every failure the crate reports.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration, or a bad unit type name
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// SeaORM failure in the local store
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JSON encode or decode failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request never got a response (connect, TLS, body read)
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("API request failed ({status}): {message}")]
    Api { status: u16, message: String },

    /// Reading a config file or binding a socket failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
