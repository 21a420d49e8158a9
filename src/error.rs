//! Error types for the API client and the command-line shell.
//!
//! The formatting core never returns errors; it degrades to empty output
//! instead. Everything that talks to the network, the filesystem or the
//! environment reports through [`Error`].

use thiserror::Error;

/// Main error type for vessel-notify.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level HTTP failure (connection, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status code.
    #[error("API returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid command-line input.
    #[error("invalid input: {0}")]
    Input(String),
}

/// Result type alias for vessel-notify
pub type Result<T> = std::result::Result<T, Error>;
