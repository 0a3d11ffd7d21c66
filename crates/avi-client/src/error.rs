//! Controller API client errors

use thiserror::Error;

/// Errors that can occur when talking to the load-balancer controller API
#[derive(Debug, Error)]
pub enum AviError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Controller API returned an error
    #[error("controller API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (bad credentials, expired session)
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Resource not found
    #[error("not found: {0}")]
    NotFound(String),
}
