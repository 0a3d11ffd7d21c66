//! Metadata store client errors

use thiserror::Error;

/// Errors that can occur when reading the metadata store
#[derive(Debug, Error)]
pub enum MetadataError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Metadata store returned an error response
    #[error("metadata API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store did not become reachable within the startup window
    #[error("metadata store not ready: {0}")]
    NotReady(String),
}
