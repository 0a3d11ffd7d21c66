//! Controller errors

use avi_client::AviError;
use metadata_client::MetadataError;
use thiserror::Error;

/// Errors that can occur in the sync controller
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Metadata store error
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Controller API error
    #[error("controller API error: {0}")]
    Avi(#[from] AviError),

    /// Invalid or missing configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization error while assembling a payload
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Health endpoint I/O error
    #[error("health endpoint error: {0}")]
    Io(#[from] std::io::Error),

    /// A background task exited abnormally
    #[error("task error: {0}")]
    Task(String),
}
