//! MetadataClient trait for mocking
//!
//! This trait abstracts the MetadataClient to enable mocking in unit tests.
//! The concrete MetadataClient implements this trait, and tests can use mock
//! implementations.

use crate::error::MetadataError;
use crate::models::*;

/// Trait for metadata store read operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait MetadataClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// List all services with their containers and labels
    async fn list_services(&self) -> Result<Vec<Service>, MetadataError>;

    /// Look up the stack the querying process runs in
    async fn self_stack(&self) -> Result<Stack, MetadataError>;

    /// Fetch the opaque metadata version token
    async fn version(&self) -> Result<String, MetadataError>;

    /// Block until the store answers, polling once per second
    async fn wait_for_ready(&self, max_attempts: u32) -> Result<(), MetadataError>;
}
