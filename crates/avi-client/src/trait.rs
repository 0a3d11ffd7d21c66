//! AviClient trait for mocking
//!
//! This trait abstracts the controller session to enable mocking in unit
//! tests. The concrete AviSession implements this trait, and tests use the
//! in-memory mock implementation.

use crate::error::AviError;
use crate::models::*;
use serde_json::Value;

/// Trait for controller API operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait AviClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// Look up a virtual service by exact name
    async fn get_virtual_service_by_name(
        &self,
        name: &str,
    ) -> Result<Option<VirtualService>, AviError>;

    /// List all virtual services visible to the session
    async fn list_virtual_services(&self) -> Result<Vec<VirtualService>, AviError>;

    /// Look up a pool group by exact name
    async fn get_pool_group_by_name(&self, name: &str) -> Result<Option<PoolGroup>, AviError>;

    /// Resolve a tenant name to its resource reference URL
    async fn resolve_tenant_ref(&self, tenant: &str) -> Result<String, AviError>;

    /// Resolve a cloud name to its resource reference URL
    async fn resolve_cloud_ref(&self, cloud: &str) -> Result<String, AviError>;

    /// Issue a create call
    async fn post(&self, path: &str, payload: &Value) -> Result<Value, AviError>;

    /// Issue an update call
    async fn put(&self, path: &str, payload: &Value) -> Result<Value, AviError>;

    /// Issue a delete call
    async fn delete(&self, path: &str, payload: &Value) -> Result<(), AviError>;
}
