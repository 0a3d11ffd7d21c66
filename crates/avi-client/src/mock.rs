//! Mock AviClient for unit testing
//!
//! This module provides a mock implementation of AviClientTrait that can be
//! used in unit tests without requiring a running controller. It stores
//! virtual services and pool groups in memory, understands the macro verb
//! envelope, and records every create/update/delete call for assertions.

use crate::avi_trait::AviClientTrait;
use crate::error::AviError;
use crate::models::*;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One recorded create/update/delete call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub path: String,
    pub payload: Value,
}

/// Mock AviClient for testing
///
/// Macro-envelope create calls materialize a virtual service (with a
/// generated uuid and pool-group ref) plus its pool group, so the
/// update path's uuid recovery works against the mock too.
#[derive(Clone)]
pub struct MockAviClient {
    base_url: String,
    virtual_services: Arc<Mutex<HashMap<String, VirtualService>>>,
    pool_groups: Arc<Mutex<HashMap<String, PoolGroup>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    next_id: Arc<Mutex<u64>>,
}

impl MockAviClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            virtual_services: Arc::new(Mutex::new(HashMap::new())),
            pool_groups: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Add a virtual service to the mock store (for test setup)
    pub fn add_virtual_service(&self, vs: VirtualService) {
        self.virtual_services
            .lock()
            .unwrap()
            .insert(vs.name.clone(), vs);
    }

    /// Add a pool group to the mock store (for test setup)
    pub fn add_pool_group(&self, pg: PoolGroup) {
        self.pool_groups.lock().unwrap().insert(pg.name.clone(), pg);
    }

    /// All recorded create/update/delete calls, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Forget recorded calls (between test phases)
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Names of all stored virtual services
    pub fn virtual_service_names(&self) -> Vec<String> {
        self.virtual_services.lock().unwrap().keys().cloned().collect()
    }

    fn next_id(&self) -> u64 {
        let mut id = self.next_id.lock().unwrap();
        let current = *id;
        *id += 1;
        current
    }

    fn record(&self, method: &str, path: &str, payload: &Value) {
        self.calls.lock().unwrap().push(RecordedCall {
            method: method.to_string(),
            path: path.to_string(),
            payload: payload.clone(),
        });
    }

    /// Materialize a macro-envelope submission into the stores.
    fn store_from_envelope(&self, payload: &Value, keep_uuid: bool) -> Result<(), AviError> {
        let data = payload
            .get("data")
            .cloned()
            .ok_or_else(|| AviError::Api("macro payload missing data".to_string()))?;
        let mut vs: VirtualService = serde_json::from_value(data.clone())?;

        let id = self.next_id();
        let mut services = self.virtual_services.lock().unwrap();
        if keep_uuid {
            if let Some(existing) = services.get(&vs.name) {
                vs.uuid = existing.uuid.clone();
                vs.pool_group_ref = existing.pool_group_ref.clone();
            }
        }
        if vs.uuid.is_none() {
            vs.uuid = Some(format!("virtualservice-{}", id));
        }

        let pg_name = data
            .get("pool_group_ref_data")
            .and_then(|pg| pg.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if !pg_name.is_empty() {
            if vs.pool_group_ref.is_none() {
                vs.pool_group_ref = Some(format!(
                    "{}/api/poolgroup/poolgroup-{}",
                    self.base_url, id
                ));
            }
            self.pool_groups.lock().unwrap().insert(
                pg_name.clone(),
                PoolGroup {
                    name: pg_name,
                    uuid: Some(format!("poolgroup-{}", id)),
                    members: vec![PoolGroupMemberRef {
                        pool_ref: format!("{}/api/pool/pool-{}", self.base_url, id),
                        rest: serde_json::Map::new(),
                    }],
                    rest: serde_json::Map::new(),
                },
            );
        }

        services.insert(vs.name.clone(), vs);
        Ok(())
    }
}

#[async_trait::async_trait]
impl AviClientTrait for MockAviClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_virtual_service_by_name(
        &self,
        name: &str,
    ) -> Result<Option<VirtualService>, AviError> {
        Ok(self.virtual_services.lock().unwrap().get(name).cloned())
    }

    async fn list_virtual_services(&self) -> Result<Vec<VirtualService>, AviError> {
        Ok(self.virtual_services.lock().unwrap().values().cloned().collect())
    }

    async fn get_pool_group_by_name(&self, name: &str) -> Result<Option<PoolGroup>, AviError> {
        Ok(self.pool_groups.lock().unwrap().get(name).cloned())
    }

    async fn resolve_tenant_ref(&self, tenant: &str) -> Result<String, AviError> {
        Ok(format!("{}/api/tenant/tenant-{}", self.base_url, tenant))
    }

    async fn resolve_cloud_ref(&self, cloud: &str) -> Result<String, AviError> {
        Ok(format!("{}/api/cloud/cloud-{}", self.base_url, cloud))
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<Value, AviError> {
        self.record("POST", path, payload);
        self.store_from_envelope(payload, false)?;
        Ok(Value::Null)
    }

    async fn put(&self, path: &str, payload: &Value) -> Result<Value, AviError> {
        self.record("PUT", path, payload);
        self.store_from_envelope(payload, true)?;
        Ok(Value::Null)
    }

    async fn delete(&self, path: &str, payload: &Value) -> Result<(), AviError> {
        self.record("DELETE", path, payload);
        if let Some(name) = payload
            .get("data")
            .and_then(|d| d.get("name"))
            .and_then(Value::as_str)
        {
            self.virtual_services.lock().unwrap().remove(name);
        }
        Ok(())
    }
}
