//! Mock MetadataClient for unit testing
//!
//! This module provides a mock implementation of MetadataClientTrait that can
//! be used in unit tests without requiring a running metadata store.

use crate::error::MetadataError;
use crate::metadata_trait::MetadataClientTrait;
use crate::models::*;
use std::sync::{Arc, Mutex};

/// Mock MetadataClient for testing
///
/// Stores services, the self stack and the version token in memory;
/// tests configure the snapshot through the setter methods.
#[derive(Clone)]
pub struct MockMetadataClient {
    base_url: String,
    services: Arc<Mutex<Vec<Service>>>,
    stack: Arc<Mutex<Stack>>,
    version: Arc<Mutex<String>>,
}

impl MockMetadataClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            services: Arc::new(Mutex::new(Vec::new())),
            stack: Arc::new(Mutex::new(Stack {
                name: "lb-sync".to_string(),
                environment_uuid: String::new(),
            })),
            version: Arc::new(Mutex::new("v0".to_string())),
        }
    }

    /// Add a service to the mock snapshot (for test setup)
    pub fn add_service(&self, service: Service) {
        self.services.lock().unwrap().push(service);
    }

    /// Replace the whole service snapshot (for test setup)
    pub fn set_services(&self, services: Vec<Service>) {
        *self.services.lock().unwrap() = services;
    }

    /// Set the self stack returned by `self_stack` (for test setup)
    pub fn set_stack(&self, stack: Stack) {
        *self.stack.lock().unwrap() = stack;
    }

    /// Set the version token returned by `version` (for test setup)
    pub fn set_version(&self, version: impl Into<String>) {
        *self.version.lock().unwrap() = version.into();
    }
}

#[async_trait::async_trait]
impl MetadataClientTrait for MockMetadataClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn list_services(&self) -> Result<Vec<Service>, MetadataError> {
        Ok(self.services.lock().unwrap().clone())
    }

    async fn self_stack(&self) -> Result<Stack, MetadataError> {
        Ok(self.stack.lock().unwrap().clone())
    }

    async fn version(&self) -> Result<String, MetadataError> {
        Ok(self.version.lock().unwrap().clone())
    }

    async fn wait_for_ready(&self, _max_attempts: u32) -> Result<(), MetadataError> {
        Ok(())
    }
}
