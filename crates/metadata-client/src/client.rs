//! Metadata store API client
//!
//! Implements the read-only client for the service-discovery metadata
//! endpoint: service/container enumeration, self-stack lookup and version
//! polling.

use crate::error::MetadataError;
use crate::metadata_trait::MetadataClientTrait;
use crate::models::*;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Metadata store API client
pub struct MetadataClient {
    client: Client,
    base_url: String,
}

impl MetadataClient {
    /// Create a new metadata client
    ///
    /// # Arguments
    /// * `base_url` - versioned metadata base URL (e.g., "http://rancher-metadata/2016-07-29")
    /// * `timeout` - per-request HTTP timeout
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, MetadataError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(MetadataError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: for<'de> serde::Deserialize<'de>>(&self, path: &str) -> Result<T, MetadataError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(MetadataError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::Api(format!(
                "GET {} failed: {} - {}",
                path, status, body
            )));
        }

        response.json().await.map_err(MetadataError::Http)
    }
}

#[async_trait::async_trait]
impl MetadataClientTrait for MetadataClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List all services with their containers and labels.
    async fn list_services(&self) -> Result<Vec<Service>, MetadataError> {
        self.get("/services").await
    }

    /// Look up the stack the querying process runs in.
    ///
    /// The stack carries the environment identifier used to namespace
    /// pool names across environments sharing one controller.
    async fn self_stack(&self) -> Result<Stack, MetadataError> {
        self.get("/self/stack").await
    }

    /// Fetch the opaque version token that changes on every metadata update.
    async fn version(&self) -> Result<String, MetadataError> {
        self.get("/version").await
    }

    /// Block until the metadata store answers a version request.
    ///
    /// Polls once per second for up to `max_attempts` attempts. Failure here
    /// is treated as unrecoverable by the controller: without a reachable
    /// metadata store there is nothing to reconcile from.
    async fn wait_for_ready(&self, max_attempts: u32) -> Result<(), MetadataError> {
        let mut last_err = String::new();
        for attempt in 1..=max_attempts {
            match self.version().await {
                Ok(_) => {
                    debug!("metadata store reachable after {} attempt(s)", attempt);
                    return Ok(());
                }
                Err(e) => {
                    warn!("metadata store not ready (attempt {}/{}): {}", attempt, max_attempts, e);
                    last_err = e.to_string();
                }
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        Err(MetadataError::NotReady(format!(
            "gave up after {} attempts: {}",
            max_attempts, last_err
        )))
    }
}
