//! Authenticated controller API session
//!
//! Implements the REST session against the load-balancer controller:
//! by-name object lookup, tenant/cloud reference resolution, and the macro
//! verb dispatch used for create/update/delete of composite objects.

use crate::avi_trait::AviClientTrait;
use crate::error::AviError;
use crate::models::*;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Authenticated controller API session
pub struct AviSession {
    client: Client,
    base_url: String,
    username: String,
    password: String,
    api_version: String,
}

impl AviSession {
    /// Create a new controller session
    ///
    /// # Arguments
    /// * `base_url` - controller base URL (e.g., "https://avi-controller")
    /// * `username` / `password` - API credentials, sent as basic auth
    /// * `api_version` - controller API version header value
    /// * `timeout` - per-request HTTP timeout
    /// * `insecure` - skip TLS certificate verification (self-signed controller certs)
    pub fn new(
        base_url: String,
        username: String,
        password: String,
        api_version: String,
        timeout: Duration,
        insecure: bool,
    ) -> Result<Self, AviError> {
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(insecure)
            .build()
            .map_err(AviError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            password,
            api_version,
        })
    }

    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
            .header("X-Avi-Version", &self.api_version)
            .header("Accept", "application/json")
    }

    /// Fetch all pages of a collection endpoint
    async fn fetch_collection<T: for<'de> serde::Deserialize<'de>>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, AviError> {
        let mut url = self.build_url(path);
        let mut all_results = Vec::new();

        loop {
            debug!("GET {}", url);

            let response = self
                .request(Method::GET, &url)
                .send()
                .await
                .map_err(AviError::Http)?;

            let status = response.status();
            if status == 401 || status == 403 {
                let body = response.text().await.unwrap_or_default();
                return Err(AviError::Authentication(format!("{} - {}", status, body)));
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(AviError::Api(format!(
                    "GET {} failed: {} - {}",
                    path, status, body
                )));
            }

            let page: CollectionResponse<T> = response.json().await.map_err(AviError::Http)?;
            all_results.extend(page.results);

            match page.next {
                Some(next_url) => url = self.build_url(&next_url),
                None => break,
            }
        }

        Ok(all_results)
    }

    /// Look up a single object of `resource` by exact name
    async fn get_by_name<T: for<'de> serde::Deserialize<'de>>(
        &self,
        resource: &str,
        name: &str,
    ) -> Result<Option<T>, AviError> {
        let path = format!("/api/{}?name={}", resource, urlencoding::encode(name));
        let mut results: Vec<T> = self.fetch_collection(&path).await?;
        if results.is_empty() {
            Ok(None)
        } else {
            Ok(Some(results.swap_remove(0)))
        }
    }

    async fn send_with_body(
        &self,
        method: Method,
        path: &str,
        payload: &Value,
    ) -> Result<reqwest::Response, AviError> {
        let url = self.build_url(path);
        debug!("{} {}", method, url);

        let response = self
            .request(method.clone(), &url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(AviError::Http)?;

        let status = response.status();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(AviError::Authentication(format!("{} - {}", status, body)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AviError::Api(format!(
                "{} {} failed: {} - {}",
                method, path, status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl AviClientTrait for AviSession {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_virtual_service_by_name(
        &self,
        name: &str,
    ) -> Result<Option<VirtualService>, AviError> {
        self.get_by_name("virtualservice", name).await
    }

    async fn list_virtual_services(&self) -> Result<Vec<VirtualService>, AviError> {
        self.fetch_collection("/api/virtualservice").await
    }

    async fn get_pool_group_by_name(&self, name: &str) -> Result<Option<PoolGroup>, AviError> {
        self.get_by_name("poolgroup", name).await
    }

    async fn resolve_tenant_ref(&self, tenant: &str) -> Result<String, AviError> {
        let obj: RefObject = self
            .get_by_name("tenant", tenant)
            .await?
            .ok_or_else(|| AviError::NotFound(format!("tenant {} not found", tenant)))?;
        Ok(obj.url)
    }

    async fn resolve_cloud_ref(&self, cloud: &str) -> Result<String, AviError> {
        let obj: RefObject = self
            .get_by_name("cloud", cloud)
            .await?
            .ok_or_else(|| AviError::NotFound(format!("cloud {} not found", cloud)))?;
        Ok(obj.url)
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<Value, AviError> {
        let response = self.send_with_body(Method::POST, path, payload).await?;
        response.json().await.map_err(AviError::Http)
    }

    async fn put(&self, path: &str, payload: &Value) -> Result<Value, AviError> {
        let response = self.send_with_body(Method::PUT, path, payload).await?;
        response.json().await.map_err(AviError::Http)
    }

    async fn delete(&self, path: &str, payload: &Value) -> Result<(), AviError> {
        self.send_with_body(Method::DELETE, path, payload).await?;
        Ok(())
    }
}
