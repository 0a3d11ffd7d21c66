//! Controller configuration
//!
//! All knobs come from environment variables, loaded once at startup and
//! passed around explicitly; there is no ambient configuration state.

use crate::error::ControllerError;
use std::env;
use std::time::Duration;

/// Runtime configuration for the sync controller
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Controller base URL
    pub controller_url: String,
    /// Controller API username
    pub username: String,
    /// Controller API password
    pub password: String,
    /// Controller API version header value
    pub api_version: String,
    /// Skip TLS verification towards the controller
    pub insecure: bool,
    /// Tenant whose reference is attached to every built object
    pub tenant: String,
    /// Cloud whose reference is attached to every built object
    pub cloud_name: String,
    /// DNS subdomain for derived FQDNs; empty disables FQDN derivation
    pub dns_subdomain: String,
    /// Suffix appended to pool names to avoid collisions across environments
    pub pool_suffix: String,
    /// Default SSL certificate name for secure-HTTP services
    pub ssl_cert_name: String,
    /// Versioned metadata store base URL
    pub metadata_url: String,
    /// Health endpoint bind address
    pub healthcheck_addr: String,
    /// Metadata version poll interval
    pub poll_interval: Duration,
    /// Periodic full-sync floor even without version changes
    pub full_sync_interval: Duration,
    /// Per-request HTTP timeout for both clients
    pub http_timeout: Duration,
}

impl SyncConfig {
    /// Load configuration from environment variables.
    ///
    /// `AVI_CONTROLLER_URL`, `AVI_USERNAME` and `AVI_PASSWORD` are required;
    /// everything else has a default. Unparseable numeric values are a
    /// startup error.
    pub fn from_env() -> Result<Self, ControllerError> {
        Ok(Self {
            controller_url: required("AVI_CONTROLLER_URL")?,
            username: required("AVI_USERNAME")?,
            password: required("AVI_PASSWORD")?,
            api_version: env::var("AVI_API_VERSION").unwrap_or_else(|_| "18.2.9".to_string()),
            insecure: env::var("AVI_INSECURE").map(|v| v == "true").unwrap_or(false),
            tenant: env::var("AVI_TENANT").unwrap_or_else(|_| "admin".to_string()),
            cloud_name: env::var("AVI_CLOUD_NAME").unwrap_or_else(|_| "Default-Cloud".to_string()),
            dns_subdomain: env::var("AVI_DNS_SUBDOMAIN").unwrap_or_default(),
            pool_suffix: env::var("AVI_POOL_SUFFIX").unwrap_or_else(|_| "lb".to_string()),
            ssl_cert_name: env::var("AVI_SSL_CERT")
                .unwrap_or_else(|_| "System-Default-Cert".to_string()),
            metadata_url: env::var("METADATA_URL")
                .unwrap_or_else(|_| "http://rancher-metadata/2016-07-29".to_string()),
            healthcheck_addr: env::var("HEALTHCHECK_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:1000".to_string()),
            poll_interval: duration_secs("POLL_INTERVAL_SECS", 5)?,
            full_sync_interval: duration_secs("FULL_SYNC_SECS", 30)?,
            http_timeout: duration_secs("HTTP_TIMEOUT_SECS", 30)?,
        })
    }
}

fn required(name: &str) -> Result<String, ControllerError> {
    env::var(name).map_err(|_| {
        ControllerError::InvalidConfig(format!("{} environment variable is required", name))
    })
}

fn duration_secs(name: &str, default: u64) -> Result<Duration, ControllerError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ControllerError::InvalidConfig(format!("{} must be an integer number of seconds, got '{}'", name, raw))),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}
