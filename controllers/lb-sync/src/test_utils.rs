//! Test utilities for unit testing the scanner, builder and reconciler
//!
//! This module provides helpers for creating test data and setting up test
//! scenarios against the mock clients.

use crate::config::SyncConfig;
use crate::record::{PoolDefinition, Protocol, ServiceRecord};
use metadata_client::{Container, Service};
use std::collections::BTreeMap;
use std::time::Duration;

/// Configuration used by unit tests; no environment variables involved.
pub fn test_config() -> SyncConfig {
    SyncConfig {
        controller_url: "https://avi.test".to_string(),
        username: "admin".to_string(),
        password: "secret".to_string(),
        api_version: "18.2.9".to_string(),
        insecure: false,
        tenant: "admin".to_string(),
        cloud_name: "Default-Cloud".to_string(),
        dns_subdomain: String::new(),
        pool_suffix: "lb".to_string(),
        ssl_cert_name: "System-Default-Cert".to_string(),
        metadata_url: "http://metadata.test/2016-07-29".to_string(),
        healthcheck_addr: "127.0.0.1:0".to_string(),
        poll_interval: Duration::from_secs(5),
        full_sync_interval: Duration::from_secs(30),
        http_timeout: Duration::from_secs(30),
    }
}

/// Helper to create a test service with labels and containers
pub fn create_test_service(
    stack: &str,
    name: &str,
    labels: &[(&str, &str)],
    containers: Vec<Container>,
) -> Service {
    Service {
        name: name.to_string(),
        stack_name: stack.to_string(),
        labels: labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        containers,
    }
}

/// Helper to create a running, healthy container exposing the given ports
pub fn create_running_container(name: &str, service_name: &str, ports: &[&str]) -> Container {
    Container {
        name: name.to_string(),
        service_name: service_name.to_string(),
        state: "running".to_string(),
        health_state: "healthy".to_string(),
        ports: ports.iter().map(|p| p.to_string()).collect(),
    }
}

/// Helper to create a desired-state record with a single pool
pub fn create_test_record(
    service_name: &str,
    protocol: Protocol,
    host_ip: &str,
    ports: &[(u16, u16)],
) -> ServiceRecord {
    ServiceRecord {
        service_name: service_name.to_string(),
        pool_base_name: format!("{}_pool_env1_lb", service_name),
        labels: BTreeMap::new(),
        pools: vec![PoolDefinition {
            protocol,
            host_ip: host_ip.to_string(),
            ports: ports.iter().copied().collect(),
        }],
    }
}
