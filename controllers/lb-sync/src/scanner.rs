//! Metadata scanner
//!
//! Reads the metadata snapshot and turns it into desired-state records:
//! one `ServiceRecord` per service that has at least one routable backend
//! port. Individual malformed ports or unhealthy containers are skipped
//! with a log line; only a failed service enumeration aborts the scan.

use crate::backoff::ExponentialBackoff;
use crate::config::SyncConfig;
use crate::error::ControllerError;
use crate::labels::EXCLUDE_LABEL;
use crate::record::{PoolDefinition, Protocol, ServiceRecord};
use metadata_client::{Container, MetadataClientTrait, MetadataError};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, error, warn};

/// The wildcard bind address; unusable as a pool backend address.
const WILDCARD_ADDR: &str = "0.0.0.0";

/// A parsed `hostIP:hostPort:containerPort/protocol` publish entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSpec {
    pub host_ip: String,
    pub host_port: u16,
    pub container_port: u16,
    pub protocol: Protocol,
}

/// Scan the metadata store into desired-state records keyed by service name.
pub async fn scan(
    metadata: &dyn MetadataClientTrait,
    cfg: &SyncConfig,
) -> Result<BTreeMap<String, ServiceRecord>, ControllerError> {
    let services = metadata.list_services().await?;

    // Best-effort environment lookup, once per pass: pool names degrade to an
    // empty environment segment rather than the whole scan failing.
    let environment = match environment_uuid(metadata).await {
        Ok(uuid) => uuid,
        Err(e) => {
            error!("error reading stack info: {}; pool names will carry an empty environment segment", e);
            String::new()
        }
    };

    let mut records = BTreeMap::new();
    for service in services {
        if service.labels.contains_key(EXCLUDE_LABEL) {
            debug!("service {} is excluded from proxying", service.name);
            continue;
        }

        let mut pools: Vec<PoolDefinition> = Vec::new();
        for container in &service.containers {
            if container.service_name.is_empty() {
                continue;
            }
            if !container_state_ok(container) {
                debug!(
                    "skipping container {} with state '{}' and health '{}'",
                    container.name, container.state, container.health_state
                );
                continue;
            }
            if container.ports.is_empty() {
                continue;
            }
            for port in &container.ports {
                let spec = match parse_port_spec(port) {
                    Ok(spec) => spec,
                    Err(reason) => {
                        warn!(
                            "unexpected port spec '{}' for container {}: {}",
                            port, container.name, reason
                        );
                        continue;
                    }
                };
                if spec.host_ip == WILDCARD_ADDR {
                    warn!(
                        "unusable host IP '{}' for container {}: wildcard address cannot back a pool",
                        spec.host_ip, container.name
                    );
                    continue;
                }
                add_port(&mut pools, spec);
            }
        }

        if pools.is_empty() {
            continue;
        }

        let record = ServiceRecord {
            service_name: format!("{}_{}", service.stack_name, service.name),
            pool_base_name: format!(
                "{}_{}_{}_{}",
                service.name, service.stack_name, environment, cfg.pool_suffix
            ),
            labels: service.labels.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            pools,
        };
        debug!("scanned {}: {} pool(s)", record.service_name, record.pools.len());
        records.insert(record.service_name.clone(), record);
    }

    Ok(records)
}

/// Parse one publish entry of the form `hostIP:hostPort:containerPort/protocol`.
pub fn parse_port_spec(raw: &str) -> Result<PortSpec, String> {
    let fields: Vec<&str> = raw.split(':').collect();
    let [host_ip, host_port, proto_spec] = fields.as_slice() else {
        return Err("expected hostIP:hostPort:containerPort/protocol".to_string());
    };

    let host_port: u16 = host_port
        .parse()
        .map_err(|_| format!("bad host port '{}'", host_port))?;

    let proto_fields: Vec<&str> = proto_spec.split('/').collect();
    let [container_port, protocol] = proto_fields.as_slice() else {
        return Err("expected containerPort/protocol".to_string());
    };

    let container_port: u16 = container_port
        .parse()
        .map_err(|_| format!("bad container port '{}'", container_port))?;
    let protocol: Protocol = protocol.parse()?;

    Ok(PortSpec {
        host_ip: host_ip.to_string(),
        host_port,
        container_port,
        protocol,
    })
}

/// Add a parsed port to the service's pools.
///
/// A (host IP, host port) pair already present anywhere in the service is
/// dropped, first occurrence wins. Otherwise the port joins the pool with
/// the same host IP and protocol, or starts a new one.
fn add_port(pools: &mut Vec<PoolDefinition>, spec: PortSpec) {
    let duplicate = pools
        .iter()
        .any(|p| p.host_ip == spec.host_ip && p.ports.contains_key(&spec.host_port));
    if duplicate {
        return;
    }

    if let Some(pool) = pools
        .iter_mut()
        .find(|p| p.host_ip == spec.host_ip && p.protocol == spec.protocol)
    {
        pool.ports.insert(spec.host_port, spec.container_port);
        return;
    }

    let mut ports = BTreeMap::new();
    ports.insert(spec.host_port, spec.container_port);
    pools.push(PoolDefinition {
        protocol: spec.protocol,
        host_ip: spec.host_ip,
        ports,
    });
}

/// A container is routable only when running and not in a transitional or
/// failed health state; an empty health state means health checking is not
/// configured and counts as routable.
fn container_state_ok(container: &Container) -> bool {
    if container.state != "running" {
        return false;
    }
    matches!(container.health_state.as_str(), "" | "healthy" | "updating-healthy")
}

/// Look up the environment identifier from the self stack, retrying with a
/// doubling backoff (1s up to a 30s ceiling) before giving up and returning
/// the final error.
async fn environment_uuid(metadata: &dyn MetadataClientTrait) -> Result<String, MetadataError> {
    let mut backoff = ExponentialBackoff::new(Duration::from_secs(1), Duration::from_secs(30));
    loop {
        match metadata.self_stack().await {
            Ok(stack) => return Ok(stack.environment_uuid),
            Err(e) => match backoff.next_delay() {
                Some(delay) => {
                    error!("error reading stack info: {}...will retry", e);
                    tokio::time::sleep(delay).await;
                }
                None => return Err(e),
            },
        }
    }
}
