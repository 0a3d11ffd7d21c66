//! Desired-configuration builder
//!
//! Maps a `ServiceRecord` into the nested virtual-service submission the
//! controller expects: application/network profiles, SSL bindings, service
//! ports, health monitors, and the embedded pool group with its pool. The
//! result is the literal `data` payload for the macro create/update call.
//!
//! Building is pure given its inputs except for two read-only lookups:
//! the tenant reference, and on update the existing pool group (for UUID
//! recovery so the update targets the right objects).

use crate::checksum;
use crate::config::SyncConfig;
use crate::error::ControllerError;
use crate::labels::{
    APP_PROFILE_LABEL, CLOUD_LABEL, FQDN_LABEL, OVERRIDE_SCOPE_POOL, OVERRIDE_SCOPE_VS,
    PROXY_OVERRIDE_LABEL, SSL_CERT_LABEL,
};
use crate::overrides::{merge_value, parse_proxy_override};
use crate::record::{Protocol, ServiceRecord};
use avi_client::{
    AviClientTrait, DnsInfo, PoolConfig, PoolGroupConfig, PoolGroupMemberConfig, ServerEntry,
    ServerIp, ServicePortEntry, VipConfig, VirtualService, VirtualServiceConfig,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Ownership marker stamped on every virtual service this controller manages.
pub const CREATED_BY: &str = "lb-sync";

pub const APP_PROFILE_HTTPS: &str = "System-Secure-HTTP";
pub const APP_PROFILE_HTTP: &str = "System-HTTP";
pub const APP_PROFILE_L4: &str = "System-L4-Application";
pub const NET_PROFILE_TCP: &str = "System-TCP-Proxy";
pub const NET_PROFILE_UDP: &str = "System-UDP-Fast-Path";
pub const HEALTH_MONITOR_HTTPS: &str = "System-HTTPS";
pub const HEALTH_MONITOR_HTTP: &str = "System-HTTP";
pub const HEALTH_MONITOR_TCP: &str = "System-TCP";
pub const HEALTH_MONITOR_UDP: &str = "System-UDP";
pub const SSL_PROFILE: &str = "System-Standard";

pub fn app_profile_ref(name: &str) -> String {
    format!("/api/applicationprofile?name={}", name)
}

pub fn network_profile_ref(name: &str) -> String {
    format!("/api/networkprofile?name={}", name)
}

pub fn health_monitor_ref(name: &str) -> String {
    format!("/api/healthmonitor?name={}", name)
}

pub fn ssl_profile_ref(name: &str) -> String {
    format!("/api/sslprofile?name={}", name)
}

pub fn ssl_cert_ref(name: &str) -> String {
    format!("/api/sslkeyandcertificate?name={}", name)
}

/// Profile selection result for one record
struct ProfileSelection {
    app: Option<String>,
    net: Option<String>,
    ssl_certs: Vec<String>,
}

/// Builds desired virtual-service configurations
pub struct ConfigBuilder {
    avi: Arc<dyn AviClientTrait>,
    cfg: Arc<SyncConfig>,
    cloud_ref: String,
}

impl ConfigBuilder {
    pub fn new(avi: Arc<dyn AviClientTrait>, cfg: Arc<SyncConfig>, cloud_ref: String) -> Self {
        Self { avi, cfg, cloud_ref }
    }

    /// Build the virtual-service payload for a record.
    ///
    /// On update (`create == false`) the prior remote object supplies the
    /// virtual-service UUID, its pool-group ref supplies the pool-group
    /// UUID, and the fetched pool group supplies the pool UUID.
    pub async fn build(
        &self,
        record: &ServiceRecord,
        create: bool,
        prior: Option<&VirtualService>,
    ) -> Result<Value, ControllerError> {
        let labels = &record.labels;
        let proxy_override = labels
            .get(PROXY_OVERRIDE_LABEL)
            .and_then(|raw| parse_proxy_override(&record.service_name, raw));

        let cloud_ref = labels
            .get(CLOUD_LABEL)
            .cloned()
            .unwrap_or_else(|| self.cloud_ref.clone());
        let tenant_ref = self.avi.resolve_tenant_ref(&self.cfg.tenant).await?;

        let mut profiles = select_profiles(record, self.ssl_cert_name(labels));
        if let Some(name) = labels.get(APP_PROFILE_LABEL) {
            profiles.app = Some(app_profile_ref(name));
            if name.as_str() == APP_PROFILE_HTTPS {
                profiles.ssl_certs = vec![ssl_cert_ref(self.ssl_cert_name(labels))];
            }
        }
        let https = profiles.app.as_deref() == Some(app_profile_ref(APP_PROFILE_HTTPS).as_str());

        let (health_monitors, pool_ssl_profile) = pool_health_monitors(record);
        let mut pool = PoolConfig {
            name: record.pool_base_name.clone(),
            cloud_ref: cloud_ref.clone(),
            tenant_ref: tenant_ref.clone(),
            health_monitor_refs: health_monitors,
            ssl_profile_ref: pool_ssl_profile,
            servers: pool_servers(record),
            uuid: None,
        };

        let mut pool_group = PoolGroupConfig {
            name: format!("{}-poolgroup", record.service_name),
            cloud_ref: cloud_ref.clone(),
            tenant_ref: tenant_ref.clone(),
            members: Vec::new(),
            uuid: None,
        };

        if !create {
            if let Some(pg) = self.avi.get_pool_group_by_name(&pool_group.name).await? {
                for member in &pg.members {
                    pool.uuid = Some(ref_uuid(&member.pool_ref));
                }
            }
            if let Some(pg_ref) = prior.and_then(|vs| vs.pool_group_ref.as_deref()) {
                pool_group.uuid = Some(ref_uuid(pg_ref));
            }
        }
        pool_group.members.push(PoolGroupMemberConfig { pool_ref_data: pool });

        let fqdn = labels.get(FQDN_LABEL).cloned().or_else(|| {
            if self.cfg.dns_subdomain.is_empty() {
                None
            } else {
                Some(format!("{}.{}", record.service_name, self.cfg.dns_subdomain))
            }
        });

        let vs = VirtualServiceConfig {
            name: record.service_name.clone(),
            cloud_ref,
            tenant_ref,
            created_by: CREATED_BY.to_string(),
            cloud_config_cksum: checksum::fingerprint(record),
            vip: vec![VipConfig {
                auto_allocate_ip: true,
            }],
            dns_info: fqdn.map(|fqdn| vec![DnsInfo { fqdn }]).unwrap_or_default(),
            application_profile_ref: profiles.app,
            network_profile_ref: profiles.net,
            ssl_key_and_certificate_refs: profiles.ssl_certs,
            services: service_ports(record, https),
            pool_group_ref_data: pool_group,
            uuid: if create {
                None
            } else {
                prior.and_then(|vs| vs.uuid.clone())
            },
        };

        let mut value = serde_json::to_value(&vs)?;
        if let Some(map) = proxy_override {
            if let Some(pool_override) = map.get(OVERRIDE_SCOPE_POOL) {
                info!("applying pool override data for {}", record.service_name);
                if let Some(target) =
                    value.pointer_mut("/pool_group_ref_data/members/0/pool_ref_data")
                {
                    merge_value(target, pool_override.clone());
                }
            }
            if let Some(vs_override) = map.get(OVERRIDE_SCOPE_VS) {
                info!(
                    "applying virtual-service override data for {}",
                    record.service_name
                );
                merge_value(&mut value, vs_override.clone());
            }
        }

        Ok(value)
    }

    fn ssl_cert_name<'a>(&'a self, labels: &'a BTreeMap<String, String>) -> &'a str {
        labels
            .get(SSL_CERT_LABEL)
            .map(String::as_str)
            .unwrap_or(&self.cfg.ssl_cert_name)
    }
}

/// Pick application/network profiles and SSL bindings for a record.
///
/// Pools are visited in scan order and ports in ascending host-port order,
/// so the first container port encountered decides deterministically:
/// 443 is secure HTTP, 80 is plain HTTP, anything else is L4 with the
/// network profile following the pool's protocol.
fn select_profiles(record: &ServiceRecord, ssl_cert: &str) -> ProfileSelection {
    for pool in &record.pools {
        for container_port in pool.ports.values() {
            return match *container_port {
                443 => ProfileSelection {
                    app: Some(app_profile_ref(APP_PROFILE_HTTPS)),
                    net: None,
                    ssl_certs: vec![ssl_cert_ref(ssl_cert)],
                },
                80 => ProfileSelection {
                    app: Some(app_profile_ref(APP_PROFILE_HTTP)),
                    net: None,
                    ssl_certs: Vec::new(),
                },
                _ => ProfileSelection {
                    app: Some(app_profile_ref(APP_PROFILE_L4)),
                    net: Some(network_profile_ref(match pool.protocol {
                        Protocol::Tcp => NET_PROFILE_TCP,
                        Protocol::Udp => NET_PROFILE_UDP,
                    })),
                    ssl_certs: Vec::new(),
                },
            };
        }
    }
    ProfileSelection {
        app: None,
        net: None,
        ssl_certs: Vec::new(),
    }
}

/// One service-port entry per distinct container port across all pools.
/// Under the secure-HTTP profile every entry is forced to 443 with SSL
/// enabled; entries are deduplicated after the forcing, so multiple HTTPS
/// container ports collapse into a single 443 entry.
fn service_ports(record: &ServiceRecord, https: bool) -> Vec<ServicePortEntry> {
    let mut entries: Vec<ServicePortEntry> = Vec::new();
    for pool in &record.pools {
        for container_port in pool.ports.values() {
            let entry = if https {
                ServicePortEntry {
                    port: 443,
                    enable_ssl: Some(true),
                }
            } else {
                ServicePortEntry {
                    port: *container_port,
                    enable_ssl: None,
                }
            };
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }
    }
    entries
}

/// Health monitors per pool/port, deduplicated in first-seen order, plus the
/// pool SSL profile when any container port is 443.
fn pool_health_monitors(record: &ServiceRecord) -> (Vec<String>, Option<String>) {
    let mut monitors: Vec<String> = Vec::new();
    let mut ssl_profile = None;
    for pool in &record.pools {
        for container_port in pool.ports.values() {
            let monitor = match *container_port {
                443 => {
                    ssl_profile = Some(ssl_profile_ref(SSL_PROFILE));
                    health_monitor_ref(HEALTH_MONITOR_HTTPS)
                }
                80 => health_monitor_ref(HEALTH_MONITOR_HTTP),
                _ => health_monitor_ref(match pool.protocol {
                    Protocol::Tcp => HEALTH_MONITOR_TCP,
                    Protocol::Udp => HEALTH_MONITOR_UDP,
                }),
            };
            if !monitors.contains(&monitor) {
                monitors.push(monitor);
            }
        }
    }
    (monitors, ssl_profile)
}

/// One backend server per distinct (host IP, host port); distinctness is a
/// scanner invariant.
fn pool_servers(record: &ServiceRecord) -> Vec<ServerEntry> {
    let mut servers = Vec::new();
    for pool in &record.pools {
        for host_port in pool.ports.keys() {
            servers.push(ServerEntry {
                ip: ServerIp::v4(&pool.host_ip),
                port: *host_port,
            });
        }
    }
    servers
}

/// Extract a resource UUID from the trailing path segment of its reference.
fn ref_uuid(resource_ref: &str) -> String {
    resource_ref
        .rsplit('/')
        .next()
        .unwrap_or(resource_ref)
        .to_string()
}
