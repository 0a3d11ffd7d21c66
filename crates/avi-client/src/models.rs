//! Controller API models
//!
//! Two families live here: summaries of objects read back from the
//! controller (`VirtualService`, `PoolGroup`), and the typed desired-state
//! tree the sync controller builds and submits (`VirtualServiceConfig` and
//! its children). The read models keep unknown fields in a flattened map so
//! a fetched object can be echoed back verbatim on delete.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collection response wrapper for controller list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionResponse<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    pub results: Vec<T>,
}

/// A resource returned by a by-name reference lookup (tenant, cloud)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefObject {
    pub url: String,
    #[serde(default)]
    pub name: String,
}

/// A virtual service as stored on the controller.
///
/// Only the fields the reconciler reads are typed; everything else is kept
/// in `rest` so the full object round-trips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualService {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_config_cksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_group_ref: Option<String>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, Value>,
}

/// A pool group as stored on the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolGroup {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default)]
    pub members: Vec<PoolGroupMemberRef>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, Value>,
}

/// A pool group member reference as stored on the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolGroupMemberRef {
    pub pool_ref: String,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, Value>,
}

// Desired-state tree submitted by the sync controller. Optional fields are
// omitted from the wire payload entirely rather than sent as null; the
// controller treats absent and null differently for references.

/// Top-level desired virtual-service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualServiceConfig {
    pub name: String,
    pub cloud_ref: String,
    pub tenant_ref: String,
    pub created_by: String,
    pub cloud_config_cksum: String,
    pub vip: Vec<VipConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_info: Vec<DnsInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_profile_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_profile_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ssl_key_and_certificate_refs: Vec<String>,
    pub services: Vec<ServicePortEntry>,
    pub pool_group_ref_data: PoolGroupConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

/// VIP allocation; the sync controller always auto-allocates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VipConfig {
    pub auto_allocate_ip: bool,
}

/// DNS record attached to a virtual service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsInfo {
    pub fqdn: String,
}

/// One listening port of a virtual service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePortEntry {
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_ssl: Option<bool>,
}

/// Desired pool group embedded in a virtual-service submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolGroupConfig {
    pub name: String,
    pub cloud_ref: String,
    pub tenant_ref: String,
    pub members: Vec<PoolGroupMemberConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

/// Desired pool group member carrying its pool inline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolGroupMemberConfig {
    pub pool_ref_data: PoolConfig,
}

/// Desired backend pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    pub name: String,
    pub cloud_ref: String,
    pub tenant_ref: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub health_monitor_refs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_profile_ref: Option<String>,
    pub servers: Vec<ServerEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

/// One backend server of a pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    pub ip: ServerIp,
    pub port: u16,
}

/// Backend server address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerIp {
    #[serde(rename = "type")]
    pub addr_type: String,
    pub addr: String,
}

impl ServerIp {
    /// IPv4 backend address
    pub fn v4(addr: impl Into<String>) -> Self {
        Self {
            addr_type: "V4".to_string(),
            addr: addr.into(),
        }
    }
}
