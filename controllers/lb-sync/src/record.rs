//! Desired-state records produced by the scanner
//!
//! A `ServiceRecord` is rebuilt from scratch on every scan and never mutated
//! afterwards; equality across cycles is established only through the
//! fingerprint stored on the remote virtual service. Labels and ports use
//! `BTreeMap` so every iteration over them is key-sorted, which keeps the
//! fingerprint and the profile tie-break stable for identical input.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Layer-4 protocol of a backend pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            other => Err(format!("unsupported protocol '{}'", other)),
        }
    }
}

/// One distinct backend host endpoint group contributing ports to a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolDefinition {
    pub protocol: Protocol,
    /// Load-balancer-reachable host address; never the wildcard address
    pub host_ip: String,
    /// Host-exposed port to container-internal port
    pub ports: BTreeMap<u16, u16>,
}

/// Desired state for one logical service, derived from a metadata snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    /// Globally unique name within the controller tenant: `{stack}_{service}`
    pub service_name: String,
    /// Pool name base: `{service}_{stack}_{environment}_{suffix}`
    pub pool_base_name: String,
    /// Service labels, copied verbatim from the metadata store
    pub labels: BTreeMap<String, String>,
    /// Backend pools; a record always has at least one with at least one port
    pub pools: Vec<PoolDefinition>,
}
