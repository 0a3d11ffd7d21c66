//! Desired-state fingerprinting
//!
//! Computes the checksum stored on the remote virtual service and compared
//! on every cycle to decide whether an update is needed. The digest input
//! covers everything the builder derives its output from: service name,
//! labels, and per-pool protocol/address/name/port pairs.
//!
//! Labels and ports are `BTreeMap`s on the record, so the concatenation is
//! key-sorted by construction; the fingerprint is stable for identical
//! content no matter what order the metadata store reported it in.

use crate::record::ServiceRecord;
use sha2::{Digest, Sha256};

/// Compute the fingerprint of a desired-state record.
pub fn fingerprint(record: &ServiceRecord) -> String {
    let mut hasher = Sha256::new();

    hasher.update(record.service_name.as_bytes());
    for (key, val) in &record.labels {
        hasher.update(format!("{}:{}", key, val).as_bytes());
    }
    for pool in &record.pools {
        hasher.update(pool.protocol.as_str().as_bytes());
        hasher.update(pool.host_ip.as_bytes());
        hasher.update(record.pool_base_name.as_bytes());
        for (host_port, container_port) in &pool.ports {
            hasher.update(host_port.to_string().as_bytes());
            hasher.update(container_port.to_string().as_bytes());
        }
    }

    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{PoolDefinition, Protocol};
    use std::collections::BTreeMap;

    fn record_with(labels: &[(&str, &str)], ports: &[(u16, u16)]) -> ServiceRecord {
        ServiceRecord {
            service_name: "prod_web".to_string(),
            pool_base_name: "web_prod_env1_lb".to_string(),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            pools: vec![PoolDefinition {
                protocol: Protocol::Tcp,
                host_ip: "10.0.0.9".to_string(),
                ports: ports.iter().copied().collect(),
            }],
        }
    }

    #[test]
    fn test_fingerprint_stable_under_insertion_order() {
        // BTreeMap iteration is key-sorted, so the same content inserted in
        // different orders must hash identically.
        let a = record_with(&[("team", "core"), ("env", "prod")], &[(8443, 443), (8080, 80)]);
        let b = record_with(&[("env", "prod"), ("team", "core")], &[(8080, 80), (8443, 443)]);

        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let base = record_with(&[("env", "prod")], &[(8443, 443)]);

        let mut renamed = base.clone();
        renamed.service_name = "prod_api".to_string();
        assert_ne!(fingerprint(&base), fingerprint(&renamed));

        let mut relabeled = base.clone();
        relabeled
            .labels
            .insert("team".to_string(), "core".to_string());
        assert_ne!(fingerprint(&base), fingerprint(&relabeled));

        let mut remapped = base.clone();
        remapped.pools[0].ports.insert(9000, 9000);
        assert_ne!(fingerprint(&base), fingerprint(&remapped));
    }

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let record = record_with(&[], &[(8443, 443)]);
        let sum = fingerprint(&record);
        assert_eq!(sum.len(), 64);
        assert!(sum.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_deterministic_across_calls() {
        let record = record_with(&[("env", "prod")], &[(8443, 443)]);
        assert_eq!(fingerprint(&record), fingerprint(&record));
    }
}
