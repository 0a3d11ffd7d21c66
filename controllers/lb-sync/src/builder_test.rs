//! Unit tests for the desired-configuration builder

#[cfg(test)]
mod tests {
    use crate::builder::{
        app_profile_ref, health_monitor_ref, network_profile_ref, ssl_cert_ref, ConfigBuilder,
        APP_PROFILE_HTTP, APP_PROFILE_HTTPS, APP_PROFILE_L4, CREATED_BY, HEALTH_MONITOR_HTTP,
        HEALTH_MONITOR_HTTPS, HEALTH_MONITOR_TCP, HEALTH_MONITOR_UDP, NET_PROFILE_TCP,
        NET_PROFILE_UDP,
    };
    use crate::checksum;
    use crate::labels::{
        APP_PROFILE_LABEL, CLOUD_LABEL, FQDN_LABEL, PROXY_OVERRIDE_LABEL, SSL_CERT_LABEL,
    };
    use crate::record::Protocol;
    use crate::test_utils::*;
    use avi_client::{AviClientTrait, MockAviClient, PoolGroup, PoolGroupMemberRef, VirtualService};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn builder_with(mock: &MockAviClient) -> ConfigBuilder {
        let avi: Arc<dyn AviClientTrait> = Arc::new(mock.clone());
        ConfigBuilder::new(
            avi,
            Arc::new(test_config()),
            "https://avi.test/api/cloud/cloud-default".to_string(),
        )
    }

    fn str_at<'a>(value: &'a Value, pointer: &str) -> &'a str {
        value.pointer(pointer).and_then(Value::as_str).unwrap_or_default()
    }

    #[tokio::test]
    async fn test_container_port_443_maps_to_secure_http() {
        let mock = MockAviClient::new("https://avi.test");
        let builder = builder_with(&mock);
        let record = create_test_record("prod_web", Protocol::Tcp, "10.0.0.9", &[(8443, 443)]);

        let vs = builder.build(&record, true, None).await.unwrap();

        assert_eq!(
            str_at(&vs, "/application_profile_ref"),
            app_profile_ref(APP_PROFILE_HTTPS)
        );
        assert!(vs.get("network_profile_ref").is_none());
        assert_eq!(
            vs["ssl_key_and_certificate_refs"],
            json!([ssl_cert_ref("System-Default-Cert")])
        );
        assert_eq!(vs["services"], json!([{"port": 443, "enable_ssl": true}]));
        assert_eq!(
            vs.pointer("/pool_group_ref_data/members/0/pool_ref_data/health_monitor_refs"),
            Some(&json!([health_monitor_ref(HEALTH_MONITOR_HTTPS)]))
        );
        assert_eq!(
            str_at(&vs, "/pool_group_ref_data/members/0/pool_ref_data/ssl_profile_ref"),
            "/api/sslprofile?name=System-Standard"
        );
    }

    #[tokio::test]
    async fn test_container_port_80_maps_to_plain_http() {
        let mock = MockAviClient::new("https://avi.test");
        let builder = builder_with(&mock);
        let record = create_test_record("prod_web", Protocol::Tcp, "10.0.0.9", &[(8080, 80)]);

        let vs = builder.build(&record, true, None).await.unwrap();

        assert_eq!(
            str_at(&vs, "/application_profile_ref"),
            app_profile_ref(APP_PROFILE_HTTP)
        );
        assert!(vs.get("ssl_key_and_certificate_refs").is_none());
        assert_eq!(vs["services"], json!([{"port": 80}]));
        assert_eq!(
            vs.pointer("/pool_group_ref_data/members/0/pool_ref_data/health_monitor_refs"),
            Some(&json!([health_monitor_ref(HEALTH_MONITOR_HTTP)]))
        );
    }

    #[tokio::test]
    async fn test_other_tcp_port_maps_to_l4_tcp() {
        let mock = MockAviClient::new("https://avi.test");
        let builder = builder_with(&mock);
        let record = create_test_record("prod_web", Protocol::Tcp, "10.0.0.9", &[(8080, 8080)]);

        let vs = builder.build(&record, true, None).await.unwrap();

        assert_eq!(
            str_at(&vs, "/application_profile_ref"),
            app_profile_ref(APP_PROFILE_L4)
        );
        assert_eq!(
            str_at(&vs, "/network_profile_ref"),
            network_profile_ref(NET_PROFILE_TCP)
        );
        assert_eq!(
            vs.pointer("/pool_group_ref_data/members/0/pool_ref_data/health_monitor_refs"),
            Some(&json!([health_monitor_ref(HEALTH_MONITOR_TCP)]))
        );
    }

    #[tokio::test]
    async fn test_other_udp_port_maps_to_l4_udp() {
        let mock = MockAviClient::new("https://avi.test");
        let builder = builder_with(&mock);
        let record = create_test_record("prod_dns", Protocol::Udp, "10.0.0.9", &[(5353, 8080)]);

        let vs = builder.build(&record, true, None).await.unwrap();

        assert_eq!(
            str_at(&vs, "/application_profile_ref"),
            app_profile_ref(APP_PROFILE_L4)
        );
        assert_eq!(
            str_at(&vs, "/network_profile_ref"),
            network_profile_ref(NET_PROFILE_UDP)
        );
        assert_eq!(
            vs.pointer("/pool_group_ref_data/members/0/pool_ref_data/health_monitor_refs"),
            Some(&json!([health_monitor_ref(HEALTH_MONITOR_UDP)]))
        );
    }

    #[tokio::test]
    async fn test_common_fields_and_servers() {
        let mock = MockAviClient::new("https://avi.test");
        let builder = builder_with(&mock);
        let record = create_test_record("prod_web", Protocol::Tcp, "10.0.0.9", &[(8443, 443)]);

        let vs = builder.build(&record, true, None).await.unwrap();

        assert_eq!(str_at(&vs, "/name"), "prod_web");
        assert_eq!(str_at(&vs, "/created_by"), CREATED_BY);
        assert_eq!(
            str_at(&vs, "/cloud_config_cksum"),
            checksum::fingerprint(&record)
        );
        assert_eq!(vs["vip"], json!([{"auto_allocate_ip": true}]));
        assert_eq!(
            str_at(&vs, "/tenant_ref"),
            "https://avi.test/api/tenant/tenant-admin"
        );
        assert_eq!(
            vs.pointer("/pool_group_ref_data/members/0/pool_ref_data/servers"),
            Some(&json!([{"ip": {"type": "V4", "addr": "10.0.0.9"}, "port": 8443}]))
        );
        assert_eq!(
            str_at(&vs, "/pool_group_ref_data/name"),
            "prod_web-poolgroup"
        );
        // No UUIDs on create; the controller assigns them
        assert!(vs.get("uuid").is_none());
        assert!(vs.pointer("/pool_group_ref_data/uuid").is_none());
    }

    #[tokio::test]
    async fn test_fqdn_derived_only_with_subdomain() {
        let mock = MockAviClient::new("https://avi.test");
        let record = create_test_record("prod_web", Protocol::Tcp, "10.0.0.9", &[(8443, 443)]);

        let plain = builder_with(&mock);
        let vs = plain.build(&record, true, None).await.unwrap();
        assert!(vs.get("dns_info").is_none());

        let mut cfg = test_config();
        cfg.dns_subdomain = "example.com".to_string();
        let avi: Arc<dyn AviClientTrait> = Arc::new(mock.clone());
        let with_subdomain = ConfigBuilder::new(
            avi,
            Arc::new(cfg),
            "https://avi.test/api/cloud/cloud-default".to_string(),
        );
        let vs = with_subdomain.build(&record, true, None).await.unwrap();
        assert_eq!(vs["dns_info"], json!([{"fqdn": "prod_web.example.com"}]));
    }

    #[tokio::test]
    async fn test_label_overrides_replace_fields() {
        let mock = MockAviClient::new("https://avi.test");
        let builder = builder_with(&mock);

        let mut record = create_test_record("prod_web", Protocol::Tcp, "10.0.0.9", &[(8443, 443)]);
        record.labels.insert(
            SSL_CERT_LABEL.to_string(),
            "wildcard-example".to_string(),
        );
        record
            .labels
            .insert(CLOUD_LABEL.to_string(), "/api/cloud?name=Other-Cloud".to_string());
        record
            .labels
            .insert(FQDN_LABEL.to_string(), "web.override.example.com".to_string());

        let vs = builder.build(&record, true, None).await.unwrap();

        assert_eq!(
            vs["ssl_key_and_certificate_refs"],
            json!([ssl_cert_ref("wildcard-example")])
        );
        assert_eq!(str_at(&vs, "/cloud_ref"), "/api/cloud?name=Other-Cloud");
        assert_eq!(vs["dns_info"], json!([{"fqdn": "web.override.example.com"}]));
    }

    #[tokio::test]
    async fn test_app_profile_override_to_https_rederives_ssl_and_ports() {
        let mock = MockAviClient::new("https://avi.test");
        let builder = builder_with(&mock);

        // An L4 service forced to the secure-HTTP profile by label
        let mut record = create_test_record("prod_web", Protocol::Tcp, "10.0.0.9", &[(9000, 9000)]);
        record
            .labels
            .insert(APP_PROFILE_LABEL.to_string(), APP_PROFILE_HTTPS.to_string());

        let vs = builder.build(&record, true, None).await.unwrap();

        assert_eq!(
            str_at(&vs, "/application_profile_ref"),
            app_profile_ref(APP_PROFILE_HTTPS)
        );
        assert_eq!(
            vs["ssl_key_and_certificate_refs"],
            json!([ssl_cert_ref("System-Default-Cert")])
        );
        assert_eq!(vs["services"], json!([{"port": 443, "enable_ssl": true}]));
    }

    #[tokio::test]
    async fn test_proxy_override_label_merges_into_vs_and_pool() {
        let mock = MockAviClient::new("https://avi.test");
        let builder = builder_with(&mock);

        let mut record = create_test_record("prod_web", Protocol::Tcp, "10.0.0.9", &[(8443, 443)]);
        record.labels.insert(
            PROXY_OVERRIDE_LABEL.to_string(),
            json!({
                "virtualservice": {"enable_rhi": true, "services": [{"port": 8443}]},
                "pool": {"lb_algorithm": "LB_ALGORITHM_CONSISTENT_HASH"}
            })
            .to_string(),
        );

        let vs = builder.build(&record, true, None).await.unwrap();

        assert_eq!(vs["enable_rhi"], json!(true));
        // Positional list merge: override element 0 merges into built element 0
        assert_eq!(vs["services"], json!([{"port": 8443, "enable_ssl": true}]));
        assert_eq!(
            str_at(&vs, "/pool_group_ref_data/members/0/pool_ref_data/lb_algorithm"),
            "LB_ALGORITHM_CONSISTENT_HASH"
        );
    }

    #[tokio::test]
    async fn test_malformed_proxy_override_is_ignored() {
        let mock = MockAviClient::new("https://avi.test");
        let builder = builder_with(&mock);

        let mut record = create_test_record("prod_web", Protocol::Tcp, "10.0.0.9", &[(8443, 443)]);
        record
            .labels
            .insert(PROXY_OVERRIDE_LABEL.to_string(), "{not json".to_string());

        let vs = builder.build(&record, true, None).await.unwrap();
        assert_eq!(vs["services"], json!([{"port": 443, "enable_ssl": true}]));
    }

    #[tokio::test]
    async fn test_update_recovers_uuids_from_remote_refs() {
        let mock = MockAviClient::new("https://avi.test");
        mock.add_pool_group(PoolGroup {
            name: "prod_web-poolgroup".to_string(),
            uuid: Some("poolgroup-7".to_string()),
            members: vec![PoolGroupMemberRef {
                pool_ref: "https://avi.test/api/pool/pool-42".to_string(),
                rest: serde_json::Map::new(),
            }],
            rest: serde_json::Map::new(),
        });
        let builder = builder_with(&mock);

        let record = create_test_record("prod_web", Protocol::Tcp, "10.0.0.9", &[(8443, 443)]);
        let prior = VirtualService {
            name: "prod_web".to_string(),
            uuid: Some("virtualservice-3".to_string()),
            created_by: Some(CREATED_BY.to_string()),
            cloud_config_cksum: Some("stale".to_string()),
            pool_group_ref: Some("https://avi.test/api/poolgroup/poolgroup-7".to_string()),
            rest: serde_json::Map::new(),
        };

        let vs = builder.build(&record, false, Some(&prior)).await.unwrap();

        assert_eq!(str_at(&vs, "/uuid"), "virtualservice-3");
        assert_eq!(str_at(&vs, "/pool_group_ref_data/uuid"), "poolgroup-7");
        assert_eq!(
            str_at(&vs, "/pool_group_ref_data/members/0/pool_ref_data/uuid"),
            "pool-42"
        );
    }

    #[tokio::test]
    async fn test_service_ports_deduplicate_across_pools() {
        let mock = MockAviClient::new("https://avi.test");
        let builder = builder_with(&mock);

        let mut record = create_test_record("prod_web", Protocol::Tcp, "10.0.0.9", &[(8080, 9000)]);
        record.pools[0].ports.insert(8081, 9000);
        record.pools[0].ports.insert(8082, 9001);

        let vs = builder.build(&record, true, None).await.unwrap();
        assert_eq!(vs["services"], json!([{"port": 9000}, {"port": 9001}]));
    }
}
