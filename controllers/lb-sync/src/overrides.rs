//! Label-driven configuration overrides
//!
//! Services may carry a reserved label whose value is a JSON object with
//! partial override trees for the built virtual service and/or pool. The
//! merge below is the complete rule set, defined over the closed
//! `serde_json::Value` variant:
//!
//! - scalars and lists of scalars replace the built value outright;
//! - an object merges into an existing object recursively, preserving keys
//!   the override does not mention;
//! - a list of objects merges positionally into an existing list of objects
//!   (element *i* into element *i*, excess elements appended);
//! - on any type mismatch the override wins outright.

use serde_json::{Map, Value};
use tracing::warn;

/// Merge an override tree onto an existing value, in place.
pub fn merge_value(existing: &mut Value, override_val: Value) {
    match (existing, override_val) {
        (Value::Object(base), Value::Object(over)) => {
            for (key, val) in over {
                match base.get_mut(&key) {
                    Some(slot) => merge_value(slot, val),
                    None => {
                        base.insert(key, val);
                    }
                }
            }
        }
        (Value::Array(base), Value::Array(over))
            if base.iter().all(Value::is_object) && over.iter().all(Value::is_object) =>
        {
            for (i, val) in over.into_iter().enumerate() {
                if i < base.len() {
                    merge_value(&mut base[i], val);
                } else {
                    base.push(val);
                }
            }
        }
        (slot, over) => *slot = over,
    }
}

/// Parse the proxy-override label value into its scope map.
///
/// Returns `None` (and warns) when the value is not a JSON object; the
/// default mapping then applies unchanged.
pub fn parse_proxy_override(service_name: &str, raw: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => {
            warn!(
                "override label on {} is not a JSON object; ignoring",
                service_name
            );
            None
        }
        Err(e) => {
            warn!(
                "override label on {} is not valid JSON ({}); ignoring",
                service_name, e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_merges_recursively_preserving_keys() {
        let mut existing = json!({"a": {"b": 1, "c": 3}});
        merge_value(&mut existing, json!({"a": {"b": 2}}));
        assert_eq!(existing, json!({"a": {"b": 2, "c": 3}}));
    }

    #[test]
    fn test_list_of_objects_merges_positionally() {
        let mut existing = json!([{"y": 2}, {"z": 3}]);
        merge_value(&mut existing, json!([{"x": 1}]));
        assert_eq!(existing, json!([{"y": 2, "x": 1}, {"z": 3}]));
    }

    #[test]
    fn test_list_of_objects_appends_excess_elements() {
        let mut existing = json!([{"y": 2}]);
        merge_value(&mut existing, json!([{"y": 9}, {"z": 3}]));
        assert_eq!(existing, json!([{"y": 9}, {"z": 3}]));
    }

    #[test]
    fn test_scalars_replace_outright() {
        let mut existing = json!({"port": 80, "enabled": false});
        merge_value(&mut existing, json!({"port": 443, "enabled": true}));
        assert_eq!(existing, json!({"port": 443, "enabled": true}));
    }

    #[test]
    fn test_list_of_scalars_replaces_outright() {
        let mut existing = json!({"refs": ["a", "b"]});
        merge_value(&mut existing, json!({"refs": ["c"]}));
        assert_eq!(existing, json!({"refs": ["c"]}));
    }

    #[test]
    fn test_type_mismatch_lets_override_win() {
        let mut existing = json!({"vip": [{"auto_allocate_ip": true}]});
        merge_value(&mut existing, json!({"vip": "static"}));
        assert_eq!(existing, json!({"vip": "static"}));

        let mut existing = json!({"name": "prod_web"});
        merge_value(&mut existing, json!({"name": {"alias": "web"}}));
        assert_eq!(existing, json!({"name": {"alias": "web"}}));
    }

    #[test]
    fn test_unmentioned_keys_are_added() {
        let mut existing = json!({"a": 1});
        merge_value(&mut existing, json!({"b": 2}));
        assert_eq!(existing, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_parse_proxy_override_rejects_non_objects() {
        assert!(parse_proxy_override("svc", "not json").is_none());
        assert!(parse_proxy_override("svc", "[1, 2]").is_none());
        assert!(parse_proxy_override("svc", "{\"pool\": {}}").is_some());
    }
}
