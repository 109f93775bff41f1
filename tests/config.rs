use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use tempfile::tempdir;
use visitor_router::{ConfigError, RouterConfig};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults() {
    let config = RouterConfig::default();
    assert_eq!(config, RouterConfig::v0());
    assert_eq!(config.redis_url, "redis://127.0.0.1/");
    assert_eq!(config.store_timeout(), Duration::from_millis(250));
    assert_eq!(config.counter_key_prefix, "accepts");
    assert_eq!(config.target_key_prefix, "target");
}

#[test]
fn environment_overrides() {
    let config = RouterConfig::from_lookup(lookup(&[
        ("REDIS_URL", "redis://cache:6379/2"),
        ("ROUTER_STORE_TIMEOUT_MS", " 900 "),
        ("ROUTER_COUNTER_PREFIX", "caps"),
    ]))
    .unwrap();

    assert_eq!(config.redis_url, "redis://cache:6379/2");
    assert_eq!(config.store_timeout_ms, 900);
    assert_eq!(config.counter_key_prefix, "caps");
    assert_eq!(config.target_key_prefix, "target");
}

#[test]
fn malformed_environment_values_fail() {
    let err =
        RouterConfig::from_lookup(lookup(&[("ROUTER_STORE_TIMEOUT_MS", "fast")])).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue { key: "ROUTER_STORE_TIMEOUT_MS", .. }
    ));

    assert!(RouterConfig::from_lookup(lookup(&[("ROUTER_STORE_TIMEOUT_MS", "0")])).is_err());
    assert!(RouterConfig::from_lookup(lookup(&[("ROUTER_COUNTER_PREFIX", "a:b")])).is_err());
    assert!(RouterConfig::from_lookup(lookup(&[("ROUTER_TARGET_PREFIX", "")])).is_err());
}

#[test]
fn json_file_with_partial_fields_uses_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("router.json");
    fs::write(&path, r#"{ "store_timeout_ms": 1000 }"#).unwrap();

    let config = RouterConfig::from_json_file(&path).unwrap();
    assert_eq!(config.store_timeout(), Duration::from_secs(1));
    assert_eq!(config.counter_key_prefix, "accepts");
}

#[test]
fn json_file_errors() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        RouterConfig::from_json_file(&dir.path().join("nope.json")),
        Err(ConfigError::Io(_))
    ));

    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{ "store_timeout_ms": "soon" }"#).unwrap();
    assert!(matches!(
        RouterConfig::from_json_file(&path),
        Err(ConfigError::Serialization(_))
    ));
}
