//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be written to disk, loaded
//! back, and turned into notification options.

use solidnotify_client::{NotificationError, NotificationOptions};
use solidnotify_core::{ConfigError, NotifyConfig};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json5");

    let config = NotifyConfig::default();
    config.save(&path).unwrap();

    let loaded = NotifyConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.auth.token_env, "SOLIDNOTIFY_TOKEN");
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json5");

    let mut config = NotifyConfig::default();
    config.gateway = Some("https://pod.example/notifications/".to_string());
    config.features.ttl = Some(600);
    config.subscription.subprotocol = Some("solid-0.2".to_string());
    config.save(&path).unwrap();

    let loaded = NotifyConfig::load(&path).unwrap();
    assert_eq!(loaded.gateway.as_deref(), Some("https://pod.example/notifications/"));
    assert_eq!(loaded.features.ttl, Some(600));
    assert_eq!(loaded.subscription.subprotocol.as_deref(), Some("solid-0.2"));
}

#[test]
fn test_handwritten_json5() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json5");
    std::fs::write(
        &path,
        r#"{
            // Discovery host for a pod behind a proxy
            host: 'https://storage.example/',
            features: { rate: 5, filter: 'Delete', },
        }"#,
    )
    .unwrap();

    let config = NotifyConfig::load(&path).unwrap();
    config.validate().unwrap();

    let options = NotificationOptions::from_config(&config).unwrap();
    assert_eq!(options.host.unwrap().as_str(), "https://storage.example/");
    assert!(options.gateway.is_none());
    assert_eq!(options.features.rate, Some(5));
    assert_eq!(options.features.filter.as_deref(), Some("Delete"));
}

#[test]
fn test_invalid_values_are_rejected() {
    let config = NotifyConfig::parse(r#"{ gateway: "not a url", features: { ttl: 0 } }"#).unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));

    assert!(matches!(
        NotificationOptions::from_config(&config),
        Err(NotificationError::Config(_))
    ));
}

#[test]
fn test_config_load_nonexistent() {
    let result = NotifyConfig::load(Path::new("/nonexistent/config.json5"));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_config_parse_invalid() {
    let result = NotifyConfig::parse("not valid json5");
    assert!(result.is_err());
}
