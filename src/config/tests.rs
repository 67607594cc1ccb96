// Author: Dustin Pilgrim
// License: MIT

#[cfg(test)]
use super::*;
#[cfg(test)]
use serde::{Deserialize, Serialize};
#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::fs;

#[cfg(test)]
const SERVICE: &str = r#"
# service settings
app:
  name: demo
  version: "1.0.0"
  debug: true

  server:
    host: localhost
    port: 8080

  features:
    - auth
    - logging
"#;

#[test]
fn test_config_from_string() {
    let config = YamlConfig::from_str(SERVICE).expect("Failed to parse config");
    assert!(config.is_loaded());

    let name: String = config.get("app.name").expect("Failed to get app.name");
    assert_eq!(name, "demo");

    let version: String = config.get("app.version").expect("Failed to get version");
    assert_eq!(version, "1.0.0");

    let port: u16 = config.get("app.server.port").expect("Failed to get port");
    assert_eq!(port, 8080);

    let debug: bool = config.get("app.debug").expect("Failed to get debug");
    assert!(debug);

    let features: Vec<String> = config.get("app.features").expect("Failed to get features");
    assert_eq!(features, vec!["auth", "logging"]);

    assert!(config.has("app.name"));
    assert!(!config.has("app.nonexistent"));

    let server_keys = config.get_keys("app.server").expect("Failed to get server keys");
    assert_eq!(server_keys, vec!["host", "port"]);
}

#[test]
fn test_get_errors_and_fallbacks() {
    let config = YamlConfig::from_str(SERVICE).unwrap();

    match config.get::<String>("app.missing") {
        Err(YamlError::PathNotFound { code, .. }) => assert_eq!(code, Some(304)),
        other => panic!("Expected PathNotFound, got {:?}", other),
    }

    let missing: Option<u16> = config.get_optional("app.server.timeout").expect("Lookup should succeed");
    assert_eq!(missing, None);
    let present: Option<u16> = config.get_optional("app.server.port").unwrap();
    assert_eq!(present, Some(8080));

    assert_eq!(config.get_or("app.server.timeout", 30u64), 30);
    assert_eq!(config.get_or("app.name", 0u8), 0, "wrong shape falls back too");

    let err = config.get::<u16>("app.features").unwrap_err();
    println!("decode error: {}", err);
    assert!(matches!(err, YamlError::DecodeError { .. }));
    assert!(err.to_string().contains("app.features"));

    assert!(matches!(config.get_keys("app.name"), Err(YamlError::AddressError { .. })));
    assert!(matches!(config.get_node("app.name.first"), Err(YamlError::AddressError { .. })));
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
struct Server {
    host: String,
    port: u16,
}

#[test]
fn test_struct_access_and_set_serialized() {
    let mut config = YamlConfig::from_str(SERVICE).unwrap();

    let server: Server = config.get("app.server").expect("Failed to decode server");
    assert_eq!(server, Server { host: "localhost".into(), port: 8080 });

    let replica = Server { host: "replica.local".into(), port: 5433 };
    config.set_serialized("app.replica", &replica).expect("Failed to store struct");
    let back: Server = config.get("app.replica").unwrap();
    assert_eq!(back, replica);

    let labels: HashMap<String, String> = HashMap::from([("tier".to_string(), "gold".to_string())]);
    config.set_serialized("app.labels", &labels).unwrap();
    assert_eq!(config.get::<String>("app.labels.tier").unwrap(), "gold");
}

#[test]
fn test_set_and_remove() {
    let mut config = YamlConfig::from_str(SERVICE).unwrap();

    config.set("app.server.port", 9090).expect("Failed to set port");
    config.set("app.server.tls", true).unwrap();
    config.set("app.owner.email", "ops@example.com").unwrap();
    config.set("app.ratio", 0.25).unwrap();

    assert_eq!(config.get::<u16>("app.server.port").unwrap(), 9090);
    assert_eq!(config.get_keys("app.server").unwrap(), vec!["host", "port", "tls"]);
    assert_eq!(config.get::<String>("app.owner.email").unwrap(), "ops@example.com");
    assert_eq!(config.get::<f64>("app.ratio").unwrap(), 0.25);

    config.remove("app.server.tls").unwrap();
    config.remove("app.never.there").unwrap();
    assert!(!config.has("app.server.tls"));
    assert!(!config.has("app.never"));
}

#[test]
fn test_set_text_that_looks_typed_stays_text() {
    let mut config = YamlConfig::from_str("version: 1\n").unwrap();
    config.set("version", "2").unwrap();

    assert_eq!(config.get::<String>("version").unwrap(), "2");
    let value: serde_json::Value = config.get("version").unwrap();
    assert_eq!(value, serde_json::json!("2"));
}

#[test]
fn test_new_starts_empty_and_unloaded() {
    let mut config = YamlConfig::new("never-written.yaml");
    assert!(!config.is_loaded());
    assert_eq!(config.get_keys("").unwrap(), Vec::<String>::new());

    config.set("a.b", 1).unwrap();
    assert_eq!(config.get::<i64>("a.b").unwrap(), 1);
}

#[test]
fn test_null_root_becomes_mapping_on_set() {
    let mut config = YamlConfig::from_str("~\n").unwrap();
    config.set("key", "value").expect("Null root should widen");
    assert_eq!(config.get::<String>("key").unwrap(), "value");
}

#[test]
fn test_scalar_root_rejects_keys() {
    let mut config = YamlConfig::from_str("just text\n").unwrap();
    assert!(matches!(config.set("key", 1), Err(YamlError::AddressError { .. })));
    assert_eq!(config.get::<String>("").unwrap(), "just text");
}

#[test]
fn test_syntax_error_propagates_from_str() {
    let result = YamlConfig::from_str("key: [unclosed\n");
    assert!(matches!(result, Err(YamlError::SyntaxError { .. })));
}

#[test]
fn test_load_and_save_round_trip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("service.yaml");
    fs::write(&path, SERVICE).unwrap();

    let mut config = YamlConfig::open(&path);
    assert!(config.is_loaded());
    assert_eq!(config.path(), path.as_path());

    config.set("app.server.port", 9090).unwrap();
    config.set("app.features.1", "metrics").unwrap();
    config.save().expect("Failed to save");

    let written = fs::read_to_string(&path).unwrap();
    println!("--- Saved YAML ---\n{}", written);

    let reloaded = YamlConfig::open(&path);
    assert!(reloaded.is_loaded());
    assert_eq!(reloaded.get::<u16>("app.server.port").unwrap(), 9090);
    assert_eq!(reloaded.get::<String>("app.version").unwrap(), "1.0.0");
    assert_eq!(reloaded.get::<Vec<String>>("app.features").unwrap(), vec!["auth", "metrics"]);
    assert_eq!(reloaded.get_keys("app").unwrap(), vec!["name", "version", "debug", "server", "features"]);
}

#[test]
fn test_created_keys_survive_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.yaml");

    let mut config = YamlConfig::new(&path);
    config.set("a..b", 1).unwrap();
    config.set("colors.0x1F", "red").unwrap();
    config.set("flags.~", "t").unwrap();
    config.set("ports.8080", "http").unwrap();
    config.save().expect("Failed to save");
    println!("--- Saved YAML ---\n{}", fs::read_to_string(&path).unwrap());

    let reloaded = YamlConfig::open(&path);
    assert!(reloaded.is_loaded());
    assert_eq!(reloaded.get::<i64>("a..b").expect("Empty key should survive"), 1);
    assert_eq!(reloaded.get::<String>("colors.0x1F").expect("Hex-looking key should survive"), "red");
    assert_eq!(reloaded.get::<String>("flags.~").expect("Tilde key should survive"), "t");
    assert_eq!(reloaded.get::<String>("ports.8080").unwrap(), "http");
}

#[test]
fn test_remove_missing_nested_path_leaves_document_alone() {
    let mut config = YamlConfig::from_str(SERVICE).unwrap();
    let before = config.document().cloned();

    config.remove("app.name.first").expect("Removing below a scalar should succeed");
    config.remove("nope.still.nope").unwrap();

    assert_eq!(config.document().cloned(), before);
    assert_eq!(config.get::<String>("app.name").unwrap(), "demo");
}

#[test]
fn test_save_to_creates_new_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.yaml");

    let mut config = YamlConfig::new(&path);
    config.set("name", "fresh").unwrap();
    config.save_to(&path).expect("Failed to create file");

    assert!(path.exists());
    assert!(YamlConfig::open(&path).has("name"));
}

#[test]
fn test_load_failures_degrade_to_unloaded() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.yaml");
    let mut config = YamlConfig::open(&missing);
    assert!(!config.is_loaded());
    assert!(config.document().is_none());
    assert!(matches!(config.set("a", 1), Err(YamlError::RuntimeError { .. })));
    assert!(matches!(config.save(), Err(YamlError::RuntimeError { .. })));

    let empty = dir.path().join("empty.yaml");
    fs::write(&empty, "").unwrap();
    assert!(!config.load_from(&empty));
    assert_eq!(config.path(), empty.as_path());

    let broken = dir.path().join("broken.yaml");
    fs::write(&broken, "a: [1, 2\nb: }\n").unwrap();
    assert!(!config.load_from(&broken));
    assert!(config.root().is_none());

    let good = dir.path().join("good.yaml");
    fs::write(&good, "ok: yes\n").unwrap();
    assert!(config.load_from(&good));
    assert_eq!(config.get::<String>("ok").unwrap(), "yes");
}

#[test]
fn test_save_to_unwritable_path_is_file_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = YamlConfig::from_str("a: 1\n").unwrap();

    let result = config.save_to(dir.path().join("no-such-dir").join("out.yaml"));
    assert!(matches!(result, Err(YamlError::FileError { .. })));
}

#[test]
fn test_home_expansion() {
    let Some(home) = dirs::home_dir() else {
        return;
    };
    let config = YamlConfig::new("~/settings/app.yaml");
    assert_eq!(config.path(), home.join("settings/app.yaml").as_path());
}
