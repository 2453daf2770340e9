use std::path::PathBuf;
use std::sync::Mutex;

use prometheus_sd_sync::common::config::{load_server_config, ServerConfig, TargetSyncConfig};

// load_server_config reads the process environment
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn blank_config() -> ServerConfig {
    ServerConfig {
        node_id: None,
        hostname: "web-1".to_string(),
        target_directory: None,
        target_filename: None,
        metrics_port: 3030,
        heartbeat_dir: None,
        heartbeat_interval_ms: 2000,
        heartbeat_timeout_ms: 10000,
    }
}

#[test]
fn test_load_from_json_file() {
    let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("target_sync.json");
    std::fs::write(
        &path,
        r#"{
            "node_id": "node-7",
            "target_directory": "/srv/prometheus/sd",
            "target_filename": "cluster.json",
            "metrics_port": 9100,
            "heartbeat_interval_ms": 500
        }"#,
    )
    .unwrap();

    let config = load_server_config(path.to_str().unwrap()).unwrap();

    assert_eq!(config.node_id(), "node-7");
    assert_eq!(config.heartbeat_interval_ms, 500);
    assert_eq!(
        config.target_sync(),
        Some(TargetSyncConfig {
            path: PathBuf::from("/srv/prometheus/sd/cluster.json"),
            metrics_port: 9100,
        })
    );
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let config = load_server_config(path.to_str().unwrap()).unwrap();

    assert_eq!(config.metrics_port, 3030);
    assert_eq!(config.heartbeat_timeout_ms, 10000);
}

#[test]
fn test_target_location_needs_both_parts() {
    let mut config = blank_config();
    assert!(config.target_sync().is_none());

    config.target_directory = Some("/srv/sd".to_string());
    assert!(config.target_sync().is_none());

    config.target_filename = Some("  ".to_string());
    assert!(config.target_sync().is_none());

    config.target_filename = Some("targets.json".to_string());
    assert_eq!(config.target_sync().unwrap().path, PathBuf::from("/srv/sd/targets.json"));
}

#[test]
fn test_node_id_defaults_to_hostname_and_pid() {
    let config = blank_config();
    assert_eq!(config.node_id(), format!("web-1-{}", std::process::id()));
}

#[test]
fn test_legacy_env_names_override_file() {
    let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("target_sync.json");
    std::fs::write(
        &path,
        r#"{"target_directory": "/srv/prometheus/sd", "target_filename": "cluster.json"}"#,
    )
    .unwrap();

    // SAFETY: every test touching the environment holds ENV_LOCK
    unsafe {
        std::env::set_var("TARGETDIR", "/other/sd");
        std::env::set_var("TARGETFILE", "nodes.json");
    }
    let config = load_server_config(path.to_str().unwrap());
    unsafe {
        std::env::remove_var("TARGETDIR");
        std::env::remove_var("TARGETFILE");
    }

    let config = config.expect("legacy names must not clash with the file keys");
    assert_eq!(
        config.target_sync().unwrap().path,
        PathBuf::from("/other/sd/nodes.json")
    );
}
