//! Integration tests for daemon startup and shutdown

use std::time::Duration;

use petdoor_cli::cli::ProvisionArgs;
use petdoor_cli::config::StoreConfig;
use petdoor_cli::{DaemonConfig, RunOptions, commands, run_until};
use petdoor_storage::StorageError;
use tempfile::TempDir;
use tokio::time::{sleep, timeout};

fn config_in(dir: &TempDir) -> DaemonConfig {
    let mut config = DaemonConfig::parse(
        r#"
        [http]
        bind = "127.0.0.1:0"

        [scan]
        window_ms = 20
        interval_ms = 5

        [door]
        switch_poll_ms = 10
        "#,
    )
    .unwrap();
    config.store = StoreConfig {
        path: dir.path().join("petdoor.eeprom"),
        size: 1024,
    };
    config
}

#[tokio::test]
async fn test_refuses_to_start_unprovisioned() {
    let dir = TempDir::new().unwrap();

    let err = run_until(config_in(&dir), RunOptions::default(), async {})
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<StorageError>(),
        Some(StorageError::NotProvisioned { .. })
    ));
}

#[tokio::test]
async fn test_runs_and_stops_when_provisioned() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    commands::provision(
        &config.store,
        &ProvisionArgs {
            ssid: "home".into(),
            password: String::new(),
            beacon: "Ellie".into(),
        },
    )
    .unwrap();

    let result = timeout(
        Duration::from_secs(5),
        run_until(config, RunOptions::default(), sleep(Duration::from_millis(100))),
    )
    .await
    .expect("daemon did not stop");

    assert!(result.is_ok(), "{result:?}");
}

#[tokio::test]
async fn test_config_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("petdoor.toml");
    std::fs::write(&path, "[proximity]\noverride_threshold = -80\n").unwrap();

    let config = DaemonConfig::load_or_default(Some(&path)).unwrap();

    assert_eq!(config.proximity.override_threshold, -80);
    assert!(DaemonConfig::load_or_default(Some(&dir.path().join("missing.toml"))).is_err());
}
