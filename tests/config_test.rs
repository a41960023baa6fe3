//! 設定ファイルの保存・読込テスト

use picking_list::config::{Config, Resource};
use tempfile::tempdir;

#[test]
fn test_config_round_trip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("picking-list").join("config.json");

    let mut config = Config::default();
    config.set_url("shipments=https://erp.local/rest/PICK_CARGA").unwrap();
    config.set_url("paletes=https://erp.local/rest/PICK_PALETE").unwrap();
    config.username = Some("operador".into());
    config.timeout_seconds = 10;
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.shipments_url.as_deref(), Some("https://erp.local/rest/PICK_CARGA"));
    assert_eq!(loaded.pallets_url.as_deref(), Some("https://erp.local/rest/PICK_PALETE"));
    assert!(loaded.items_url.is_none());
    assert_eq!(loaded.username.as_deref(), Some("operador"));
    assert_eq!(loaded.timeout_seconds, 10);
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config::load_from(&dir.path().join("none.json")).unwrap();

    assert_eq!(config.timeout_seconds, 30);
    assert!(config.shipments_url.is_none());
}

#[test]
fn test_broken_file_is_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(Config::load_from(&path).is_err());
}

#[test]
fn test_configured_url_used() {
    if std::env::var(Resource::Items.env_var()).is_ok() {
        eprintln!("PICKING_ITEMS_URL set; skipping");
        return;
    }

    let mut config = Config::default();
    assert!(config.url(Resource::Items).is_err());

    config.set_url("items=http://localhost:8080/PICK_ITENS").unwrap();
    assert_eq!(config.url(Resource::Items).unwrap(), "http://localhost:8080/PICK_ITENS");
}
