//! Integration tests for ConfigManager and configuration file handling
//!
//! These tests verify:
//! - Configuration loading and saving
//! - Defaults when the file is missing or partial
//! - Invalid YAML is reported, not defaulted

use apk_versioning::models::{DEFAULT_MANIFEST_PATH, ManifestPathCheck};
use apk_versioning::{ConfigManager, VersioningConfig};
use camino::Utf8PathBuf;
use std::fs;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

#[test]
fn test_create_config_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    assert_eq!(manager.config_dir(), &config_path);
}

#[test]
fn test_load_default_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    // Config file doesn't exist, should return defaults
    let config = manager.load_versioning_config().unwrap();

    assert_eq!(config, VersioningConfig::default());
    assert_eq!(config.manifest_path, DEFAULT_MANIFEST_PATH);
}

#[test]
fn test_load_partial_config_file() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let yaml = r#"
read_from_file_enabled: true
auto_increment_enabled: true
counter_file_path: "ci/version.txt"
version_name_env_var: "VERSION_NAME"
"#;
    fs::write(manager.config_path(), yaml).unwrap();

    let config = manager.load_versioning_config().unwrap();

    assert!(config.read_from_file_enabled);
    assert!(config.auto_increment_enabled);
    assert_eq!(config.counter_file_path, "ci/version.txt");
    assert_eq!(config.version_name_env_var, "VERSION_NAME");
    assert_eq!(config.manifest_path, DEFAULT_MANIFEST_PATH);
    assert!(config.version_number_env_var.is_empty());
}

#[test]
fn test_save_and_load_round_trip() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let config = VersioningConfig {
        read_from_file_enabled: false,
        auto_increment_enabled: true,
        counter_file_path: "version.txt".to_string(),
        manifest_path: "app/src/main/AndroidManifest.xml".to_string(),
        version_number_env_var: "BUILD_NUMBER".to_string(),
        version_name_env_var: "GIT_TAG".to_string(),
    };

    manager.save_versioning_config(&config).unwrap();
    let loaded = manager.load_versioning_config().unwrap();

    assert_eq!(loaded, config);
    assert_eq!(loaded.check_manifest_path(), ManifestPathCheck::Ok);
}

#[test]
fn test_invalid_yaml_is_an_error() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    fs::write(manager.config_path(), "read_from_file_enabled: [not, a, bool\n").unwrap();

    assert!(manager.load_versioning_config().is_err());
}
