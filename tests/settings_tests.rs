//! Integration tests for settings loading feeding the resolver.

use nb_config_manager::config::{ENV_DISABLE_USER_CONFIG, SettingsLoader};
use nb_config_manager::resolver::LayerReason;
use nb_config_manager::{ConfigResolver, DocumentStore};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

/// Settings file pointing both directories into `temp`.
fn write_settings(temp: &TempDir, extra: &str) -> std::path::PathBuf {
    let path = temp.path().join("settings.yaml");
    let content = format!(
        "user_config_dir: {}\nenvironment_config_dir: {}\n{}",
        temp.path().join("user").display(),
        temp.path().join("env").display(),
        extra
    );
    fs::write(&path, content).unwrap();
    path
}

fn seed_dirs(temp: &TempDir) {
    let user = temp.path().join("user");
    let env = temp.path().join("env");
    fs::create_dir_all(&user).unwrap();
    fs::create_dir_all(&env).unwrap();
    fs::write(
        user.join("notebook.json"),
        r#"{"load_extensions": {"toc/main": true}}"#,
    )
    .unwrap();
}

#[test]
fn settings_file_directories_drive_resolution() {
    let temp = TempDir::new().unwrap();
    seed_dirs(&temp);
    let path = write_settings(&temp, "");

    let settings = SettingsLoader::load_with(Some(path), |_| None, None)
        .unwrap()
        .into_settings();
    let dirs = settings.config_dirs_with(|_| None, None).unwrap();
    let resolver = ConfigResolver::new(dirs, settings.disable_user_config).unwrap();

    assert_eq!(resolver.active_config_dir(), temp.path().join("env").as_path());
    assert_eq!(
        serde_json::Value::Object(resolver.get("notebook").unwrap()),
        json!({"load_extensions": {"toc/main": true}})
    );
}

#[test]
fn disable_user_config_from_environment_skips_merge() {
    let temp = TempDir::new().unwrap();
    seed_dirs(&temp);
    let path = write_settings(&temp, "");

    let lookup = |key: &str| (key == ENV_DISABLE_USER_CONFIG).then(|| "true".to_string());
    let settings = SettingsLoader::load_with(Some(path), lookup, None)
        .unwrap()
        .into_settings();
    assert!(settings.disable_user_config);

    let dirs = settings.config_dirs_with(|_| None, None).unwrap();
    let resolver = ConfigResolver::new(dirs, settings.disable_user_config).unwrap();

    assert_eq!(resolver.resolution().reason, LayerReason::MergeSuppressed);
    assert!(resolver.get("notebook").unwrap().is_empty());
    assert!(!temp.path().join("env").join("notebook.json").exists());
}
