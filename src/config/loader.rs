//! Settings loader with tier-based merging.
//!
//! Tiers, lowest to highest: defaults, settings file, environment variables.
//! Command-line flags are applied on top by the binary.

use super::types::Settings;
use crate::merge::deep_merge_all;
use crate::paths::user_config_root;
use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Settings file name inside the user's Jupyter config root.
pub const SETTINGS_FILE_NAME: &str = "nb_config_manager.yaml";

/// Environment variable naming an explicit settings file.
pub const ENV_SETTINGS_PATH: &str = "NB_CONFIG_MANAGER_SETTINGS";
pub const ENV_DISABLE_USER_CONFIG: &str = "NB_CONFIG_MANAGER_DISABLE_USER_CONFIG";
pub const ENV_USER_DIR: &str = "NB_CONFIG_MANAGER_USER_DIR";
pub const ENV_ENV_DIR: &str = "NB_CONFIG_MANAGER_ENV_DIR";

/// Loads [`Settings`] from all tiers.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    settings: Settings,
    /// Settings file that contributed, if any.
    settings_path: Option<PathBuf>,
}

impl SettingsLoader {
    /// Load from the process environment.
    ///
    /// `explicit_path` (e.g. from `--settings`) wins over `$NB_CONFIG_MANAGER_SETTINGS`.
    pub fn load(explicit_path: Option<PathBuf>) -> Result<Self> {
        Self::load_with(explicit_path, |key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Load with an explicit environment lookup.
    pub fn load_with<F>(explicit_path: Option<PathBuf>, lookup: F, home: Option<PathBuf>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut tiers: Vec<Value> = Vec::new();

        // Tier 1: defaults
        tiers.push(serde_json::to_value(Settings::default())?);

        // Tier 2: settings file. An explicitly named file must be readable;
        // the default location is optional.
        let explicit = explicit_path.or_else(|| lookup(ENV_SETTINGS_PATH).map(PathBuf::from));
        let mut settings_path = None;
        match explicit {
            Some(path) => {
                tiers.push(read_settings_file(&path)?);
                settings_path = Some(path);
            }
            None => {
                if let Ok(root) = user_config_root(&lookup, home) {
                    let path = root.join(SETTINGS_FILE_NAME);
                    if path.exists() {
                        match read_settings_file(&path) {
                            Ok(value) => {
                                tiers.push(value);
                                settings_path = Some(path);
                            }
                            Err(e) => warn!(path = %path.display(), error = %e, "Ignoring unreadable settings file"),
                        }
                    }
                }
            }
        }

        // Tier 3: environment variables
        tiers.push(env_overrides(&lookup));

        let merged = deep_merge_all(tiers);
        let settings: Settings =
            serde_json::from_value(merged).context("Invalid nb_config_manager settings")?;
        debug!(?settings, "Loaded settings");

        Ok(Self {
            settings,
            settings_path,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }

    /// The settings file that was read, if any.
    pub fn settings_path(&self) -> Option<&Path> {
        self.settings_path.as_deref()
    }
}

fn read_settings_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse settings file {}", path.display()))
}

/// Build the environment-variable tier. Unset variables stay `null` so they
/// do not mask lower tiers.
fn env_overrides<F>(lookup: &F) -> Value
where
    F: Fn(&str) -> Option<String>,
{
    let disable = lookup(ENV_DISABLE_USER_CONFIG).and_then(|raw| {
        let parsed = parse_bool(&raw);
        if parsed.is_none() {
            warn!(var = ENV_DISABLE_USER_CONFIG, value = %raw, "Ignoring non-boolean value");
        }
        parsed
    });
    let user_dir = lookup(ENV_USER_DIR).filter(|v| !v.is_empty());
    let env_dir = lookup(ENV_ENV_DIR).filter(|v| !v.is_empty());

    json!({
        "disable_user_config": disable,
        "user_config_dir": user_dir,
        "environment_config_dir": env_dir,
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
