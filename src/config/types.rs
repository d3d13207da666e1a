//! Settings for the config manager itself.

use crate::error::DiscoveryError;
use crate::paths::{ConfigDirs, NBCONFIG_SUBDIR, environment_config_root, user_config_root};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Knobs controlling how the resolver is constructed.
///
/// Directory fields are nbconfig directories, not Jupyter roots. When unset
/// they are filled in by path discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Do not merge anything from the user config directory.
    pub disable_user_config: bool,

    /// Override for the user nbconfig directory.
    pub user_config_dir: Option<PathBuf>,

    /// Override for the environment nbconfig directory.
    pub environment_config_dir: Option<PathBuf>,
}

impl Settings {
    /// Resolve both directories, discovering any that are not overridden.
    pub fn config_dirs(&self) -> Result<ConfigDirs, DiscoveryError> {
        self.config_dirs_with(|key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Like [`Settings::config_dirs`] with an explicit environment lookup.
    pub fn config_dirs_with<F>(
        &self,
        lookup: F,
        home: Option<PathBuf>,
    ) -> Result<ConfigDirs, DiscoveryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user_dir = match &self.user_config_dir {
            Some(dir) => dir.clone(),
            None => user_config_root(&lookup, home)?.join(NBCONFIG_SUBDIR),
        };
        let environment_dir = match &self.environment_config_dir {
            Some(dir) => dir.clone(),
            None => environment_config_root(&lookup)?.join(NBCONFIG_SUBDIR),
        };
        Ok(ConfigDirs::new(user_dir, environment_dir))
    }
}
