//! Discovery of the user and environment config directories.
//!
//! Both roots are resolved from the process environment by default, but the
//! lookup is injectable so callers and tests can supply their own values:
//! - User root: `$JUPYTER_CONFIG_DIR`, else `<home>/.jupyter`
//! - Environment root: `<prefix>/etc/jupyter`, where prefix is `$CONDA_PREFIX`
//!   or else `$VIRTUAL_ENV`
//!
//! The notebook frontend config lives in the `nbconfig` subdirectory of each root.

use crate::error::DiscoveryError;
use std::path::{Path, PathBuf};

/// Subdirectory of a Jupyter config root holding frontend section files.
pub const NBCONFIG_SUBDIR: &str = "nbconfig";

/// The two directories the resolver chooses between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDirs {
    /// Per-user nbconfig directory.
    pub user_dir: PathBuf,
    /// Installation-wide nbconfig directory.
    pub environment_dir: PathBuf,
}

impl ConfigDirs {
    /// Create with explicit directories.
    pub fn new(user_dir: impl Into<PathBuf>, environment_dir: impl Into<PathBuf>) -> Self {
        Self {
            user_dir: user_dir.into(),
            environment_dir: environment_dir.into(),
        }
    }

    /// Discover both directories from the process environment.
    pub fn discover() -> Result<Self, DiscoveryError> {
        Self::discover_with(|key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Discover both directories using `lookup` for environment variables.
    pub fn discover_with<F>(lookup: F, home: Option<PathBuf>) -> Result<Self, DiscoveryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user_root = user_config_root(&lookup, home)?;
        let env_root = environment_config_root(&lookup)?;
        Ok(Self {
            user_dir: user_root.join(NBCONFIG_SUBDIR),
            environment_dir: env_root.join(NBCONFIG_SUBDIR),
        })
    }
}

/// The user's Jupyter config root (not the `nbconfig` subdirectory).
pub fn user_config_root<F>(lookup: &F, home: Option<PathBuf>) -> Result<PathBuf, DiscoveryError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = non_empty(lookup("JUPYTER_CONFIG_DIR")) {
        return Ok(PathBuf::from(dir));
    }
    home.map(|h| h.join(".jupyter"))
        .ok_or(DiscoveryError::NoUserDir)
}

/// The active environment's Jupyter config root.
pub fn environment_config_root<F>(lookup: &F) -> Result<PathBuf, DiscoveryError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup("CONDA_PREFIX"))
        .or_else(|| non_empty(lookup("VIRTUAL_ENV")))
        .map(|prefix| prefix_config_root(Path::new(&prefix)))
        .ok_or(DiscoveryError::NoEnvironmentPrefix)
}

/// Config root under an installation prefix: `<prefix>/etc/jupyter`.
pub fn prefix_config_root(prefix: &Path) -> PathBuf {
    prefix.join("etc").join("jupyter")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
