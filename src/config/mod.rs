//! Settings for the config manager.
//!
//! Settings are merged field-by-field from three tiers:
//! 1. **Defaults** - merging enabled, directories discovered
//! 2. **File** - `<jupyter config root>/nb_config_manager.yaml`
//! 3. **Environment** - variables listed below
//!
//! ## Environment Variables
//! - `NB_CONFIG_MANAGER_SETTINGS` - Explicit settings file
//! - `NB_CONFIG_MANAGER_DISABLE_USER_CONFIG` - Skip merging user extensions
//! - `NB_CONFIG_MANAGER_USER_DIR` - User nbconfig directory
//! - `NB_CONFIG_MANAGER_ENV_DIR` - Environment nbconfig directory

mod loader;
mod types;

pub use loader::{
    ENV_DISABLE_USER_CONFIG, ENV_ENV_DIR, ENV_SETTINGS_PATH, ENV_USER_DIR, SETTINGS_FILE_NAME,
    SettingsLoader,
};
pub use types::Settings;
