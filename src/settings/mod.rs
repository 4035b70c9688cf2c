//! Settings layer system
//!
//! Implements the 4-layer settings merge:
//! 1. Built-in defaults
//! 2. User settings (~/.config/cmake-buildconf/settings.toml)
//! 3. Project settings (<project>/.cmake-buildconf.toml)
//! 4. CLI overrides

mod defaults;
mod effective;
mod merge;

pub use defaults::{
    BuiltinDefaults, CacheSettings, DeploymentSettings, LogSettings, Settings,
    DEFAULT_BUILD_DIRECTORY_TEMPLATE, DEFAULT_CACHE_FILE_NAME, DEFAULT_DEPLOYMENT_FILE_NAME,
};
pub use effective::{
    project_settings_path, user_settings_path, EffectiveSettings, SettingsError, SettingsOrigin,
    SettingsSource,
};
pub use merge::{deep_merge, merge_layers};
