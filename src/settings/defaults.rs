//! Built-in defaults (layer 1) and the typed settings view

use serde::{Deserialize, Serialize};

/// Default build directory template, relative to the project directory
pub const DEFAULT_BUILD_DIRECTORY_TEMPLATE: &str =
    "../build-%{Project:Name}-%{Kit:FileSystemName}-%{BuildConfig:Name}";

/// Default deployment manifest name
pub const DEFAULT_DEPLOYMENT_FILE_NAME: &str = "QtCreatorDeployment.txt";

/// Default generator cache file name
pub const DEFAULT_CACHE_FILE_NAME: &str = "CMakeCache.txt";

/// Built-in default values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    pub build_directory_template: String,
    pub deployment_file_name: String,
    pub cache_file_name: String,
    pub build_type_key: String,
    pub log_filter: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            build_directory_template: DEFAULT_BUILD_DIRECTORY_TEMPLATE.to_string(),
            deployment_file_name: DEFAULT_DEPLOYMENT_FILE_NAME.to_string(),
            cache_file_name: DEFAULT_CACHE_FILE_NAME.to_string(),
            build_type_key: buildconf_model::BUILD_TYPE_KEY.to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "build_directory_template": self.build_directory_template,
            "deployment": {
                "file_name": self.deployment_file_name
            },
            "cache": {
                "file_name": self.cache_file_name,
                "build_type_key": self.build_type_key
            },
            "log": {
                "filter": self.log_filter
            }
        })
    }
}

/// Typed view of merged settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub build_directory_template: String,
    pub deployment: DeploymentSettings,
    pub cache: CacheSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSettings {
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    pub file_name: String,
    pub build_type_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    pub filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        let defaults = BuiltinDefaults::default();
        Self {
            build_directory_template: defaults.build_directory_template,
            deployment: DeploymentSettings {
                file_name: defaults.deployment_file_name,
            },
            cache: CacheSettings {
                file_name: defaults.cache_file_name,
                build_type_key: defaults.build_type_key,
            },
            log: LogSettings {
                filter: defaults.log_filter,
            },
        }
    }
}
