//! Kit description
//!
//! A kit bundles platform/toolchain defaults. Detection happens elsewhere;
//! this core only queries a kit for its name, device class, sysroot, its
//! CMake configuration and its platform seed.

use buildconf_model::{ConfigItem, Configuration, ItemType};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::macros::MacroExpander;

/// Device class a kit builds for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    #[default]
    Desktop,
    /// Devices where shared libraries are the deployable unit
    Mobile,
    Embedded,
}

/// Native SDK data for mobile kits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobilePlatform {
    /// NDK root directory
    pub ndk_location: PathBuf,
    /// Native API level (e.g. "android-24")
    pub native_api_level: String,
    /// Target ABI (e.g. "arm64-v8a")
    pub abi: String,
}

/// A kit as seen by the build configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kit {
    pub id: String,

    pub display_name: String,

    #[serde(default)]
    pub device_class: DeviceClass,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sysroot: Option<String>,

    /// Original target triple of the C++ toolchain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_triple: Option<String>,

    /// CMake configuration in `KEY:TYPE=VALUE` form
    #[serde(default)]
    pub cmake_configuration: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<MobilePlatform>,
}

impl Kit {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            ..Default::default()
        }
    }

    /// Whether shared libraries count as application targets
    pub fn supports_shared_library_deployment(&self) -> bool {
        self.device_class == DeviceClass::Mobile
    }

    /// Display name reduced to characters safe for directory names
    pub fn file_system_name(&self) -> String {
        let mut out = String::with_capacity(self.display_name.len());
        for c in self.display_name.chars() {
            let c = if c.is_ascii_alphanumeric() || matches!(c, '-' | '.') {
                c
            } else {
                '_'
            };
            if c == '_' && out.ends_with('_') {
                continue;
            }
            out.push(c);
        }
        let trimmed = out.trim_matches('_');
        if trimmed.is_empty() {
            "Unnamed".to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Kit-level CMake configuration; malformed entries are skipped
    pub fn configuration(&self) -> Configuration {
        self.cmake_configuration
            .iter()
            .filter_map(|s| ConfigItem::parse(s).ok())
            .collect()
    }

    /// Macro table for `%{Kit:*}` expansions
    pub fn expander(&self) -> MacroExpander {
        let mut expander = MacroExpander::new()
            .with("Kit:Id", self.id.as_str())
            .with("Kit:Name", self.display_name.as_str())
            .with("Kit:FileSystemName", self.file_system_name());
        if let Some(ref sysroot) = self.sysroot {
            expander.insert("Kit:SysRoot", sysroot.as_str());
        }
        expander
    }

    /// Seed items applied once when a build configuration is created
    pub fn initial_configuration(&self) -> Configuration {
        let mut config = Configuration::new();
        let Some(ref platform) = self.mobile else {
            return config;
        };
        if self.device_class != DeviceClass::Mobile {
            return config;
        }

        let ndk = platform.ndk_location.to_string_lossy().to_string();
        let toolchain_file = platform
            .ndk_location
            .join("build/cmake/android.toolchain.cmake")
            .to_string_lossy()
            .to_string();

        config.push(ConfigItem::new("CMAKE_FIND_ROOT_PATH_MODE_PACKAGE", "BOTH"));
        config.push(ConfigItem::new("CMAKE_FIND_ROOT_PATH_MODE_INCLUDE", "BOTH"));
        config.push(ConfigItem::new("CMAKE_FIND_ROOT_PATH_MODE_LIBRARY", "BOTH"));
        config.push(ConfigItem::new("CMAKE_FIND_ROOT_PATH_MODE_PROGRAM", "BOTH"));
        config.push(ConfigItem::typed(
            "ANDROID_STL",
            ItemType::String,
            "Android STL",
            "c++_shared",
        ));
        config.push(ConfigItem::typed(
            "ANDROID_ABI",
            ItemType::String,
            "Android ABI",
            platform.abi.as_str(),
        ));
        config.push(ConfigItem::typed(
            "CMAKE_TOOLCHAIN_FILE",
            ItemType::Path,
            "Android CMake toolchain file",
            toolchain_file,
        ));
        config.push(ConfigItem::typed(
            "ANDROID_NDK",
            ItemType::Path,
            "Android NDK PATH",
            ndk,
        ));
        config.push(ConfigItem::typed(
            "ANDROID_NATIVE_API_LEVEL",
            ItemType::String,
            "Android native API level",
            platform.native_api_level.as_str(),
        ));
        config
    }
}

/// Errors loading a kit file
#[derive(Debug, thiserror::Error)]
pub enum KitError {
    #[error("Failed to read kit file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse kit file {path}: {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Default, Deserialize)]
struct KitFile {
    #[serde(default, rename = "kit")]
    kits: Vec<Kit>,
}

/// Load `[[kit]]` tables from a TOML file
pub fn load_kits(path: &Path) -> Result<Vec<Kit>, KitError> {
    let contents = fs::read_to_string(path).map_err(|e| KitError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_kits(&contents).map_err(|message| KitError::Parse {
        path: path.display().to_string(),
        message,
    })
}

fn parse_kits(contents: &str) -> Result<Vec<Kit>, String> {
    let file: KitFile = toml::from_str(contents).map_err(|e| e.to_string())?;
    Ok(file.kits)
}
