//! Build types and inference from the CMake cache

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Coarse build type used by the rest of the IDE
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    #[default]
    Unknown,
    Debug,
    Profile,
    Release,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Unknown => "unknown",
            BuildType::Debug => "debug",
            BuildType::Profile => "profile",
            BuildType::Release => "release",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `CMAKE_BUILD_TYPE` values known to CMake
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CMakeBuildType {
    #[default]
    None,
    Debug,
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl CMakeBuildType {
    /// Enumeration order of the build-info factory
    pub const ALL: [CMakeBuildType; 5] = [
        CMakeBuildType::None,
        CMakeBuildType::Debug,
        CMakeBuildType::Release,
        CMakeBuildType::MinSizeRel,
        CMakeBuildType::RelWithDebInfo,
    ];

    /// Case-insensitive parse; anything unrecognised is `None`
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "debug" => CMakeBuildType::Debug,
            "release" => CMakeBuildType::Release,
            "relwithdebinfo" => CMakeBuildType::RelWithDebInfo,
            "minsizerel" => CMakeBuildType::MinSizeRel,
            _ => CMakeBuildType::None,
        }
    }

    /// Value written to `CMAKE_BUILD_TYPE`; `None` writes nothing
    pub fn cache_value(&self) -> Option<&'static str> {
        match self {
            CMakeBuildType::None => None,
            CMakeBuildType::Debug => Some("Debug"),
            CMakeBuildType::Release => Some("Release"),
            CMakeBuildType::RelWithDebInfo => Some("RelWithDebInfo"),
            CMakeBuildType::MinSizeRel => Some("MinSizeRel"),
        }
    }

    /// Human readable name
    pub fn type_name(&self) -> &'static str {
        match self {
            CMakeBuildType::None => "Build",
            CMakeBuildType::Debug => "Debug",
            CMakeBuildType::Release => "Release",
            CMakeBuildType::RelWithDebInfo => "Release with Debug Information",
            CMakeBuildType::MinSizeRel => "Minimum Size Release",
        }
    }

    pub fn build_type(&self) -> BuildType {
        match self {
            CMakeBuildType::Release | CMakeBuildType::MinSizeRel => BuildType::Release,
            CMakeBuildType::Debug => BuildType::Debug,
            CMakeBuildType::RelWithDebInfo => BuildType::Profile,
            CMakeBuildType::None => BuildType::Unknown,
        }
    }
}

/// Raw value of the first cache line starting with `key`.
///
/// `None` when the cache is missing or has no such line (or the line has no
/// `=`).
pub fn read_cache_value(build_dir: &Path, cache_file_name: &str, key: &str) -> Option<String> {
    let path = build_dir.join(cache_file_name);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no readable cache");
            return None;
        }
    };
    let contents = String::from_utf8_lossy(&bytes);
    let line = contents.lines().find(|line| line.starts_with(key))?;
    let (_, value) = line.split_once('=')?;
    Some(value.trim().to_string())
}

/// Build type recorded in `<build_dir>/<cache_file_name>`
pub fn infer_build_type(build_dir: &Path, cache_file_name: &str, key: &str) -> BuildType {
    read_cache_value(build_dir, cache_file_name, key)
        .map(|value| CMakeBuildType::from_name(&value).build_type())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildconf_model::BUILD_TYPE_KEY;

    fn infer(contents: &str) -> BuildType {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("CMakeCache.txt"), contents).unwrap();
        infer_build_type(dir.path(), "CMakeCache.txt", BUILD_TYPE_KEY)
    }

    #[test]
    fn test_known_types() {
        assert_eq!(infer("CMAKE_BUILD_TYPE:STRING=Debug\n"), BuildType::Debug);
        assert_eq!(infer("CMAKE_BUILD_TYPE:STRING=Release\n"), BuildType::Release);
        assert_eq!(infer("CMAKE_BUILD_TYPE:STRING=MinSizeRel\n"), BuildType::Release);
        assert_eq!(infer("CMAKE_BUILD_TYPE:STRING=RelWithDebInfo\n"), BuildType::Profile);
    }

    #[test]
    fn test_case_insensitive_and_trimmed() {
        assert_eq!(infer("# comment\nCMAKE_BUILD_TYPE:STRING=  rElEaSe \r\n"), BuildType::Release);
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            infer("CMAKE_BUILD_TYPE:STRING=Debug\nCMAKE_BUILD_TYPE:STRING=Release\n"),
            BuildType::Debug
        );
    }

    #[test]
    fn test_unknown_cases() {
        assert_eq!(infer("CMAKE_BUILD_TYPE:STRING=Coverage\n"), BuildType::Unknown);
        assert_eq!(infer("CMAKE_BUILD_TYPE:STRING=\n"), BuildType::Unknown);
        assert_eq!(infer("CMAKE_C_COMPILER:FILEPATH=/usr/bin/cc\n"), BuildType::Unknown);

        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            infer_build_type(dir.path(), "CMakeCache.txt", BUILD_TYPE_KEY),
            BuildType::Unknown
        );
    }

    #[test]
    fn test_cmake_build_type_names() {
        assert_eq!(CMakeBuildType::from_name("DEBUG"), CMakeBuildType::Debug);
        assert_eq!(CMakeBuildType::None.cache_value(), None);
        assert_eq!(CMakeBuildType::MinSizeRel.type_name(), "Minimum Size Release");
    }
}
