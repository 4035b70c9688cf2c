//! Build targets reported by the generator.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of artifact a target produces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Executable,
    DynamicLibrary,
    StaticLibrary,
    Utility,
    Object,
    #[default]
    Unknown,
}

impl TargetType {
    /// Executables and shared libraries are the only deployable kinds
    pub fn is_deployable(&self) -> bool {
        matches!(self, TargetType::Executable | TargetType::DynamicLibrary)
    }
}

/// A target from one generation run. Titles are unique within a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTarget {
    pub title: String,

    #[serde(default)]
    pub target_type: TargetType,

    /// Output artifact path (empty when the generator does not know it)
    #[serde(default)]
    pub executable_path: PathBuf,

    #[serde(default)]
    pub source_directory: PathBuf,

    #[serde(default)]
    pub working_directory: PathBuf,
}

impl BuildTarget {
    pub fn new(title: impl Into<String>, target_type: TargetType) -> Self {
        Self {
            title: title.into(),
            target_type,
            ..Default::default()
        }
    }

    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable_path = path.into();
        self
    }

    pub fn with_source_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_directory = path.into();
        self
    }

    pub fn with_working_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_directory = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployable_kinds() {
        assert!(TargetType::Executable.is_deployable());
        assert!(TargetType::DynamicLibrary.is_deployable());
        assert!(!TargetType::StaticLibrary.is_deployable());
        assert!(!TargetType::Utility.is_deployable());
    }

    #[test]
    fn test_deserialize_defaults() {
        let target: BuildTarget = serde_json::from_str(r#"{"title": "app"}"#).unwrap();
        assert_eq!(target.title, "app");
        assert_eq!(target.target_type, TargetType::Unknown);
        assert!(target.executable_path.as_os_str().is_empty());
    }
}
