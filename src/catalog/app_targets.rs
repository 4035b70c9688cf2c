//! Runnable targets

use buildconf_model::{BuildTarget, TargetType};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A target the user can run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppTarget {
    pub display_name: String,
    pub target_file_path: PathBuf,
    /// Source directory with a trailing `/`
    pub project_file_path: String,
    pub working_directory: PathBuf,
    pub build_key: String,
}

impl From<&BuildTarget> for AppTarget {
    fn from(target: &BuildTarget) -> Self {
        let mut project_file_path = target.source_directory.to_string_lossy().to_string();
        project_file_path.push('/');
        Self {
            display_name: target.title.clone(),
            target_file_path: target.executable_path.clone(),
            project_file_path,
            working_directory: target.working_directory.clone(),
            build_key: target.title.clone(),
        }
    }
}

/// Executables always; shared libraries only when the kit deploys them
pub fn application_targets(
    targets: &[BuildTarget],
    supports_shared_library_deployment: bool,
) -> Vec<AppTarget> {
    targets
        .iter()
        .filter(|t| match t.target_type {
            TargetType::Executable => true,
            TargetType::DynamicLibrary => supports_shared_library_deployment,
            _ => false,
        })
        .map(AppTarget::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> Vec<BuildTarget> {
        vec![
            BuildTarget::new("app", TargetType::Executable)
                .with_executable("/b/bin/app")
                .with_source_directory("/s/app")
                .with_working_directory("/b/bin"),
            BuildTarget::new("core", TargetType::DynamicLibrary).with_executable("/b/libcore.so"),
            BuildTarget::new("all", TargetType::Utility),
            BuildTarget::new("util", TargetType::StaticLibrary),
        ]
    }

    #[test]
    fn test_desktop_only_executables() {
        let apps = application_targets(&targets(), false);
        assert_eq!(apps.len(), 1);
        let app = &apps[0];
        assert_eq!(app.display_name, "app");
        assert_eq!(app.build_key, "app");
        assert_eq!(app.target_file_path, PathBuf::from("/b/bin/app"));
        assert_eq!(app.project_file_path, "/s/app/");
        assert_eq!(app.working_directory, PathBuf::from("/b/bin"));
    }

    #[test]
    fn test_shared_libraries_when_deployable() {
        let apps = application_targets(&targets(), true);
        let names: Vec<_> = apps.iter().map(|a| a.display_name.as_str()).collect();
        assert_eq!(names, vec!["app", "core"]);
    }
}
