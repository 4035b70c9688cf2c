//! Deployment data

use buildconf_model::BuildTarget;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::manifest::{DeploymentManifest, ManifestReader};
use crate::paths::{normalize_path, relative_path};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployableFileType {
    #[default]
    Normal,
    Executable,
}

/// One local file and the remote directory it goes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployableFile {
    pub local_path: PathBuf,
    pub remote_directory: String,
    #[serde(rename = "type")]
    pub file_type: DeployableFileType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSet {
    files: Vec<DeployableFile>,
}

impl DeploymentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(
        &mut self,
        local_path: impl Into<PathBuf>,
        remote_directory: impl Into<String>,
        file_type: DeployableFileType,
    ) {
        self.files.push(DeployableFile {
            local_path: local_path.into(),
            remote_directory: remote_directory.into(),
            file_type,
        });
    }

    /// Entry deploying `local`, if any
    pub fn deployable_for_local_file(&self, local: &Path) -> Option<&DeployableFile> {
        let local = normalize_path(local);
        self.files
            .iter()
            .find(|f| normalize_path(&f.local_path) == local)
    }

    pub fn files(&self) -> &[DeployableFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Collect deployment data for `targets`.
///
/// Without a manifest named `file_name` in the source or build directory the
/// set is empty. Otherwise the manifest's files come first, followed by every
/// executable or shared library not already listed.
pub fn deployment_data(
    targets: &[BuildTarget],
    source_dir: &Path,
    build_dir: &Path,
    file_name: &str,
    reader: &dyn ManifestReader,
) -> DeploymentSet {
    let mut result = DeploymentSet::new();

    let Some(manifest_path) = [source_dir.join(file_name), build_dir.join(file_name)]
        .into_iter()
        .find(|p| p.exists())
    else {
        return result;
    };

    let manifest = match reader.read(&manifest_path, source_dir) {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable deployment manifest");
            DeploymentManifest::default()
        }
    };
    for file in manifest.files {
        result.add_file(file.local_path, file.remote_directory, file.file_type);
    }

    for target in targets {
        if !target.target_type.is_deployable() {
            continue;
        }
        let executable = &target.executable_path;
        if executable.as_os_str().is_empty() || result.deployable_for_local_file(executable).is_some()
        {
            continue;
        }
        let directory = executable.parent().unwrap_or(build_dir);
        let remote = format!("{}{}", manifest.prefix, relative_path(build_dir, directory));
        result.add_file(executable.clone(), remote, DeployableFileType::Executable);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::manifest::ManifestError;
    use buildconf_model::TargetType;

    struct StaticReader(DeploymentManifest);

    impl ManifestReader for StaticReader {
        fn read(&self, _: &Path, _: &Path) -> Result<DeploymentManifest, ManifestError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_set_lookup_normalises() {
        let mut set = DeploymentSet::new();
        set.add_file("/b/./bin/app", "/opt/bin", DeployableFileType::Executable);
        assert!(set.deployable_for_local_file(Path::new("/b/bin/app")).is_some());
        assert!(set.deployable_for_local_file(Path::new("/b/bin/other")).is_none());
    }

    #[test]
    fn test_no_manifest_means_empty() {
        let dir = tempfile::tempdir().unwrap();
        let targets = vec![BuildTarget::new("app", TargetType::Executable).with_executable("/b/app")];
        let reader = StaticReader(DeploymentManifest::default());
        let set = deployment_data(&targets, dir.path(), dir.path(), "QtCreatorDeployment.txt", &reader);
        assert!(set.is_empty());
    }

    #[test]
    fn test_targets_appended_after_manifest() {
        let source = tempfile::tempdir().unwrap();
        let build = tempfile::tempdir().unwrap();
        std::fs::write(build.path().join("deploy.txt"), "").unwrap();

        let listed = build.path().join("bin/tool");
        let manifest = DeploymentManifest {
            prefix: "/opt/".to_string(),
            files: vec![DeployableFile {
                local_path: listed.clone(),
                remote_directory: "/opt/custom".to_string(),
                file_type: DeployableFileType::Normal,
            }],
        };
        let targets = vec![
            BuildTarget::new("tool", TargetType::Executable).with_executable(&listed),
            BuildTarget::new("app", TargetType::Executable)
                .with_executable(build.path().join("bin/app")),
            BuildTarget::new("core", TargetType::DynamicLibrary)
                .with_executable(build.path().join("libcore.so")),
            BuildTarget::new("static", TargetType::StaticLibrary)
                .with_executable(build.path().join("libstatic.a")),
            BuildTarget::new("empty", TargetType::Executable),
        ];

        let set = deployment_data(
            &targets,
            source.path(),
            build.path(),
            "deploy.txt",
            &StaticReader(manifest),
        );

        let remotes: Vec<_> = set.files().iter().map(|f| f.remote_directory.as_str()).collect();
        assert_eq!(remotes, vec!["/opt/custom", "/opt/bin", "/opt/"]);
        assert_eq!(set.files()[1].file_type, DeployableFileType::Executable);
    }
}
