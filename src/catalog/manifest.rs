//! Deployment manifest reading
//!
//! Format: the first line is the remote prefix, every following
//! `source:target` line names one file. Lines without `:` are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use super::deployment::{DeployableFile, DeployableFileType};

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read deployment manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parsed manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentManifest {
    /// Remote prefix, always ending in `/`
    pub prefix: String,
    pub files: Vec<DeployableFile>,
}

impl DeploymentManifest {
    /// Parse manifest text; relative sources are anchored at `source_dir`
    pub fn parse(contents: &str, source_dir: &Path) -> Self {
        let mut lines = contents.lines();
        let mut prefix = lines.next().unwrap_or_default().trim_end_matches('\r').to_string();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }

        let files = lines
            .map(|line| line.trim_end_matches('\r'))
            .filter_map(|line| line.split_once(':'))
            .map(|(source, target)| {
                // only the first two fields count
                let target = target.split(':').next().unwrap_or_default();
                let local = Path::new(source);
                let local_path = if local.is_relative() {
                    source_dir.join(local)
                } else {
                    local.to_path_buf()
                };
                let remote_directory = if Path::new(target).is_relative() {
                    format!("{}{}", prefix, target)
                } else {
                    target.to_string()
                };
                DeployableFile {
                    local_path,
                    remote_directory,
                    file_type: DeployableFileType::Normal,
                }
            })
            .collect();

        Self { prefix, files }
    }
}

/// Source of deployment manifests
pub trait ManifestReader {
    fn read(&self, manifest: &Path, source_dir: &Path) -> Result<DeploymentManifest, ManifestError>;
}

/// Reads manifests from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FileManifestReader;

impl ManifestReader for FileManifestReader {
    fn read(&self, manifest: &Path, source_dir: &Path) -> Result<DeploymentManifest, ManifestError> {
        let contents = fs::read_to_string(manifest).map_err(|source| ManifestError::Io {
            path: manifest.to_path_buf(),
            source,
        })?;
        Ok(DeploymentManifest::parse(&contents, source_dir))
    }
}
