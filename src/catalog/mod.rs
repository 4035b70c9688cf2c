//! Build target catalog
//!
//! Projects the generator's build targets into what the rest of the IDE
//! consumes:
//! - application (runnable) targets
//! - deployment data, from an optional manifest plus deployable targets

mod app_targets;
mod deployment;
mod manifest;

pub use app_targets::{application_targets, AppTarget};
pub use deployment::{deployment_data, DeployableFile, DeployableFileType, DeploymentSet};
pub use manifest::{DeploymentManifest, FileManifestReader, ManifestError, ManifestReader};
