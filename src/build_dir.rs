//! Shadow build directory

use std::path::{Path, PathBuf};

use crate::build_type::BuildType;
use crate::kit::Kit;
use crate::macros::MacroExpander;
use crate::paths::normalize_path;

/// Macro table for build directory templates
pub fn build_directory_expander(
    project_file: &Path,
    kit: &Kit,
    display_name: &str,
    build_type: BuildType,
) -> MacroExpander {
    let project_name = project_file
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut expander = MacroExpander::new()
        .with("Project:Name", project_name)
        .with("BuildConfig:Name", display_name)
        .with("BuildConfig:Type", build_type.as_str());
    expander.extend(&kit.expander());
    expander
}

/// Default build directory for a configuration.
///
/// The template is expanded, spaces become `-`, and the result is resolved
/// against the project directory. `None` for an empty project path.
pub fn shadow_build_directory(
    project_file: &Path,
    kit: &Kit,
    display_name: &str,
    build_type: BuildType,
    template: &str,
) -> Option<PathBuf> {
    if project_file.as_os_str().is_empty() {
        return None;
    }

    let expander = build_directory_expander(project_file, kit, display_name, build_type);
    let build_path = expander.expand(template).replace(' ', "-");
    let project_dir = project_file.parent().unwrap_or(Path::new(""));

    Some(normalize_path(&project_dir.join(build_path)))
}
