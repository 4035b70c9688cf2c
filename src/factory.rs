//! Build-info factory
//!
//! Enumerates the build configurations offered when a project is opened with
//! a kit: one per CMake build type, each with its `CMAKE_BUILD_TYPE` and the
//! kit's sysroot/compiler-target items.

use buildconf_model::{ConfigItem, Configuration, BUILD_TYPE_KEY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::build_dir::shadow_build_directory;
use crate::build_type::{BuildType, CMakeBuildType};
use crate::kit::Kit;

/// Description of a build configuration to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub kit_id: String,
    pub type_name: String,
    /// Empty unless produced for setup
    pub display_name: String,
    pub build_type: BuildType,
    pub cmake_build_type: CMakeBuildType,
    /// `None` means "use the shadow build directory"
    pub build_directory: Option<PathBuf>,
    pub source_directory: PathBuf,
    /// Extra configuration applied on initialisation
    pub configuration: Configuration,
}

/// Build info for one CMake build type
pub fn create_build_info(kit: &Kit, source_dir: &Path, cmake_build_type: CMakeBuildType) -> BuildInfo {
    let mut configuration = Configuration::new();
    if let Some(value) = cmake_build_type.cache_value() {
        configuration.push(ConfigItem::new(BUILD_TYPE_KEY, value));
    }

    if let Some(sysroot) = kit.sysroot.as_deref().filter(|s| !s.is_empty()) {
        configuration.push(ConfigItem::new("CMAKE_SYSROOT", sysroot));
        if let Some(ref triple) = kit.target_triple {
            configuration.push(ConfigItem::new("CMAKE_C_COMPILER_TARGET", triple.as_str()));
            configuration.push(ConfigItem::new("CMAKE_CXX_COMPILER_TARGET", triple.as_str()));
        }
    }

    BuildInfo {
        kit_id: kit.id.clone(),
        type_name: cmake_build_type.type_name().to_string(),
        display_name: String::new(),
        build_type: cmake_build_type.build_type(),
        cmake_build_type,
        build_directory: None,
        source_directory: source_dir.to_path_buf(),
        configuration,
    }
}

/// All build infos for `kit`.
///
/// For setup `project_path` is the project file: the source directory is its
/// parent, the display name is the type name and the build directory is the
/// shadow build directory. Otherwise `project_path` is the source directory.
pub fn available_builds(
    kit: &Kit,
    project_path: &Path,
    for_setup: bool,
    template: &str,
) -> Vec<BuildInfo> {
    let source_dir = if for_setup {
        project_path.parent().unwrap_or(project_path)
    } else {
        project_path
    };

    CMakeBuildType::ALL
        .iter()
        .map(|&cmake_build_type| {
            let mut info = create_build_info(kit, source_dir, cmake_build_type);
            if for_setup {
                info.display_name = info.type_name.clone();
                info.build_directory = shadow_build_directory(
                    project_path,
                    kit,
                    &info.display_name,
                    info.build_type,
                    template,
                );
            }
            info
        })
        .collect()
}
