//! cmake-buildconf CLI
//!
//! Entry point for the `cmake-buildconf` command-line tool.

use clap::{Parser, Subcommand, ValueEnum};
use cmake_buildconf::build_dir::shadow_build_directory;
use cmake_buildconf::build_type::infer_build_type;
use cmake_buildconf::catalog::{deployment_data, FileManifestReader};
use cmake_buildconf::configuration::{dedup, load_persisted_configuration};
use cmake_buildconf::factory::available_builds;
use cmake_buildconf::kit::{load_kits, Kit};
use cmake_buildconf::persist::{
    PersistedMap, PersistedValue, CONFIGURATION_KEY, INITIAL_ARGUMENTS_KEY,
};
use cmake_buildconf::settings::{project_settings_path, user_settings_path};
use cmake_buildconf::telemetry::{self, LogFormat};
use cmake_buildconf::{BuildTarget, BuildType, EffectiveSettings, Settings};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "cmake-buildconf")]
#[command(about = "CMake build configuration tooling", version)]
struct Cli {
    /// Kit definitions (TOML file with [[kit]] tables)
    #[arg(long, global = true)]
    kits: Option<PathBuf>,

    /// Override the build directory template
    #[arg(long, global = true)]
    build_dir_template: Option<String>,

    /// Emit log events as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the shadow build directory for a project
    ShadowDir {
        /// Path to the top-level CMakeLists.txt
        project: PathBuf,

        /// Kit id (default: first kit)
        #[arg(long)]
        kit: Option<String>,

        /// Build configuration display name
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, value_enum, default_value = "unknown")]
        build_type: BuildTypeArg,
    },

    /// Infer the build type from a build directory's cache
    BuildType {
        build_dir: PathBuf,
    },

    /// List the build configurations offered for a kit
    Builds {
        /// Project file (with --setup) or source directory
        project: PathBuf,

        #[arg(long)]
        kit: Option<String>,

        /// Produce display names and build directories for setup
        #[arg(long)]
        setup: bool,
    },

    /// Migrate a persisted build configuration map to canonical form
    Migrate {
        /// JSON map with `configuration` and/or `initialArguments`
        map: PathBuf,

        /// Rewrite the file in place
        #[arg(long)]
        write: bool,
    },

    /// Compute deployment data for build targets
    Deploy {
        /// JSON list of build targets
        targets: PathBuf,

        #[arg(long)]
        source_dir: PathBuf,

        #[arg(long)]
        build_dir: PathBuf,
    },

    /// Show effective settings with their sources
    Settings {
        /// Project directory for project-level settings
        #[arg(long)]
        project_dir: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BuildTypeArg {
    Unknown,
    Debug,
    Profile,
    Release,
}

impl From<BuildTypeArg> for BuildType {
    fn from(arg: BuildTypeArg) -> Self {
        match arg {
            BuildTypeArg::Unknown => BuildType::Unknown,
            BuildTypeArg::Debug => BuildType::Debug,
            BuildTypeArg::Profile => BuildType::Profile,
            BuildTypeArg::Release => BuildType::Release,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let project_dir = match &cli.command {
        Commands::ShadowDir { project, .. } | Commands::Builds { project, .. } => {
            project.parent().map(Path::to_path_buf)
        }
        Commands::Settings { project_dir } => project_dir.clone(),
        Commands::Deploy { source_dir, .. } => Some(source_dir.clone()),
        _ => None,
    };
    let effective = load_settings(project_dir.as_deref(), cli.build_dir_template.as_deref());
    let settings = typed_settings(&effective);

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    telemetry::init(&settings.log.filter, format);

    match cli.command {
        Commands::ShadowDir {
            project,
            kit,
            name,
            build_type,
        } => {
            let kit = select_kit(cli.kits.as_deref(), kit.as_deref());
            match shadow_build_directory(
                &project,
                &kit,
                &name,
                build_type.into(),
                &settings.build_directory_template,
            ) {
                Some(dir) => println!("{}", dir.display()),
                None => {
                    eprintln!("Project path is empty.");
                    process::exit(1);
                }
            }
        }
        Commands::BuildType { build_dir } => {
            let build_type = infer_build_type(
                &build_dir,
                &settings.cache.file_name,
                &settings.cache.build_type_key,
            );
            println!("{}", build_type);
        }
        Commands::Builds {
            project,
            kit,
            setup,
        } => {
            let kit = select_kit(cli.kits.as_deref(), kit.as_deref());
            let builds =
                available_builds(&kit, &project, setup, &settings.build_directory_template);
            print_json(&builds);
        }
        Commands::Migrate { map, write } => run_migrate(&map, write),
        Commands::Deploy {
            targets,
            source_dir,
            build_dir,
        } => {
            let targets = read_targets(&targets);
            let set = deployment_data(
                &targets,
                &source_dir,
                &build_dir,
                &settings.deployment.file_name,
                &FileManifestReader,
            );
            print_json(&set);
        }
        Commands::Settings { .. } => match effective.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        },
    }
}

fn load_settings(project_dir: Option<&Path>, template: Option<&str>) -> EffectiveSettings {
    let user = user_settings_path();
    let project = project_dir.map(project_settings_path);
    let cli = template.map(|t| serde_json::json!({ "build_directory_template": t }));

    match EffectiveSettings::build(user.as_deref(), project.as_deref(), cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    }
}

fn typed_settings(effective: &EffectiveSettings) -> Settings {
    match effective.typed() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    }
}

fn select_kit(kits_path: Option<&Path>, id: Option<&str>) -> Kit {
    let Some(path) = kits_path else {
        return Kit::new("desktop", "Desktop");
    };
    let kits = match load_kits(path) {
        Ok(kits) => kits,
        Err(e) => {
            eprintln!("Error loading kits: {}", e);
            process::exit(1);
        }
    };

    let found = match id {
        Some(id) => kits.iter().find(|k| k.id == id),
        None => kits.first(),
    };
    match found {
        Some(kit) => kit.clone(),
        None => {
            eprintln!("Kit '{}' not found in {}.", id.unwrap_or("<first>"), path.display());
            let ids: Vec<_> = kits.iter().map(|k| k.id.as_str()).collect();
            eprintln!("Available kits: {}", ids.join(", "));
            process::exit(1);
        }
    }
}

fn read_targets(path: &Path) -> Vec<BuildTarget> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading {}: {}", path.display(), e);
            process::exit(1);
        }
    };
    match serde_json::from_str(&contents) {
        Ok(targets) => targets,
        Err(e) => {
            eprintln!("Error parsing build targets: {}", e);
            process::exit(1);
        }
    }
}

fn run_migrate(path: &Path, write: bool) {
    let map = match PersistedMap::from_file(path) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Error loading {}: {}", path.display(), e);
            process::exit(1);
        }
    };

    let configuration = load_persisted_configuration(
        &map.get_list(CONFIGURATION_KEY),
        map.get_str(INITIAL_ARGUMENTS_KEY).as_deref(),
    );
    let configuration = dedup(configuration);

    if write {
        let mut migrated = map.clone();
        migrated.remove(INITIAL_ARGUMENTS_KEY);
        migrated.insert(
            CONFIGURATION_KEY,
            PersistedValue::List(configuration.to_strings()),
        );
        if let Err(e) = migrated.write_to_file(path) {
            eprintln!("Error writing {}: {}", path.display(), e);
            process::exit(1);
        }
    }

    for line in configuration.to_strings() {
        println!("{}", line);
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}
