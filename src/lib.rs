//! CMake build configuration core
//!
//! Reconciles a project's desired CMake configuration with what an external
//! generator backend reports: when to re-run the generator, how kit and
//! instance configuration layers merge, and how generation results are
//! ingested into a queryable model.

pub mod build_config;
pub mod build_dir;
pub mod build_type;
pub mod catalog;
pub mod configuration;
pub mod events;
pub mod factory;
pub mod generator;
pub mod ingest;
pub mod kit;
pub mod macros;
pub mod mock;
pub mod paths;
pub mod persist;
pub mod scheduler;
pub mod settings;
pub mod state;
pub mod status;
pub mod telemetry;

pub use build_config::BuildConfiguration;
pub use build_type::{BuildType, CMakeBuildType};
pub use buildconf_model::{BuildTarget, ConfigItem, Configuration, ItemType, TargetType};
pub use events::BuildConfigEvent;
pub use generator::{BuildDirParameters, Extraction, Generator, GeneratorEvent};
pub use kit::Kit;
pub use scheduler::{ReparseMode, ReparseScheduler, RequestOutcome, SchedulerError, Trigger};
pub use settings::{EffectiveSettings, Settings, SettingsError};
