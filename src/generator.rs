//! Generator collaborator interface
//!
//! The generator (the "directory manager") owns running the build system
//! generator and reading its output. This core only tells it what to do and
//! takes copies of its results:
//! - `Generator`: commands issued by the build configuration
//! - `GeneratorEvent`: asynchronous notifications delivered back to the owner

use buildconf_model::{BuildTarget, Configuration};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::scheduler::ReparseMode;

/// Everything the generator needs for one build directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDirParameters {
    pub source_directory: PathBuf,
    pub build_directory: PathBuf,
    /// Kit-merged configuration for the generator
    pub configuration: Configuration,
    pub environment: BTreeMap<String, String>,
    pub kit_id: String,
}

/// A value taken from a generation result plus an extraction error, if any.
///
/// The value is usable even when `error` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction<T> {
    pub value: T,
    pub error: Option<String>,
}

impl<T> Extraction<T> {
    pub fn ok(value: T) -> Self {
        Self { value, error: None }
    }

    pub fn with_error(value: T, error: impl Into<String>) -> Self {
        Self {
            value,
            error: Some(error.into()),
        }
    }
}

/// Notifications from the generator, handled on the owner thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum GeneratorEvent {
    ParsingStarted,
    DataAvailable,
    ErrorOccurred(String),
    /// The generator noticed a change and wants a new run
    RequestReparse(ReparseMode),
}

/// Commands understood by the generator collaborator
pub trait Generator {
    /// Whether serving `params` needs a new reader session
    fn requires_new_reader(&self, params: &BuildDirParameters) -> bool;

    /// Start or restart a generation with a resolved mode
    fn request_parse(&mut self, params: &BuildDirParameters, mode: ReparseMode);

    /// Abandon current and pending work and drop session state
    fn stop_and_clear_state(&mut self);

    fn take_build_targets(&mut self) -> Extraction<Vec<BuildTarget>>;

    fn take_configuration(&mut self) -> Extraction<Configuration>;

    /// Release per-generation caches after ingestion
    fn reset_data(&mut self);
}
