//! Build configuration aggregate
//!
//! Owns the configuration state of one CMake build configuration, drives
//! the reparse scheduler from change triggers, and ingests generator events.
//! All mutation happens through `&mut self` on the owner thread; owner
//! notifications are queued and collected with [`BuildConfiguration::drain_events`].

use buildconf_model::{BuildTarget, Configuration};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::build_dir::shadow_build_directory;
use crate::build_type::{infer_build_type, BuildType};
use crate::catalog::{
    application_targets, deployment_data, AppTarget, DeploymentSet, FileManifestReader,
    ManifestReader,
};
use crate::configuration::{load_persisted_configuration, merge_layers, DataItem};
use crate::events::{from_signals, BuildConfigEvent};
use crate::factory::BuildInfo;
use crate::generator::{BuildDirParameters, Generator, GeneratorEvent};
use crate::ingest::{IngestOutcome, ResultIngester};
use crate::kit::Kit;
use crate::persist::{PersistedMap, PersistedValue, CONFIGURATION_KEY, INITIAL_ARGUMENTS_KEY};
use crate::scheduler::{ReparseMode, ReparseScheduler, RequestOutcome, SchedulerError, Trigger};
use crate::settings::Settings;
use crate::state::{ConfigurationState, ParseState};
use crate::status::ForceEnabledChanged;

pub struct BuildConfiguration<G: Generator> {
    /// Path of the top-level `CMakeLists.txt`
    project_file: PathBuf,
    display_name: String,
    build_directory: PathBuf,
    kit: Kit,
    environment: BTreeMap<String, String>,
    settings: Settings,
    state: ConfigurationState,
    scheduler: ReparseScheduler,
    generator: G,
    manifest_reader: Box<dyn ManifestReader>,
    events: Vec<BuildConfigEvent>,
}

impl<G: Generator> BuildConfiguration<G> {
    /// Create an inactive configuration seeded from `kit`.
    ///
    /// The build directory starts as the shadow build directory.
    pub fn new(project_file: impl Into<PathBuf>, kit: Kit, settings: Settings, generator: G) -> Self {
        let project_file = project_file.into();
        let build_directory = shadow_build_directory(
            &project_file,
            &kit,
            "",
            BuildType::Unknown,
            &settings.build_directory_template,
        )
        .unwrap_or_default();

        Self {
            state: ConfigurationState::new(kit.initial_configuration()),
            project_file,
            display_name: String::new(),
            build_directory,
            kit,
            environment: BTreeMap::new(),
            settings,
            scheduler: ReparseScheduler::new(),
            generator,
            manifest_reader: Box::new(FileManifestReader),
            events: Vec::new(),
        }
    }

    /// Replace the deployment manifest reader
    pub fn with_manifest_reader(mut self, reader: impl ManifestReader + 'static) -> Self {
        self.manifest_reader = Box::new(reader);
        self
    }

    /// Apply a build info from the factory
    pub fn initialize(&mut self, info: &BuildInfo) {
        self.display_name = info.display_name.clone();
        let build_directory = match info.build_directory {
            Some(ref dir) => Some(dir.clone()),
            None => shadow_build_directory(
                &self.project_file,
                &self.kit,
                &self.display_name,
                info.build_type,
                &self.settings.build_directory_template,
            ),
        };
        if let Some(dir) = build_directory {
            self.set_build_directory(dir);
        }
        self.set_configuration(info.configuration.clone());
    }

    // --- accessors ---

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = name.into();
    }

    pub fn project_file(&self) -> &Path {
        &self.project_file
    }

    pub fn project_directory(&self) -> PathBuf {
        self.project_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    pub fn build_directory(&self) -> &Path {
        &self.build_directory
    }

    pub fn kit(&self) -> &Kit {
        &self.kit
    }

    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &ConfigurationState {
        &self.state
    }

    pub fn parse_state(&self) -> ParseState {
        self.scheduler.state()
    }

    pub fn scheduler(&self) -> &ReparseScheduler {
        &self.scheduler
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn generator_mut(&mut self) -> &mut G {
        &mut self.generator
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Take all queued owner notifications
    pub fn drain_events(&mut self) -> Vec<BuildConfigEvent> {
        std::mem::take(&mut self.events)
    }

    // --- triggers ---

    /// A kit changed; only this configuration's kit triggers a reparse
    pub fn kit_updated(&mut self, kit: &Kit) -> Option<RequestOutcome> {
        if kit.id != self.kit.id {
            return None;
        }
        self.kit = kit.clone();
        self.request(Trigger::KitUpdated)
    }

    /// Activate or deactivate; deactivation cancels any generation
    pub fn set_active(&mut self, active: bool) -> Option<RequestOutcome> {
        if active == self.state.active {
            return None;
        }
        self.state.active = active;
        if active {
            self.request(Trigger::BecameActive)
        } else {
            self.scheduler.cancel(&mut self.generator);
            None
        }
    }

    pub fn set_environment(&mut self, environment: BTreeMap<String, String>) -> Option<RequestOutcome> {
        if environment == self.environment {
            return None;
        }
        self.environment = environment;
        self.request(Trigger::EnvironmentChanged)
    }

    pub fn set_build_directory(&mut self, directory: impl Into<PathBuf>) -> Option<RequestOutcome> {
        let directory = directory.into();
        if directory == self.build_directory {
            return None;
        }
        tracing::debug!(build_directory = %directory.display(), "build directory changed");
        self.build_directory = directory;
        self.events.push(BuildConfigEvent::BuildDirectoryChanged);
        self.request(Trigger::BuildDirectoryChanged)
    }

    /// Merge configuration items into the instance configuration
    pub fn set_configuration(&mut self, items: Configuration) -> Option<RequestOutcome> {
        let events = self.state.set_configuration_for_backend(items, &self.kit);
        self.events.extend(events);
        self.request(Trigger::ConfigurationChanged)
    }

    /// Merge edited items coming from the configuration editor
    pub fn set_configuration_for_backend(&mut self, items: Vec<DataItem>) -> Option<RequestOutcome> {
        self.set_configuration(DataItem::into_configuration(items))
    }

    /// Owner-initiated reparse with an explicit mode
    pub fn request_reparse(&mut self, mode: ReparseMode) -> Option<RequestOutcome> {
        if !self.state.active {
            return None;
        }
        let params = self.parameters();
        match self.scheduler.schedule(mode, &params, &mut self.generator) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!(error = %e, "reparse request rejected");
                None
            }
        }
    }

    fn request(&mut self, trigger: Trigger) -> Option<RequestOutcome> {
        if !self.state.active {
            tracing::debug!(%trigger, "ignoring trigger for inactive build configuration");
            return None;
        }

        let params = self.parameters();
        match self.scheduler.request(trigger, &params, &mut self.generator) {
            Ok(outcome) => Some(outcome),
            Err(e @ SchedulerError::ReaderChangeForbidden { .. }) => {
                let signals = self.state.status.set_error(e.to_string());
                self.events.extend(from_signals(signals));
                None
            }
            Err(e) => {
                tracing::warn!(%trigger, error = %e, "reparse request rejected");
                None
            }
        }
    }

    /// Parameters for the generator
    pub fn parameters(&self) -> BuildDirParameters {
        BuildDirParameters {
            source_directory: self.project_directory(),
            build_directory: self.build_directory.clone(),
            configuration: self.configuration_for_backend(),
            environment: self.environment.clone(),
            kit_id: self.kit.id.clone(),
        }
    }

    // --- generator events ---

    pub fn handle_generator_event(&mut self, event: GeneratorEvent) {
        match event {
            GeneratorEvent::RequestReparse(mode) => {
                if self.state.active {
                    self.events.push(BuildConfigEvent::ReparseRequested(mode));
                }
            }
            GeneratorEvent::ParsingStarted => {
                if !self.state.active {
                    self.generator.stop_and_clear_state();
                    return;
                }
                if let Err(e) = self.scheduler.parsing_started() {
                    tracing::warn!(error = %e, "unexpected parsing start");
                }
                let signals = self.state.status.clear_error(ForceEnabledChanged::Yes);
                self.events.extend(from_signals(signals));
            }
            GeneratorEvent::DataAvailable => {
                if self.state.active {
                    if let Err(e) = self.scheduler.data_available() {
                        tracing::warn!(error = %e, "dropping unexpected result");
                        return;
                    }
                }
                let source_directory = self.project_directory();
                let ingester = ResultIngester {
                    kit: &self.kit,
                    source_directory: &source_directory,
                    build_directory: &self.build_directory,
                    deployment_file_name: &self.settings.deployment.file_name,
                    manifest_reader: self.manifest_reader.as_ref(),
                };
                let outcome = ingester.ingest_success(&mut self.state, &mut self.generator);
                self.push_outcome(outcome);
                self.report_deferred_rejection();
            }
            GeneratorEvent::ErrorOccurred(message) => {
                if self.state.active {
                    if let Err(e) = self.scheduler.error_occurred() {
                        tracing::warn!(error = %e, "dropping unexpected error result");
                        return;
                    }
                }
                let source_directory = self.project_directory();
                let ingester = ResultIngester {
                    kit: &self.kit,
                    source_directory: &source_directory,
                    build_directory: &self.build_directory,
                    deployment_file_name: &self.settings.deployment.file_name,
                    manifest_reader: self.manifest_reader.as_ref(),
                };
                let outcome = ingester.ingest_error(&mut self.state, &mut self.generator, &message);
                self.push_outcome(outcome);
                self.report_deferred_rejection();
            }
        }
    }

    fn push_outcome(&mut self, outcome: IngestOutcome) {
        if let IngestOutcome::Applied(events) = outcome {
            self.events.extend(events);
        }
    }

    /// A reader change rejected mid-run never reached the generator
    fn report_deferred_rejection(&mut self) {
        if !self.state.active {
            return;
        }
        match self.scheduler.take_deferred_rejection() {
            Ok(Some(rejection)) => {
                let signals = self.state.status.set_error(rejection.to_string());
                self.events.extend(from_signals(signals));
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "could not fail finished generation"),
        }
    }

    // --- queries ---

    /// Configuration as seen by the generator: kit defaults overlaid by the
    /// instance configuration
    pub fn configuration_for_backend(&self) -> Configuration {
        merge_layers(&self.kit.configuration(), &self.state.configuration_for_backend)
    }

    /// Instance-level configuration only
    pub fn instance_configuration(&self) -> &Configuration {
        &self.state.configuration_for_backend
    }

    pub fn configuration_from_backend(&self) -> &Configuration {
        &self.state.configuration_from_backend
    }

    pub fn initial_configuration(&self) -> &Configuration {
        &self.state.initial_configuration
    }

    pub fn build_targets(&self) -> &[BuildTarget] {
        &self.state.build_targets
    }

    pub fn build_target_titles(&self) -> Vec<String> {
        self.state
            .build_targets
            .iter()
            .map(|t| t.title.clone())
            .collect()
    }

    pub fn application_targets(&self) -> Vec<AppTarget> {
        application_targets(
            &self.state.build_targets,
            self.kit.supports_shared_library_deployment(),
        )
    }

    pub fn deployment_data(&self) -> DeploymentSet {
        deployment_data(
            &self.state.build_targets,
            &self.project_directory(),
            &self.build_directory,
            &self.settings.deployment.file_name,
            self.manifest_reader.as_ref(),
        )
    }

    pub fn is_parsing(&self) -> bool {
        self.state.active && self.scheduler.is_busy()
    }

    pub fn is_enabled(&self) -> bool {
        self.state.status.is_enabled(self.is_parsing())
    }

    pub fn disabled_reason(&self) -> &str {
        self.state.status.disabled_reason()
    }

    pub fn error(&self) -> &str {
        self.state.status.error()
    }

    pub fn warning(&self) -> &str {
        self.state.status.warning()
    }

    /// Build type recorded in the build directory's cache
    pub fn build_type(&self) -> BuildType {
        infer_build_type(
            &self.build_directory,
            &self.settings.cache.file_name,
            &self.settings.cache.build_type_key,
        )
    }

    // --- persistence ---

    pub fn to_map(&self) -> PersistedMap {
        let mut map = PersistedMap::new();
        map.insert(
            CONFIGURATION_KEY,
            PersistedValue::List(self.state.configuration_for_backend.to_strings()),
        );
        map
    }

    /// Restore the configuration, migrating legacy arguments
    pub fn from_map(&mut self, map: &PersistedMap) {
        let canonical = map.get_list(CONFIGURATION_KEY);
        let legacy = map.get_str(INITIAL_ARGUMENTS_KEY);
        let configuration = load_persisted_configuration(&canonical, legacy.as_deref());
        self.set_configuration(configuration);
    }
}
