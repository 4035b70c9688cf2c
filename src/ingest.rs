//! Generation result ingestion
//!
//! Turns a finished generation into state updates and owner events. Both
//! paths first make sure the configuration is still active; a result for an
//! inactive configuration is dropped and the generator told to stop.

use std::path::Path;

use crate::catalog::{application_targets, deployment_data, ManifestReader};
use crate::events::{from_signals, BuildConfigEvent};
use crate::generator::Generator;
use crate::kit::Kit;
use crate::state::ConfigurationState;
use crate::status::ForceEnabledChanged;

/// What happened to a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Applied(Vec<BuildConfigEvent>),
    /// The configuration is no longer active
    Discarded,
}

/// Everything needed to project targets into owner-facing data
pub struct ResultIngester<'a> {
    pub kit: &'a Kit,
    pub source_directory: &'a Path,
    pub build_directory: &'a Path,
    pub deployment_file_name: &'a str,
    pub manifest_reader: &'a dyn ManifestReader,
}

impl ResultIngester<'_> {
    /// Ingest a successful generation
    pub fn ingest_success(
        &self,
        state: &mut ConfigurationState,
        generator: &mut dyn Generator,
    ) -> IngestOutcome {
        if !state.active {
            return discard(generator);
        }

        let mut events: Vec<BuildConfigEvent> =
            from_signals(state.status.clear_error(ForceEnabledChanged::No)).collect();

        let targets = generator.take_build_targets();
        if let Some(error) = targets.error {
            tracing::warn!(%error, "build target extraction failed");
            events.extend(from_signals(state.status.set_error(error)));
        }
        state.build_targets = targets.value;

        let configuration = generator.take_configuration();
        if let Some(error) = configuration.error {
            tracing::warn!(%error, "configuration extraction failed");
            events.extend(from_signals(state.status.set_error(error)));
        }
        state.configuration_from_backend = configuration.value;

        events.push(BuildConfigEvent::ApplicationTargetsChanged(
            application_targets(
                &state.build_targets,
                self.kit.supports_shared_library_deployment(),
            ),
        ));
        events.push(BuildConfigEvent::DeploymentDataChanged(deployment_data(
            &state.build_targets,
            self.source_directory,
            self.build_directory,
            self.deployment_file_name,
            self.manifest_reader,
        )));
        events.push(BuildConfigEvent::ParsingSucceeded);

        generator.reset_data();
        events.push(BuildConfigEvent::BuildTypeChanged);

        tracing::info!(targets = state.build_targets.len(), "generation ingested");
        IngestOutcome::Applied(events)
    }

    /// Ingest a failed generation
    pub fn ingest_error(
        &self,
        state: &mut ConfigurationState,
        generator: &mut dyn Generator,
        message: &str,
    ) -> IngestOutcome {
        if !state.active {
            return discard(generator);
        }

        tracing::warn!(error = %message, "generation failed");
        let mut events: Vec<BuildConfigEvent> =
            from_signals(state.status.set_error(message)).collect();

        // the generation error is already recorded
        state.configuration_from_backend = generator.take_configuration().value;

        events.push(BuildConfigEvent::ParsingFailed);
        IngestOutcome::Applied(events)
    }
}

fn discard(generator: &mut dyn Generator) -> IngestOutcome {
    tracing::debug!("dropping result for inactive build configuration");
    generator.stop_and_clear_state();
    IngestOutcome::Discarded
}
