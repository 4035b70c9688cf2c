//! Recording generator

use buildconf_model::{BuildTarget, Configuration};

use super::failure::{ExtractionFailures, FailurePoint};
use crate::generator::{BuildDirParameters, Extraction, Generator};
use crate::scheduler::ReparseMode;

/// A command received by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorCall {
    RequestParse {
        params: BuildDirParameters,
        mode: ReparseMode,
    },
    StopAndClearState,
    TakeBuildTargets,
    TakeConfiguration,
    ResetData,
}

/// Generator that records calls and returns canned results
#[derive(Debug, Default)]
pub struct MockGenerator {
    requires_new_reader: bool,
    targets: Vec<BuildTarget>,
    configuration: Configuration,
    failures: ExtractionFailures,
    calls: Vec<GeneratorCall>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_requires_new_reader(&mut self, value: bool) {
        self.requires_new_reader = value;
    }

    pub fn set_build_targets(&mut self, targets: Vec<BuildTarget>) {
        self.targets = targets;
    }

    pub fn set_configuration(&mut self, configuration: Configuration) {
        self.configuration = configuration;
    }

    pub fn failures_mut(&mut self) -> &mut ExtractionFailures {
        &mut self.failures
    }

    pub fn calls(&self) -> &[GeneratorCall] {
        &self.calls
    }

    /// Modes of every `request_parse` call, in order
    pub fn requested_modes(&self) -> Vec<ReparseMode> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                GeneratorCall::RequestParse { mode, .. } => Some(*mode),
                _ => None,
            })
            .collect()
    }

    /// Parameters of the most recent `request_parse`
    pub fn last_params(&self) -> Option<&BuildDirParameters> {
        self.calls.iter().rev().find_map(|call| match call {
            GeneratorCall::RequestParse { params, .. } => Some(params),
            _ => None,
        })
    }

    pub fn stop_count(&self) -> usize {
        self.count(|c| matches!(c, GeneratorCall::StopAndClearState))
    }

    pub fn reset_count(&self) -> usize {
        self.count(|c| matches!(c, GeneratorCall::ResetData))
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn count(&self, pred: impl Fn(&GeneratorCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl Generator for MockGenerator {
    fn requires_new_reader(&self, _params: &BuildDirParameters) -> bool {
        self.requires_new_reader
    }

    fn request_parse(&mut self, params: &BuildDirParameters, mode: ReparseMode) {
        self.calls.push(GeneratorCall::RequestParse {
            params: params.clone(),
            mode,
        });
    }

    fn stop_and_clear_state(&mut self) {
        self.calls.push(GeneratorCall::StopAndClearState);
    }

    fn take_build_targets(&mut self) -> Extraction<Vec<BuildTarget>> {
        self.calls.push(GeneratorCall::TakeBuildTargets);
        let value = self.targets.clone();
        match self.failures.check(FailurePoint::BuildTargets) {
            Some(message) => Extraction::with_error(value, message),
            None => Extraction::ok(value),
        }
    }

    fn take_configuration(&mut self) -> Extraction<Configuration> {
        self.calls.push(GeneratorCall::TakeConfiguration);
        let value = self.configuration.clone();
        match self.failures.check(FailurePoint::Configuration) {
            Some(message) => Extraction::with_error(value, message),
            None => Extraction::ok(value),
        }
    }

    fn reset_data(&mut self) {
        self.calls.push(GeneratorCall::ResetData);
    }
}
