//! Notifications published to the owning project
//!
//! A build configuration never calls back into its owner. Everything the
//! owner needs to react to is queued here and drained by the owner loop.

use serde::{Deserialize, Serialize};

use crate::catalog::{AppTarget, DeploymentSet};
use crate::scheduler::ReparseMode;
use crate::status::StatusSignal;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum BuildConfigEvent {
    /// The generator asked for a new run; the owner decides when
    ReparseRequested(ReparseMode),
    EnabledChanged,
    ErrorOccurred(String),
    WarningChanged(String),
    ConfigurationForBackendChanged,
    BuildDirectoryChanged,
    ApplicationTargetsChanged(Vec<AppTarget>),
    DeploymentDataChanged(DeploymentSet),
    ParsingSucceeded,
    ParsingFailed,
    BuildTypeChanged,
}

impl From<StatusSignal> for BuildConfigEvent {
    fn from(signal: StatusSignal) -> Self {
        match signal {
            StatusSignal::EnabledChanged => BuildConfigEvent::EnabledChanged,
            StatusSignal::ErrorOccurred(message) => BuildConfigEvent::ErrorOccurred(message),
            StatusSignal::WarningChanged(message) => BuildConfigEvent::WarningChanged(message),
        }
    }
}

/// Collect status signals as events
pub(crate) fn from_signals(signals: Vec<StatusSignal>) -> impl Iterator<Item = BuildConfigEvent> {
    signals.into_iter().map(BuildConfigEvent::from)
}
