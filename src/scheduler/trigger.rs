//! Change triggers and their reparse policy
//!
//! Every external change maps to a pair of modes: one used when the request
//! needs a new generator reader, one used when the current reader stays.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ReparseMode;

/// External change that may require regenerating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Settings of this configuration's kit were updated
    KitUpdated,
    /// This configuration became the active one
    BecameActive,
    /// The build environment changed
    EnvironmentChanged,
    /// The build directory changed
    BuildDirectoryChanged,
    /// The configuration handed to the generator changed
    ConfigurationChanged,
}

/// Modes selected by a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerPolicy {
    pub if_reader_changes: ReparseMode,
    pub if_reader_stays: ReparseMode,
}

impl TriggerPolicy {
    /// Pick the mode for the reader outcome
    pub fn resolve(&self, reader_changes: bool) -> ReparseMode {
        if reader_changes {
            self.if_reader_changes
        } else {
            self.if_reader_stays
        }
    }
}

const POLICIES: &[(Trigger, TriggerPolicy)] = &[
    (
        Trigger::KitUpdated,
        TriggerPolicy {
            if_reader_changes: ReparseMode::CheckConfiguration,
            if_reader_stays: ReparseMode::CheckConfiguration,
        },
    ),
    (
        Trigger::BecameActive,
        TriggerPolicy {
            if_reader_changes: ReparseMode::CheckConfiguration,
            if_reader_stays: ReparseMode::CheckConfiguration,
        },
    ),
    (
        Trigger::EnvironmentChanged,
        TriggerPolicy {
            if_reader_changes: ReparseMode::CheckConfiguration,
            if_reader_stays: ReparseMode::CheckConfiguration,
        },
    ),
    (
        Trigger::BuildDirectoryChanged,
        TriggerPolicy {
            if_reader_changes: ReparseMode::FailIfReaderChanges,
            if_reader_stays: ReparseMode::CheckConfiguration,
        },
    ),
    (
        Trigger::ConfigurationChanged,
        TriggerPolicy {
            if_reader_changes: ReparseMode::FailIfReaderChanges,
            if_reader_stays: ReparseMode::ForceConfiguration,
        },
    ),
];

impl Trigger {
    pub const ALL: [Trigger; 5] = [
        Trigger::KitUpdated,
        Trigger::BecameActive,
        Trigger::EnvironmentChanged,
        Trigger::BuildDirectoryChanged,
        Trigger::ConfigurationChanged,
    ];

    /// Dispatch table lookup
    pub fn policy(&self) -> TriggerPolicy {
        POLICIES
            .iter()
            .find(|(trigger, _)| trigger == self)
            .map(|(_, policy)| *policy)
            .unwrap_or(TriggerPolicy {
                if_reader_changes: ReparseMode::CheckConfiguration,
                if_reader_stays: ReparseMode::CheckConfiguration,
            })
    }

    /// Human-readable description of the change
    pub fn describe(&self) -> &'static str {
        match self {
            Trigger::KitUpdated => "The kit was updated",
            Trigger::BecameActive => "The build configuration became active",
            Trigger::EnvironmentChanged => "The build environment changed",
            Trigger::BuildDirectoryChanged => "The build directory changed",
            Trigger::ConfigurationChanged => "The CMake configuration changed",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Trigger::KitUpdated => "kit_updated",
            Trigger::BecameActive => "became_active",
            Trigger::EnvironmentChanged => "environment_changed",
            Trigger::BuildDirectoryChanged => "build_directory_changed",
            Trigger::ConfigurationChanged => "configuration_changed",
        };
        f.write_str(name)
    }
}
