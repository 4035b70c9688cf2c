//! Configuration state owned by one build configuration

use buildconf_model::{BuildTarget, Configuration};

use crate::configuration::{apply_configuration, detect_override};
use crate::events::{from_signals, BuildConfigEvent};
use crate::kit::Kit;
use crate::status::ErrorWarningState;

pub const KIT_OVERRIDE_WARNING: &str =
    "CMake configuration set by the kit was overridden in the project.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationState {
    /// Instance-level configuration handed to the generator
    pub configuration_for_backend: Configuration,
    /// Snapshot of what the generator last reported
    pub configuration_from_backend: Configuration,
    /// Seed fixed at creation, folded in on first-time setup
    pub initial_configuration: Configuration,
    pub build_targets: Vec<BuildTarget>,
    pub status: ErrorWarningState,
    pub active: bool,
}

impl ConfigurationState {
    pub fn new(initial_configuration: Configuration) -> Self {
        Self {
            initial_configuration,
            ..Default::default()
        }
    }

    /// Merge `new_items` into the instance configuration and refresh the
    /// kit-override warning.
    pub fn set_configuration_for_backend(
        &mut self,
        new_items: Configuration,
        kit: &Kit,
    ) -> Vec<BuildConfigEvent> {
        self.configuration_for_backend = apply_configuration(
            &self.configuration_for_backend,
            &self.initial_configuration,
            new_items,
        );

        let overridden = detect_override(
            &self.configuration_for_backend,
            &kit.configuration(),
            &kit.expander(),
        );
        let warning = if overridden {
            tracing::warn!(kit = %kit.id, "kit configuration overridden by build configuration");
            KIT_OVERRIDE_WARNING
        } else {
            ""
        };

        let mut events: Vec<_> = from_signals(self.status.set_warning(warning)).collect();
        events.push(BuildConfigEvent::ConfigurationForBackendChanged);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildconf_model::ConfigItem;

    fn kit() -> Kit {
        let mut kit = Kit::new("k", "Host");
        kit.cmake_configuration = vec!["CMAKE_CXX_COMPILER:FILEPATH=/usr/bin/g++".to_string()];
        kit
    }

    #[test]
    fn test_seed_folded_in_once() {
        let seed: Configuration = vec![ConfigItem::new("SEED", "1")].into();
        let mut state = ConfigurationState::new(seed);

        state.set_configuration_for_backend(vec![ConfigItem::new("A", "x")].into(), &kit());
        assert_eq!(state.configuration_for_backend.keys().collect::<Vec<_>>(), vec!["A", "SEED"]);

        state.set_configuration_for_backend(vec![ConfigItem::new("B", "y")].into(), &kit());
        assert_eq!(
            state.configuration_for_backend.keys().collect::<Vec<_>>(),
            vec!["A", "B", "SEED"]
        );
    }

    #[test]
    fn test_override_warning_set_and_cleared() {
        let mut state = ConfigurationState::default();

        let events = state.set_configuration_for_backend(
            vec![ConfigItem::new("CMAKE_CXX_COMPILER", "/usr/bin/clang++")].into(),
            &kit(),
        );
        assert_eq!(state.status.warning(), KIT_OVERRIDE_WARNING);
        assert_eq!(
            events,
            vec![
                BuildConfigEvent::WarningChanged(KIT_OVERRIDE_WARNING.to_string()),
                BuildConfigEvent::ConfigurationForBackendChanged
            ]
        );

        let events = state.set_configuration_for_backend(
            vec![ConfigItem::new("CMAKE_CXX_COMPILER", "/usr/bin/g++")].into(),
            &kit(),
        );
        assert_eq!(state.status.warning(), "");
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_no_warning_event_without_change() {
        let mut state = ConfigurationState::default();
        let events =
            state.set_configuration_for_backend(vec![ConfigItem::new("OTHER", "1")].into(), &kit());
        assert_eq!(events, vec![BuildConfigEvent::ConfigurationForBackendChanged]);
    }
}
