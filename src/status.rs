//! Error and warning state
//!
//! A build configuration carries one error and one warning message, both
//! possibly empty. The error decides whether the configuration is usable;
//! the warning is informational (kit overrides).

use serde::{Deserialize, Serialize};

/// Change notifications produced by state updates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", content = "message", rename_all = "snake_case")]
pub enum StatusSignal {
    EnabledChanged,
    ErrorOccurred(String),
    WarningChanged(String),
}

/// Whether clearing the error should always announce an enabled change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceEnabledChanged {
    No,
    Yes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorWarningState {
    error: String,
    warning: String,
}

impl ErrorWarningState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn warning(&self) -> &str {
        &self.warning
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// Record `message` as the current error.
    ///
    /// Emits `EnabledChanged` when going from no error to an error, and
    /// `ErrorOccurred` every time.
    pub fn set_error(&mut self, message: impl Into<String>) -> Vec<StatusSignal> {
        let message = message.into();
        let had_error = self.has_error();
        self.error = message;

        let mut signals = Vec::with_capacity(2);
        if !had_error && self.has_error() {
            signals.push(StatusSignal::EnabledChanged);
        }
        signals.push(StatusSignal::ErrorOccurred(self.error.clone()));
        signals
    }

    /// Clear the error; `EnabledChanged` fires if there was one or if forced
    pub fn clear_error(&mut self, force: ForceEnabledChanged) -> Vec<StatusSignal> {
        let cleared = self.has_error();
        self.error.clear();
        if cleared || force == ForceEnabledChanged::Yes {
            vec![StatusSignal::EnabledChanged]
        } else {
            Vec::new()
        }
    }

    /// Replace the warning; signals only on an actual change
    pub fn set_warning(&mut self, message: impl Into<String>) -> Vec<StatusSignal> {
        let message = message.into();
        if self.warning == message {
            return Vec::new();
        }
        self.warning = message;
        vec![StatusSignal::WarningChanged(self.warning.clone())]
    }

    /// Usable when there is no error and nothing is being generated
    pub fn is_enabled(&self, currently_parsing: bool) -> bool {
        !self.has_error() && !currently_parsing
    }

    /// The error verbatim; empty when enabled
    pub fn disabled_reason(&self) -> &str {
        &self.error
    }
}
