//! Parse state for one build configuration
//!
//! IDLE → REQUEST_PENDING → PARSING → {SUCCEEDED | FAILED}, with new
//! requests allowed from any settled state and IDLE reachable from anywhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{next_seq, now_utc};
use crate::scheduler::ReparseMode;

/// Parse state enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParseState {
    /// Nothing requested
    Idle,
    /// A request was sent and the generator has not started yet
    RequestPending,
    /// The generator is running
    Parsing,
    /// Last run produced data
    Succeeded,
    /// Last run (or request) failed
    Failed,
}

impl ParseState {
    /// Check if transition from this state to target is valid
    pub fn can_transition_to(&self, target: ParseState) -> bool {
        use ParseState::*;
        match (self, target) {
            // Deactivation
            (_, Idle) => true,

            // New or escalated requests
            (Idle | Succeeded | Failed, RequestPending) => true,
            (RequestPending | Parsing, RequestPending) => true,

            // Generator started; it may start on its own (file watching)
            (Idle | RequestPending | Succeeded | Failed, Parsing) => true,

            // Results of a run
            (RequestPending | Parsing, Succeeded) => true,
            (RequestPending | Parsing, Failed) => true,

            // A request rejected before reaching the generator
            (Idle | Succeeded | Failed, Failed) => true,

            _ => false,
        }
    }

    /// A generation is requested or running
    pub fn is_busy(&self) -> bool {
        matches!(self, ParseState::RequestPending | ParseState::Parsing)
    }
}

/// Errors for parse state operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseStateError {
    #[error("Invalid parse state transition from {from:?} to {to:?}")]
    InvalidTransition { from: ParseState, to: ParseState },
}

/// Parse state with the mode of the pending or running generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseStateData {
    pub state: ParseState,

    /// Mode of the pending/running generation; `None` when settled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ReparseMode>,

    pub updated_at: DateTime<Utc>,

    /// Monotonic sequence counter for ordering
    pub seq: u64,
}

impl Default for ParseStateData {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseStateData {
    /// Create in IDLE state
    pub fn new() -> Self {
        Self {
            state: ParseState::Idle,
            mode: None,
            updated_at: now_utc(),
            seq: next_seq(),
        }
    }

    /// Transition to a new state
    pub fn transition(&mut self, new_state: ParseState) -> Result<(), ParseStateError> {
        if !self.state.can_transition_to(new_state) {
            return Err(ParseStateError::InvalidTransition {
                from: self.state,
                to: new_state,
            });
        }

        self.state = new_state;
        if !new_state.is_busy() {
            self.mode = None;
        }
        self.updated_at = now_utc();
        self.seq = next_seq();

        Ok(())
    }

    /// Enter REQUEST_PENDING with `mode`
    pub fn request(&mut self, mode: ReparseMode) -> Result<(), ParseStateError> {
        self.transition(ParseState::RequestPending)?;
        self.mode = Some(mode);
        Ok(())
    }

    /// Enter PARSING, keeping the pending mode
    pub fn start(&mut self) -> Result<(), ParseStateError> {
        let mode = self.mode;
        self.transition(ParseState::Parsing)?;
        self.mode = mode;
        Ok(())
    }

    pub fn succeed(&mut self) -> Result<(), ParseStateError> {
        self.transition(ParseState::Succeeded)
    }

    pub fn fail(&mut self) -> Result<(), ParseStateError> {
        self.transition(ParseState::Failed)
    }

    /// Back to IDLE (always valid)
    pub fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.mode = None;
        self.updated_at = now_utc();
        self.seq = next_seq();
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_idle() {
        let state = ParseStateData::new();
        assert_eq!(state.state, ParseState::Idle);
        assert_eq!(state.mode, None);
        assert!(!state.is_busy());
    }

    #[test]
    fn test_happy_path() {
        let mut state = ParseStateData::new();
        state.request(ReparseMode::CheckConfiguration).unwrap();
        assert_eq!(state.state, ParseState::RequestPending);
        assert_eq!(state.mode, Some(ReparseMode::CheckConfiguration));

        state.start().unwrap();
        assert_eq!(state.state, ParseState::Parsing);
        assert_eq!(state.mode, Some(ReparseMode::CheckConfiguration));

        state.succeed().unwrap();
        assert_eq!(state.state, ParseState::Succeeded);
        assert_eq!(state.mode, None);
    }

    #[test]
    fn test_results_need_a_run() {
        let mut state = ParseStateData::new();
        assert!(state.succeed().is_err());

        state.request(ReparseMode::NoCheck).unwrap();
        state.succeed().unwrap();
        assert!(state.succeed().is_err());
    }

    #[test]
    fn test_rejected_request_from_idle() {
        let mut state = ParseStateData::new();
        assert!(state.fail().is_ok());
        assert_eq!(state.state, ParseState::Failed);
    }

    #[test]
    fn test_reset_from_anywhere() {
        let mut state = ParseStateData::new();
        state.request(ReparseMode::ForceConfiguration).unwrap();
        state.start().unwrap();
        state.reset();
        assert_eq!(state.state, ParseState::Idle);
        assert_eq!(state.mode, None);
    }

    #[test]
    fn test_seq_increments() {
        let mut state = ParseStateData::new();
        let before = state.seq;
        state.request(ReparseMode::NoCheck).unwrap();
        assert!(state.seq > before);
    }

    #[test]
    fn test_serialization() {
        let mut state = ParseStateData::new();
        state.request(ReparseMode::CheckConfiguration).unwrap();
        let json = state.to_json().unwrap();
        assert!(json.contains("\"state\": \"REQUEST_PENDING\""));
        assert!(json.contains("\"mode\": \"CHECK_CONFIGURATION\""));
    }
}
