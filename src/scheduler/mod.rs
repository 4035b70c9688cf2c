//! Reparse scheduling
//!
//! Decides which mode each change requests and keeps at most one generation
//! in flight per build configuration:
//! - A trigger while settled sends a new request
//! - A trigger while busy escalates the pending mode; a stronger mode is
//!   forwarded, an equal or weaker one is coalesced
//! - A request resolving to `FailIfReaderChanges` is rejected; when a
//!   generation is in flight the rejection outlives its result
//! - Deactivation stops the generator and returns to IDLE

mod mode;
mod trigger;

pub use mode::ReparseMode;
pub use trigger::{Trigger, TriggerPolicy};

use crate::generator::{BuildDirParameters, Generator};
use crate::state::{ParseState, ParseStateData, ParseStateError};

/// Scheduler errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    #[error(
        "{} in a way that needs a different CMake reader. Reload the project to apply it.",
        .trigger.describe()
    )]
    ReaderChangeForbidden { trigger: Trigger },

    #[error(transparent)]
    State(#[from] ParseStateError),
}

/// What happened to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A new request was sent
    Sent(ReparseMode),
    /// The pending request was strengthened and re-sent
    Escalated { from: ReparseMode, to: ReparseMode },
    /// Folded into the pending request without sending
    Coalesced(ReparseMode),
}

/// Per-configuration reparse state machine
#[derive(Debug, Default)]
pub struct ReparseScheduler {
    state: ParseStateData,
    /// Guard rejection raised while busy, reported once the run finishes
    deferred_rejection: Option<Trigger>,
}

impl ReparseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ParseState {
        self.state.state
    }

    /// Mode of the pending or running generation
    pub fn pending_mode(&self) -> Option<ReparseMode> {
        self.state.mode
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// Resolve `trigger` against the generator and schedule it
    pub fn request(
        &mut self,
        trigger: Trigger,
        params: &BuildDirParameters,
        generator: &mut dyn Generator,
    ) -> Result<RequestOutcome, SchedulerError> {
        let reader_changes = generator.requires_new_reader(params);
        let mode = trigger.policy().resolve(reader_changes);
        tracing::debug!(%trigger, reader_changes, %mode, "resolved reparse request");

        if mode.is_guard() {
            tracing::warn!(%trigger, "rejecting reparse that would replace the reader");
            if self.state.is_busy() {
                self.deferred_rejection = Some(trigger);
            } else {
                self.state.fail()?;
            }
            return Err(SchedulerError::ReaderChangeForbidden { trigger });
        }

        self.schedule(mode, params, generator)
    }

    /// Schedule an already resolved mode
    pub fn schedule(
        &mut self,
        mode: ReparseMode,
        params: &BuildDirParameters,
        generator: &mut dyn Generator,
    ) -> Result<RequestOutcome, SchedulerError> {
        let outcome = match (self.state.state, self.state.mode) {
            (ParseState::RequestPending, Some(pending)) => {
                let escalated = pending.stronger(mode);
                if escalated == pending {
                    tracing::debug!(%pending, %mode, "coalesced into pending request");
                    return Ok(RequestOutcome::Coalesced(pending));
                }
                self.state.request(escalated)?;
                RequestOutcome::Escalated {
                    from: pending,
                    to: escalated,
                }
            }
            (ParseState::Parsing, current) => {
                // The running generation predates this change; queue a new one
                let escalated = current.map_or(mode, |c| c.stronger(mode));
                self.state.request(escalated)?;
                match current {
                    Some(from) if from != escalated => RequestOutcome::Escalated {
                        from,
                        to: escalated,
                    },
                    _ => RequestOutcome::Sent(escalated),
                }
            }
            _ => {
                self.state.request(mode)?;
                RequestOutcome::Sent(mode)
            }
        };

        let sent = match outcome {
            RequestOutcome::Sent(m) => m,
            RequestOutcome::Escalated { to, .. } => to,
            RequestOutcome::Coalesced(m) => m,
        };
        tracing::info!(mode = %sent, "requesting generator run");
        generator.request_parse(params, sent);
        Ok(outcome)
    }

    /// Generator reported that it started
    pub fn parsing_started(&mut self) -> Result<(), SchedulerError> {
        Ok(self.state.start()?)
    }

    /// Generator produced data
    pub fn data_available(&mut self) -> Result<(), SchedulerError> {
        Ok(self.state.succeed()?)
    }

    /// Generator failed
    pub fn error_occurred(&mut self) -> Result<(), SchedulerError> {
        Ok(self.state.fail()?)
    }

    /// Rejection raised while the finished run was in flight.
    ///
    /// The finished run used the old parameters, so a successful result is
    /// turned into a failure.
    pub fn take_deferred_rejection(&mut self) -> Result<Option<SchedulerError>, SchedulerError> {
        if self.state.is_busy() {
            return Ok(None);
        }
        let Some(trigger) = self.deferred_rejection.take() else {
            return Ok(None);
        };
        if self.state.state == ParseState::Succeeded {
            self.state.fail()?;
        }
        tracing::warn!(%trigger, "reporting reader change rejected during generation");
        Ok(Some(SchedulerError::ReaderChangeForbidden { trigger }))
    }

    /// Cancel everything and return to IDLE
    pub fn cancel(&mut self, generator: &mut dyn Generator) {
        if self.state.is_busy() {
            tracing::info!(state = ?self.state.state, "cancelling generation");
        }
        generator.stop_and_clear_state();
        self.state.reset();
        self.deferred_rejection = None;
    }
}
