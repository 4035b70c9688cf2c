//! Build configuration state
//!
//! Parse states: IDLE → REQUEST_PENDING → PARSING → {SUCCEEDED | FAILED}
//! Deactivation returns any state to IDLE.

mod configuration_state;
mod parse_state;

pub use configuration_state::{ConfigurationState, KIT_OVERRIDE_WARNING};
pub use parse_state::{ParseState, ParseStateData, ParseStateError};

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global sequence counter for ordering state changes
static SEQUENCE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Next sequence number
pub fn next_seq() -> u64 {
    SEQUENCE_COUNTER.fetch_add(1, Ordering::SeqCst)
}

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}
