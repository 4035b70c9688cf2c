//! Reparse severity

use serde::{Deserialize, Serialize};
use std::fmt;

/// How hard the generator should re-check the configuration.
///
/// `FailIfReaderChanges` is a guard rather than a severity: resolving a
/// request to it aborts the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReparseMode {
    /// Rerun without re-checking the configuration
    NoCheck,
    /// Compare the configuration and rerun configure if it differs
    CheckConfiguration,
    /// Always pass the configuration to the generator
    ForceConfiguration,
    /// Refuse the request if it would need a new reader
    FailIfReaderChanges,
}

impl ReparseMode {
    /// Severity rank; `None` for the reader guard
    pub fn rank(&self) -> Option<u8> {
        match self {
            ReparseMode::NoCheck => Some(0),
            ReparseMode::CheckConfiguration => Some(1),
            ReparseMode::ForceConfiguration => Some(2),
            ReparseMode::FailIfReaderChanges => None,
        }
    }

    /// The stronger of two severities; guards never win
    pub fn stronger(self, other: ReparseMode) -> ReparseMode {
        match (self.rank(), other.rank()) {
            (Some(a), Some(b)) if b > a => other,
            (Some(_), _) => self,
            (None, _) => other,
        }
    }

    pub fn is_guard(&self) -> bool {
        self.rank().is_none()
    }
}

impl fmt::Display for ReparseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReparseMode::NoCheck => write!(f, "NO_CHECK"),
            ReparseMode::CheckConfiguration => write!(f, "CHECK_CONFIGURATION"),
            ReparseMode::ForceConfiguration => write!(f, "FORCE_CONFIGURATION"),
            ReparseMode::FailIfReaderChanges => write!(f, "FAIL_IF_READER_CHANGES"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stronger_orders_severities() {
        use ReparseMode::*;
        assert_eq!(CheckConfiguration.stronger(ForceConfiguration), ForceConfiguration);
        assert_eq!(ForceConfiguration.stronger(CheckConfiguration), ForceConfiguration);
        assert_eq!(NoCheck.stronger(CheckConfiguration), CheckConfiguration);
        assert_eq!(NoCheck.stronger(NoCheck), NoCheck);
    }

    #[test]
    fn test_guard_never_wins() {
        use ReparseMode::*;
        assert_eq!(NoCheck.stronger(FailIfReaderChanges), NoCheck);
        assert_eq!(FailIfReaderChanges.stronger(CheckConfiguration), CheckConfiguration);
        assert!(FailIfReaderChanges.is_guard());
    }
}
