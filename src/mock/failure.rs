//! Failure Injection for the Mock Generator

use std::collections::HashMap;

/// Extraction that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    BuildTargets,
    Configuration,
}

#[derive(Debug, Clone)]
struct FailureConfig {
    message: String,
    /// Number of times to fail before succeeding (None = always fail)
    fail_count: Option<u32>,
}

/// Per-extraction error injector
#[derive(Debug, Default)]
pub struct ExtractionFailures {
    configs: HashMap<FailurePoint, FailureConfig>,
    call_counts: HashMap<FailurePoint, u32>,
}

impl ExtractionFailures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always fail `point` with `message`
    pub fn inject(&mut self, point: FailurePoint, message: impl Into<String>) {
        self.configs.insert(
            point,
            FailureConfig {
                message: message.into(),
                fail_count: None,
            },
        );
        self.call_counts.insert(point, 0);
    }

    /// Fail `point` for the next `count` calls only
    pub fn inject_times(&mut self, point: FailurePoint, message: impl Into<String>, count: u32) {
        self.configs.insert(
            point,
            FailureConfig {
                message: message.into(),
                fail_count: Some(count),
            },
        );
        self.call_counts.insert(point, 0);
    }

    pub fn clear(&mut self) {
        self.configs.clear();
        self.call_counts.clear();
    }

    /// Error message for this call of `point`, if it should fail
    pub fn check(&mut self, point: FailurePoint) -> Option<String> {
        let config = self.configs.get(&point)?;
        let count = self.call_counts.entry(point).or_insert(0);
        *count += 1;

        if let Some(limit) = config.fail_count {
            if *count > limit {
                return None;
            }
        }
        Some(config.message.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_injection() {
        let mut failures = ExtractionFailures::new();
        assert_eq!(failures.check(FailurePoint::BuildTargets), None);
    }

    #[test]
    fn test_always_fail() {
        let mut failures = ExtractionFailures::new();
        failures.inject(FailurePoint::Configuration, "cache unreadable");
        assert_eq!(
            failures.check(FailurePoint::Configuration).as_deref(),
            Some("cache unreadable")
        );
        assert!(failures.check(FailurePoint::Configuration).is_some());
        assert_eq!(failures.check(FailurePoint::BuildTargets), None);
    }

    #[test]
    fn test_fail_count() {
        let mut failures = ExtractionFailures::new();
        failures.inject_times(FailurePoint::BuildTargets, "no codemodel", 1);
        assert!(failures.check(FailurePoint::BuildTargets).is_some());
        assert!(failures.check(FailurePoint::BuildTargets).is_none());
    }

    #[test]
    fn test_clear() {
        let mut failures = ExtractionFailures::new();
        failures.inject(FailurePoint::BuildTargets, "x");
        failures.clear();
        assert!(failures.check(FailurePoint::BuildTargets).is_none());
    }
}
