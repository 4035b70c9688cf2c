//! `%{Group:Name}` macro expansion
//!
//! Used for build directory templates and for expanding configuration values
//! against a kit. Unknown macros are left in place.

use buildconf_model::ValueExpander;
use regex_lite::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn macro_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"%\{([A-Za-z0-9_]+:[A-Za-z0-9_]+)\}").expect("static macro pattern")
    })
}

/// Variable table for macro expansion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroExpander {
    variables: BTreeMap<String, String>,
}

impl MacroExpander {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Add all variables of `other`, overriding existing names
    pub fn extend(&mut self, other: &MacroExpander) {
        for (name, value) in &other.variables {
            self.variables.insert(name.clone(), value.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Expand all known `%{Group:Name}` macros in `text`
    pub fn expand(&self, text: &str) -> String {
        macro_pattern()
            .replace_all(text, |caps: &Captures<'_>| match self.variables.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

impl ValueExpander for MacroExpander {
    fn expand(&self, text: &str) -> String {
        MacroExpander::expand(self, text)
    }
}
