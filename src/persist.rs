//! Persisted build configuration settings
//!
//! A flat key/value map stored as JSON. Values are either a string or a list
//! of strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Canonical configuration list (`KEY:TYPE=VALUE` strings)
pub const CONFIGURATION_KEY: &str = "configuration";

/// Obsolete command-line style arguments; read, never written
pub const INITIAL_ARGUMENTS_KEY: &str = "initialArguments";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersistedValue {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedMap {
    entries: BTreeMap<String, PersistedValue>,
}

impl PersistedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PersistedValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<PersistedValue> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&PersistedValue> {
        self.entries.get(key)
    }

    /// String value; a list is joined with spaces
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.entries.get(key)? {
            PersistedValue::Text(s) => Some(s.clone()),
            PersistedValue::List(items) => Some(items.join(" ")),
        }
    }

    /// List value; a single string becomes a one-element list
    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.entries.get(key) {
            Some(PersistedValue::List(items)) => items.clone(),
            Some(PersistedValue::Text(s)) => vec![s.clone()],
            None => Vec::new(),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Write atomically (temp file, then rename)
    pub fn write_to_file(&self, path: &Path) -> Result<(), PersistError> {
        let json = self.to_json()?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &json)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self, PersistError> {
        let json = fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_shapes() {
        let json = r#"{
            "configuration": ["A:BOOL=ON", "B=x"],
            "initialArguments": "-DFOO=BAR"
        }"#;
        let map = PersistedMap::from_json(json).unwrap();
        assert_eq!(map.get_list(CONFIGURATION_KEY), vec!["A:BOOL=ON", "B=x"]);
        assert_eq!(map.get_str(INITIAL_ARGUMENTS_KEY).as_deref(), Some("-DFOO=BAR"));
        assert_eq!(map.get_list(INITIAL_ARGUMENTS_KEY), vec!["-DFOO=BAR"]);
        assert!(map.get_list("missing").is_empty());
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build_config.json");

        let mut map = PersistedMap::new();
        map.insert(
            CONFIGURATION_KEY,
            PersistedValue::List(vec!["CMAKE_BUILD_TYPE:STRING=Debug".to_string()]),
        );
        map.write_to_file(&path).unwrap();

        assert!(!path.with_extension("tmp").exists());
        let loaded = PersistedMap::from_file(&path).unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_missing_file() {
        let result = PersistedMap::from_file(Path::new("/nonexistent/build_config.json"));
        assert!(matches!(result, Err(PersistError::IoError(_))));
    }
}
