//! Configuration items and ordered configurations.
//!
//! String form (persisted and exchanged with the generator):
//! - `KEY:TYPE=VALUE` with TYPE one of BOOL, STRING, PATH, FILEPATH, INTERNAL
//! - `KEY=VALUE` (type STRING)
//! - `unset KEY` (deletion intent)
//!
//! A line starting with `#` or `//` is a comment and does not parse.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigItemParseError;

/// Cache entry type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    #[serde(rename = "BOOL")]
    Bool,
    #[default]
    #[serde(rename = "STRING")]
    String,
    #[serde(rename = "PATH")]
    Path,
    #[serde(rename = "FILEPATH")]
    FilePath,
    #[serde(rename = "INTERNAL")]
    Internal,
}

impl ItemType {
    /// Type name as it appears in `KEY:TYPE=VALUE`
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Bool => "BOOL",
            ItemType::String => "STRING",
            ItemType::Path => "PATH",
            ItemType::FilePath => "FILEPATH",
            ItemType::Internal => "INTERNAL",
        }
    }

    /// Map a type name to its type; unknown names are STRING.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "BOOL" => ItemType::Bool,
            "PATH" => ItemType::Path,
            "FILEPATH" => ItemType::FilePath,
            "INTERNAL" => ItemType::Internal,
            _ => ItemType::String,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expands macros (`%{...}`) inside configuration values.
pub trait ValueExpander {
    fn expand(&self, text: &str) -> String;
}

impl<F> ValueExpander for F
where
    F: Fn(&str) -> String,
{
    fn expand(&self, text: &str) -> String {
        self(text)
    }
}

/// A single configuration entry. Identity is the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub key: String,

    #[serde(default)]
    pub value: String,

    #[serde(rename = "type", default)]
    pub item_type: ItemType,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub documentation: String,

    #[serde(default)]
    pub is_advanced: bool,

    /// Marks deletion intent for the key
    #[serde(default)]
    pub is_unset: bool,

    /// Whether the entry came from the generator's cache
    #[serde(default)]
    pub in_cache: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
}

impl ConfigItem {
    /// Create a STRING item
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Create an item with explicit type and documentation
    pub fn typed(
        key: impl Into<String>,
        item_type: ItemType,
        documentation: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            item_type,
            documentation: documentation.into(),
            ..Default::default()
        }
    }

    /// Create an item that unsets `key`
    pub fn unset(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            is_unset: true,
            ..Default::default()
        }
    }

    /// Parse the string form of an item
    pub fn parse(input: &str) -> Result<Self, ConfigItemParseError> {
        let line = strip_comment(input);

        if let Some(rest) = line.trim_start().strip_prefix("unset ") {
            let key = rest.trim();
            if key.is_empty() {
                return Err(ConfigItemParseError::EmptyKey(input.to_string()));
            }
            return Ok(Self::unset(key));
        }

        let mut colon_pos = None;
        let mut equal_pos = None;
        for (i, c) in line.char_indices() {
            match c {
                ':' if colon_pos.is_some() => {
                    return Err(ConfigItemParseError::MalformedType(input.to_string()));
                }
                ':' => colon_pos = Some(i),
                '=' => {
                    equal_pos = Some(i);
                    break;
                }
                _ => {}
            }
        }

        let equal_pos =
            equal_pos.ok_or_else(|| ConfigItemParseError::MissingAssignment(input.to_string()))?;
        let key = line[..colon_pos.unwrap_or(equal_pos)].trim();
        if key.is_empty() {
            return Err(ConfigItemParseError::EmptyKey(input.to_string()));
        }

        let item_type = colon_pos
            .map(|c| ItemType::from_name(&line[c + 1..equal_pos]))
            .unwrap_or_default();
        let value = line[equal_pos + 1..].trim_end_matches(['\r', '\n']);

        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
            item_type,
            ..Default::default()
        })
    }

    /// Value with macros expanded
    pub fn expanded_value(&self, expander: &dyn ValueExpander) -> String {
        expander.expand(&self.value)
    }
}

impl fmt::Display for ConfigItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unset {
            write!(f, "unset {}", self.key)
        } else {
            write!(f, "{}:{}={}", self.key, self.item_type, self.value)
        }
    }
}

impl std::str::FromStr for ConfigItem {
    type Err = ConfigItemParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A line whose first non-blank text is `#` or `//` is a comment; values
/// may contain either sequence.
fn strip_comment(line: &str) -> &str {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') || trimmed.starts_with("//") {
        ""
    } else {
        line
    }
}

/// Ordered sequence of configuration items.
///
/// Insertion order is kept until a merge imposes key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    items: Vec<ConfigItem>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigItem> {
        self.items.iter()
    }

    pub fn items(&self) -> &[ConfigItem] {
        &self.items
    }

    pub fn push(&mut self, item: ConfigItem) {
        self.items.push(item);
    }

    /// `self ++ other`, keeping duplicates
    pub fn concat(&self, other: &Configuration) -> Configuration {
        self.iter().chain(other.iter()).cloned().collect()
    }

    /// First item with the given key
    pub fn get(&self, key: &str) -> Option<&ConfigItem> {
        self.items.iter().find(|i| i.key == key)
    }

    /// Value for `key`, if present
    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.get(key).map(|i| i.value.as_str())
    }

    /// Expanded value for `key`; `None` when the key is absent
    pub fn expanded_value_of(&self, key: &str, expander: &dyn ValueExpander) -> Option<String> {
        self.get(key).map(|i| i.expanded_value(expander))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|i| i.key.as_str())
    }

    /// String forms of all items
    pub fn to_strings(&self) -> Vec<String> {
        self.items.iter().map(ToString::to_string).collect()
    }

    pub fn into_vec(self) -> Vec<ConfigItem> {
        self.items
    }
}

impl From<Vec<ConfigItem>> for Configuration {
    fn from(items: Vec<ConfigItem>) -> Self {
        Self { items }
    }
}

impl FromIterator<ConfigItem> for Configuration {
    fn from_iter<I: IntoIterator<Item = ConfigItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Configuration {
    type Item = ConfigItem;
    type IntoIter = std::vec::IntoIter<ConfigItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Configuration {
    type Item = &'a ConfigItem;
    type IntoIter = std::slice::Iter<'a, ConfigItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typed() {
        let item = ConfigItem::parse("CMAKE_PREFIX_PATH:PATH=/opt/qt").unwrap();
        assert_eq!(item.key, "CMAKE_PREFIX_PATH");
        assert_eq!(item.item_type, ItemType::Path);
        assert_eq!(item.value, "/opt/qt");
    }

    #[test]
    fn test_parse_untyped_is_string() {
        let item = ConfigItem::parse("FOO=BAR").unwrap();
        assert_eq!(item.key, "FOO");
        assert_eq!(item.item_type, ItemType::String);
        assert_eq!(item.value, "BAR");
    }

    #[test]
    fn test_parse_empty_value() {
        let item = ConfigItem::parse("FOO:BOOL=").unwrap();
        assert_eq!(item.value, "");
        assert_eq!(item.item_type, ItemType::Bool);
    }

    #[test]
    fn test_parse_value_keeps_colons_and_equals() {
        let item = ConfigItem::parse("URL:STRING=http:x=y").unwrap();
        assert_eq!(item.value, "http:x=y");
    }

    #[test]
    fn test_parse_comment_lines() {
        assert!(matches!(
            ConfigItem::parse("# FOO=bar"),
            Err(ConfigItemParseError::MissingAssignment(_))
        ));
        assert!(ConfigItem::parse("  // FOO:BOOL=ON").is_err());
    }

    #[test]
    fn test_parse_keeps_hash_and_slashes_in_value() {
        let item = ConfigItem::parse("FOO=a//b#c").unwrap();
        assert_eq!(item.value, "a//b#c");
        let item = ConfigItem::parse("URL:STRING=https://example.com/x#frag").unwrap();
        assert_eq!(item.value, "https://example.com/x#frag");
        let item = ConfigItem::parse("SHARE:PATH=//server/share").unwrap();
        assert_eq!(item.value, "//server/share");
    }

    #[test]
    fn test_parse_unknown_type_is_string() {
        let item = ConfigItem::parse("FOO:UNINITIALIZED=1").unwrap();
        assert_eq!(item.item_type, ItemType::String);
    }

    #[test]
    fn test_parse_unset() {
        let item = ConfigItem::parse("unset FOO").unwrap();
        assert!(item.is_unset);
        assert_eq!(item.key, "FOO");
        assert_eq!(item.to_string(), "unset FOO");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ConfigItem::parse("NOVALUE"),
            Err(ConfigItemParseError::MissingAssignment(_))
        ));
        assert!(matches!(
            ConfigItem::parse("=value"),
            Err(ConfigItemParseError::EmptyKey(_))
        ));
        assert!(matches!(
            ConfigItem::parse("A:B:C=1"),
            Err(ConfigItemParseError::MalformedType(_))
        ));
        assert!(ConfigItem::parse("").is_err());
    }

    #[test]
    fn test_display() {
        let item = ConfigItem::typed("CMAKE_BUILD_TYPE", ItemType::String, "", "Debug");
        assert_eq!(item.to_string(), "CMAKE_BUILD_TYPE:STRING=Debug");
        let reparsed: ConfigItem = item.to_string().parse().unwrap();
        assert_eq!(reparsed.key, item.key);
        assert_eq!(reparsed.value, item.value);
    }

    #[test]
    fn test_expanded_value_of() {
        let config: Configuration = vec![ConfigItem::new("ROOT", "%{Kit:SysRoot}/usr")].into();
        let expander = |s: &str| s.replace("%{Kit:SysRoot}", "/sysroot");
        assert_eq!(
            config.expanded_value_of("ROOT", &expander),
            Some("/sysroot/usr".to_string())
        );
        assert_eq!(config.expanded_value_of("MISSING", &expander), None);
    }

    #[test]
    fn test_concat_keeps_duplicates() {
        let a: Configuration = vec![ConfigItem::new("A", "1"), ConfigItem::new("B", "2")].into();
        let b: Configuration = vec![ConfigItem::new("A", "3")].into();
        let joined = a.concat(&b);
        assert_eq!(joined.keys().collect::<Vec<_>>(), vec!["A", "B", "A"]);
    }

    #[test]
    fn test_serialization_is_a_plain_list() {
        let config: Configuration = vec![ConfigItem::new("A", "1")].into();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"type\":\"STRING\""));
    }
}
