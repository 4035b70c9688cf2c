//! Editor-facing data items and their conversion to configuration items.

use buildconf_model::{ConfigItem, Configuration, ItemType};
use serde::{Deserialize, Serialize};

/// Value kind as presented by an editor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataItemType {
    Boolean,
    File,
    Directory,
    String,
    #[default]
    Unknown,
}

impl From<DataItemType> for ItemType {
    fn from(value: DataItemType) -> Self {
        match value {
            DataItemType::Boolean => ItemType::Bool,
            DataItemType::File => ItemType::FilePath,
            DataItemType::Directory => ItemType::Path,
            DataItemType::String => ItemType::String,
            DataItemType::Unknown => ItemType::Internal,
        }
    }
}

/// A configuration value as edited by a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataItem {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub data_type: DataItemType,
    #[serde(default)]
    pub is_advanced: bool,
    #[serde(default)]
    pub is_unset: bool,
    #[serde(default)]
    pub in_cache: bool,
    #[serde(default)]
    pub values: Vec<String>,
}

impl DataItem {
    pub fn new(key: impl Into<String>, data_type: DataItemType, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            data_type,
            ..Default::default()
        }
    }

    /// Convert a batch of edits into a configuration, keeping order
    pub fn into_configuration(items: Vec<DataItem>) -> Configuration {
        items.into_iter().map(ConfigItem::from).collect()
    }
}

impl From<DataItem> for ConfigItem {
    fn from(item: DataItem) -> Self {
        ConfigItem {
            key: item.key,
            value: item.value,
            item_type: item.data_type.into(),
            documentation: item.description,
            is_advanced: item.is_advanced,
            is_unset: item.is_unset,
            in_cache: item.in_cache,
            allowed_values: item.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_remap() {
        assert_eq!(ItemType::from(DataItemType::Boolean), ItemType::Bool);
        assert_eq!(ItemType::from(DataItemType::File), ItemType::FilePath);
        assert_eq!(ItemType::from(DataItemType::Directory), ItemType::Path);
        assert_eq!(ItemType::from(DataItemType::String), ItemType::String);
        assert_eq!(ItemType::from(DataItemType::Unknown), ItemType::Internal);
    }

    #[test]
    fn test_field_copy() {
        let item = DataItem {
            key: "OPT".to_string(),
            value: "ON".to_string(),
            description: "An option".to_string(),
            data_type: DataItemType::Boolean,
            is_advanced: true,
            is_unset: false,
            in_cache: true,
            values: vec!["ON".to_string(), "OFF".to_string()],
        };
        let converted = ConfigItem::from(item);
        assert_eq!(converted.key, "OPT");
        assert_eq!(converted.documentation, "An option");
        assert!(converted.is_advanced);
        assert!(converted.in_cache);
        assert_eq!(converted.allowed_values, vec!["ON", "OFF"]);
        assert_eq!(converted.item_type, ItemType::Bool);
    }
}
