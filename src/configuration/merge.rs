//! Configuration merge logic
//!
//! Merge semantics:
//! - Concatenation order defines precedence (later wins)
//! - Result keys are unique and sorted ascending (byte order)

use buildconf_model::{Configuration, ValueExpander};
use std::collections::HashSet;

/// Remove duplicate keys, keeping the last occurrence, then sort by key.
pub fn dedup(config: Configuration) -> Configuration {
    let mut seen = HashSet::new();
    let mut kept: Vec<_> = config
        .into_vec()
        .into_iter()
        .rev()
        .filter(|item| seen.insert(item.key.clone()))
        .collect();
    kept.sort_by(|a, b| a.key.cmp(&b.key));
    kept.into()
}

/// Merge kit and instance layers; instance entries win.
pub fn merge_layers(kit: &Configuration, instance: &Configuration) -> Configuration {
    dedup(kit.concat(instance))
}

/// Check whether any instance item shadows a kit default.
///
/// An item overrides when the kit defines the key and the item either
/// expands to a different value or unsets it.
pub fn detect_override(
    instance: &Configuration,
    kit: &Configuration,
    expander: &dyn ValueExpander,
) -> bool {
    instance.iter().any(|item| {
        kit.expanded_value_of(&item.key, expander)
            .map(|default| item.is_unset || item.expanded_value(expander) != default)
            .unwrap_or(false)
    })
}

/// Merge new items into the current configuration.
///
/// When `current` is empty the `initial` seed is folded in after the new
/// items, so seeded keys are always present after first-time setup.
pub fn apply_configuration(
    current: &Configuration,
    initial: &Configuration,
    new_items: Configuration,
) -> Configuration {
    let merged = dedup(current.concat(&new_items));
    if current.is_empty() {
        dedup(merged.concat(initial))
    } else {
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildconf_model::ConfigItem;

    fn config(pairs: &[(&str, &str)]) -> Configuration {
        pairs.iter().map(|(k, v)| ConfigItem::new(*k, *v)).collect()
    }

    fn pairs(config: &Configuration) -> Vec<(String, String)> {
        config
            .iter()
            .map(|i| (i.key.clone(), i.value.clone()))
            .collect()
    }

    fn identity(s: &str) -> String {
        s.to_string()
    }

    #[test]
    fn test_dedup_last_wins_and_sorted() {
        let c1 = config(&[("B", "1"), ("A", "1"), ("C", "1")]);
        let c2 = config(&[("C", "2"), ("A", "2")]);
        let result = dedup(c1.concat(&c2));
        assert_eq!(
            pairs(&result),
            vec![
                ("A".to_string(), "2".to_string()),
                ("B".to_string(), "1".to_string()),
                ("C".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_dedup_idempotent() {
        let c = config(&[("Z", "1"), ("a", "1"), ("Z", "2"), ("B", "3")]);
        let once = dedup(c);
        let twice = dedup(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dedup_ordinal_ordering() {
        // Uppercase sorts before lowercase in byte order
        let result = dedup(config(&[("b", "1"), ("B", "1"), ("_x", "1")]));
        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["B", "_x", "b"]);
    }

    #[test]
    fn test_dedup_empty() {
        assert!(dedup(Configuration::new()).is_empty());
    }

    #[test]
    fn test_merge_layers_override_preserving() {
        let kit = config(&[("KIT_ONLY", "k"), ("SHARED", "kit")]);
        let instance = config(&[("SHARED", "instance"), ("INSTANCE_ONLY", "i")]);
        let merged = merge_layers(&kit, &instance);
        assert_eq!(merged.value_of("KIT_ONLY"), Some("k"));
        assert_eq!(merged.value_of("INSTANCE_ONLY"), Some("i"));
        assert_eq!(merged.value_of("SHARED"), Some("instance"));
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_detect_override_differing_value() {
        let kit = config(&[("CMAKE_CXX_COMPILER", "/usr/bin/g++")]);
        let instance = config(&[("CMAKE_CXX_COMPILER", "/usr/bin/clang++")]);
        assert!(detect_override(&instance, &kit, &identity));
    }

    #[test]
    fn test_detect_override_matching_subset() {
        let kit = config(&[("A", "1"), ("B", "2")]);
        let instance = config(&[("A", "1")]);
        assert!(!detect_override(&instance, &kit, &identity));
    }

    #[test]
    fn test_detect_override_unset_with_kit_default() {
        let kit = config(&[("A", "1")]);
        let instance: Configuration = vec![ConfigItem::unset("A")].into();
        assert!(detect_override(&instance, &kit, &identity));
    }

    #[test]
    fn test_detect_override_unset_without_kit_default() {
        let kit = config(&[("A", "1")]);
        let instance: Configuration = vec![ConfigItem::unset("B")].into();
        assert!(!detect_override(&instance, &kit, &identity));
    }

    #[test]
    fn test_detect_override_compares_expanded_values() {
        let kit = config(&[("ROOT", "%{Kit:SysRoot}")]);
        let instance = config(&[("ROOT", "/sysroot")]);
        let expander = |s: &str| s.replace("%{Kit:SysRoot}", "/sysroot");
        assert!(!detect_override(&instance, &kit, &expander));
    }

    #[test]
    fn test_apply_seeds_when_empty() {
        let initial = config(&[("SEED", "s")]);
        let result = apply_configuration(
            &Configuration::new(),
            &initial,
            config(&[("USER", "u")]),
        );
        assert_eq!(result.value_of("SEED"), Some("s"));
        assert_eq!(result.value_of("USER"), Some("u"));
    }

    #[test]
    fn test_apply_seed_wins_on_first_setup() {
        let initial = config(&[("ANDROID_STL", "c++_shared")]);
        let result = apply_configuration(
            &Configuration::new(),
            &initial,
            config(&[("ANDROID_STL", "c++_static")]),
        );
        assert_eq!(result.value_of("ANDROID_STL"), Some("c++_shared"));
    }

    #[test]
    fn test_apply_does_not_reseed_when_populated() {
        let initial = config(&[("SEED", "s")]);
        let current = config(&[("USER", "u")]);
        let result = apply_configuration(&current, &initial, config(&[("USER", "v")]));
        assert_eq!(result.value_of("SEED"), None);
        assert_eq!(result.value_of("USER"), Some("v"));
    }
}
