//! Migration of obsolete persisted configuration
//!
//! Older persisted state stored the configuration as a single shell-style
//! argument string (`-DFOO=BAR -D BAZ=QUX`). Those definitions are migrated
//! into configuration items with lower precedence than the canonical list.

use buildconf_model::{ConfigItem, Configuration};

/// Errors splitting a legacy argument string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LegacyArgsError {
    #[error("unterminated {0} quote in argument string")]
    UnterminatedQuote(char),

    #[error("argument string ends with a dangling escape")]
    DanglingEscape,
}

/// Split an argument string on whitespace, honouring quotes and escapes.
///
/// Single quotes are literal; inside double quotes a backslash only escapes
/// `"`, `\`, `$` and `` ` ``.
pub fn split_arguments(input: &str) -> Result<Vec<String>, LegacyArgsError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(LegacyArgsError::UnterminatedQuote('\'')),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(e @ ('"' | '\\' | '$' | '`')) => current.push(e),
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => return Err(LegacyArgsError::UnterminatedQuote('"')),
                        },
                        Some(c) => current.push(c),
                        None => return Err(LegacyArgsError::UnterminatedQuote('"')),
                    }
                }
            }
            '\\' => {
                in_token = true;
                match chars.next() {
                    Some(e) => current.push(e),
                    None => return Err(LegacyArgsError::DanglingEscape),
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        args.push(current);
    }
    Ok(args)
}

/// Extract `-D` definitions from a legacy argument string.
///
/// `-D KEY=VALUE` and `-DKEY=VALUE` are accepted; every other token and any
/// definition that does not parse is ignored. A string that cannot be split
/// yields no items.
pub fn migrate_arguments(arguments: &str) -> Configuration {
    let args = match split_arguments(arguments) {
        Ok(args) => args,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable legacy arguments");
            return Configuration::new();
        }
    };

    let mut config = Configuration::new();
    let mut next_is_definition = false;
    for arg in &args {
        if arg == "-D" {
            next_is_definition = true;
            continue;
        }
        let definition = if next_is_definition {
            Some(arg.as_str())
        } else {
            arg.strip_prefix("-D")
        };
        next_is_definition = false;

        if let Some(item) = definition.and_then(|d| ConfigItem::parse(d).ok()) {
            config.push(item);
        }
    }
    config
}

/// Combine legacy arguments and the canonical list, legacy first.
///
/// Canonical entries that fail to parse are dropped silently.
pub fn load_persisted_configuration(
    canonical: &[String],
    legacy_arguments: Option<&str>,
) -> Configuration {
    let legacy = legacy_arguments.map(migrate_arguments).unwrap_or_default();
    let current: Configuration = canonical
        .iter()
        .filter_map(|line| ConfigItem::parse(line).ok())
        .collect();
    legacy.concat(&current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain() {
        assert_eq!(
            split_arguments("  -DA=1   -G Ninja ").unwrap(),
            vec!["-DA=1", "-G", "Ninja"]
        );
    }

    #[test]
    fn test_split_quotes() {
        assert_eq!(
            split_arguments(r#"-DNAME="hello world" '-DX=a b' -DY=c\ d"#).unwrap(),
            vec!["-DNAME=hello world", "-DX=a b", "-DY=c d"]
        );
    }

    #[test]
    fn test_split_empty_quoted_token() {
        assert_eq!(split_arguments(r#"a "" b"#).unwrap(), vec!["a", "", "b"]);
    }

    #[test]
    fn test_split_unterminated() {
        assert_eq!(
            split_arguments("-DA='oops"),
            Err(LegacyArgsError::UnterminatedQuote('\''))
        );
        assert_eq!(split_arguments("a\\"), Err(LegacyArgsError::DanglingEscape));
    }

    #[test]
    fn test_migrate_both_forms() {
        let config = migrate_arguments("-DFOO=BAR -D BAZ=QUX");
        assert_eq!(config.len(), 2);
        assert_eq!(config.value_of("FOO"), Some("BAR"));
        assert_eq!(config.value_of("BAZ"), Some("QUX"));
    }

    #[test]
    fn test_migrate_ignores_other_tokens() {
        let config = migrate_arguments("-G Ninja -Wdev -DGOOD:BOOL=ON -DNOEQUALS");
        assert_eq!(config.len(), 1);
        assert_eq!(config.value_of("GOOD"), Some("ON"));
    }

    #[test]
    fn test_migrate_unreadable_yields_nothing() {
        assert!(migrate_arguments("-DA=\"never closed").is_empty());
    }

    #[test]
    fn test_load_legacy_first() {
        let canonical = vec!["FOO:STRING=canonical".to_string(), "broken".to_string()];
        let config = load_persisted_configuration(&canonical, Some("-DFOO=legacy -DOLD=1"));
        assert_eq!(config.keys().collect::<Vec<_>>(), vec!["FOO", "OLD", "FOO"]);
        assert_eq!(config.iter().last().map(|i| i.value.as_str()), Some("canonical"));
    }
}
