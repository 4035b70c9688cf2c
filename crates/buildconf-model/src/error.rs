//! Error types for the model crate.

/// Errors raised while parsing the string form of a configuration item.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigItemParseError {
    /// No `=` separating key and value.
    #[error("missing '=' in configuration entry: {0}")]
    MissingAssignment(String),

    /// The key part is empty.
    #[error("empty key in configuration entry: {0}")]
    EmptyKey(String),

    /// More than one `:` before the `=`.
    #[error("malformed type annotation in configuration entry: {0}")]
    MalformedType(String),
}
