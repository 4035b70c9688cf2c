//! Build configuration model types
//!
//! Defines the cache-entry level data model exchanged between the build
//! configuration core and the generator backend.

pub mod error;
pub mod item;
pub mod target;

pub use error::ConfigItemParseError;
pub use item::{ConfigItem, Configuration, ItemType, ValueExpander};
pub use target::{BuildTarget, TargetType};

/// Cache key holding the generator's build type.
pub const BUILD_TYPE_KEY: &str = "CMAKE_BUILD_TYPE";
