//! Configuration merge engine
//!
//! Combines configuration layers into one deterministic result:
//! 1. Kit configuration (base)
//! 2. Build configuration's own items (override)
//! 3. Legacy argument strings from old persisted state (lowest precedence)
//!
//! Every merge deduplicates by key (last occurrence wins) and sorts by key.

mod data_item;
mod legacy;
mod merge;

pub use data_item::{DataItem, DataItemType};
pub use legacy::{load_persisted_configuration, migrate_arguments, split_arguments, LegacyArgsError};
pub use merge::{apply_configuration, dedup, detect_override, merge_layers};
