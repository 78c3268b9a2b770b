//! Content loaders for reading combat data from files.
//!
//! Each loader reads one file format and hands back core types; the
//! [`ContentFactory`] knows where those files live inside a data directory.

pub mod bestiary;
pub mod config;
pub mod factory;
pub mod scenario;
pub mod tables;

pub use bestiary::{Bestiary, BestiaryLoader, CreatureSpec};
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use scenario::{Scenario, ScenarioLoader};
pub use tables::{TablesLoader, TablesSpec};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
