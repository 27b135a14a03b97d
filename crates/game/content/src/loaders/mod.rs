//! Content loaders for reading combat data from files.
//!
//! TOML is used for flat tuning tables, RON for anything with enums.

pub mod abilities;
pub mod bestiary;
pub mod config;

pub use abilities::AbilityCatalog;
pub use bestiary::Bestiary;
pub use config::ConfigLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
