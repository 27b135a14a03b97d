//! Data-driven combat content and loaders.
//!
//! This crate turns data files into `combat-core` types:
//! - Combat tuning (data-driven via TOML)
//! - Ability catalogs (data-driven via RON, with an embedded default catalog)
//! - Hostile bestiaries (data-driven via RON)
//!
//! Content is resolved before an encounter starts and handed to the session;
//! the engine itself never reads files.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{AbilityCatalog, Bestiary, ConfigLoader, LoadResult};
