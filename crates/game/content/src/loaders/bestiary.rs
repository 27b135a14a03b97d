//! Hostile stat block loader.

use std::path::Path;

use combat_core::{EntityId, HostileData};

use crate::loaders::{LoadResult, read_file};

/// Catalog of hostile stat blocks.
#[derive(Debug, Clone, Default)]
pub struct Bestiary {
    entries: Vec<HostileData>,
}

impl Bestiary {
    /// Loads the embedded default bestiary.
    pub fn load() -> LoadResult<Self> {
        Self::parse(include_str!("../../data/bestiary.ron"))
            .map_err(|e| anyhow::anyhow!("Failed to load default bestiary.ron: {}", e))
    }

    /// Loads a bestiary from a RON file.
    ///
    /// RON format: `Vec<HostileData>`
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load bestiary {}: {}", path.display(), e))
    }

    /// Parses a bestiary from RON text.
    pub fn parse(content: &str) -> LoadResult<Self> {
        let entries: Vec<HostileData> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse bestiary RON: {}", e))?;

        for (index, entry) in entries.iter().enumerate() {
            if entry.id.is_player() {
                anyhow::bail!("'{}' uses the reserved protagonist id", entry.name);
            }
            if entries[..index].iter().any(|e| e.id == entry.id) {
                anyhow::bail!("duplicate hostile id {}", entry.id);
            }
            if entry.health > entry.max_health {
                anyhow::bail!(
                    "'{}' has health {} above max_health {}",
                    entry.name,
                    entry.health,
                    entry.max_health
                );
            }
        }

        tracing::debug!(count = entries.len(), "bestiary loaded");
        Ok(Self { entries })
    }

    pub fn get(&self, id: EntityId) -> Option<&HostileData> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Looks up a stat block by name, ignoring ASCII case.
    pub fn by_name(&self, name: &str) -> Option<&HostileData> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Clones a stat block under a fresh id, for encounters with several
    /// copies of the same creature.
    pub fn spawn(&self, name: &str, id: EntityId) -> Option<HostileData> {
        self.by_name(name).map(|template| HostileData {
            id,
            ..template.clone()
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &HostileData> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
