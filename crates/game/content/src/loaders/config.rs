//! Combat tuning loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load tuning from a TOML file.
    ///
    /// Missing keys fall back to [`CombatConfig::default`], so a file only
    /// needs the values it changes.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML {}: {}", path.display(), e))
    }

    /// Parse tuning from TOML text.
    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !(0.0..=1.0).contains(&config.min_damage_received) {
            anyhow::bail!(
                "min_damage_received must be within 0.0..=1.0, got {}",
                config.min_damage_received
            );
        }
        if !(0.0..=100.0).contains(&config.hostile_crit_chance) {
            anyhow::bail!(
                "hostile_crit_chance must be a percentage, got {}",
                config.hostile_crit_chance
            );
        }
        Ok(config)
    }
}
