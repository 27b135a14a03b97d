//! Ability catalog loader.
//!
//! Loads ability definitions from RON data files and provides lookup by id.

use std::path::Path;

use combat_core::Ability;

use crate::loaders::{LoadResult, read_file};

/// Registry of ability definitions, in file order.
#[derive(Debug, Clone, Default)]
pub struct AbilityCatalog {
    abilities: Vec<Ability>,
}

impl AbilityCatalog {
    /// Loads the embedded default catalog.
    pub fn load() -> LoadResult<Self> {
        Self::parse(include_str!("../../data/abilities.ron"))
            .map_err(|e| anyhow::anyhow!("Failed to load default abilities.ron: {}", e))
    }

    /// Loads a catalog from a RON file.
    ///
    /// RON format: `Vec<Ability>`
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load ability catalog {}: {}", path.display(), e))
    }

    /// Parses a catalog from RON text. Ability ids must be unique.
    pub fn parse(content: &str) -> LoadResult<Self> {
        let abilities: Vec<Ability> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;

        for (index, ability) in abilities.iter().enumerate() {
            if abilities[..index].iter().any(|a| a.id == ability.id) {
                anyhow::bail!("duplicate ability id '{}'", ability.id);
            }
        }

        tracing::debug!(count = abilities.len(), "ability catalog loaded");
        Ok(Self { abilities })
    }

    /// Gets an ability by id.
    pub fn get(&self, id: &str) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.id == id)
    }

    /// Clones the named abilities, in the order given, for a hero's kit.
    ///
    /// Fails on the first id that is not in the catalog.
    pub fn kit(&self, ids: &[&str]) -> LoadResult<Vec<Ability>> {
        ids.iter()
            .map(|id| {
                self.get(id)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("unknown ability id '{}'", id))
            })
            .collect()
    }

    /// Returns an iterator over all abilities in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Ability> {
        self.abilities.iter()
    }

    /// Returns the number of registered abilities.
    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    /// Returns true if no abilities are registered.
    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use combat_core::AbilityEffect;

    use super::*;

    #[test]
    fn default_catalog_covers_every_archetype() {
        let catalog = AbilityCatalog::load().expect("Failed to load default catalog");
        assert_eq!(catalog.len(), 9);

        let tags: Vec<&str> = catalog.iter().map(|a| a.effect.tag()).collect();
        for tag in [
            "heal", "buff", "restore", "invulnerable", "aoe", "drain", "damage", "stun", "utility",
        ] {
            assert!(tags.contains(&tag), "missing archetype {tag}");
        }

        let bash = catalog.get("shield_bash").unwrap();
        assert_eq!(
            bash.effect,
            AbilityEffect::Strike {
                power: 80,
                stun: Some(1)
            }
        );
        assert_eq!(bash.mana_cost, 4);
    }

    #[test]
    fn kit_preserves_requested_order() {
        let catalog = AbilityCatalog::load().unwrap();
        let kit = catalog.kit(&["whirlwind", "second_wind"]).unwrap();
        let ids: Vec<&str> = kit.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["whirlwind", "second_wind"]);
        assert!(catalog.kit(&["meteor"]).is_err());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[(id: "zap", name: "Zap", mana_cost: 2, cooldown: 0, effect: Strike(power: 100, stun: None))]"#
        )
        .unwrap();

        let catalog = AbilityCatalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("zap").map(|a| a.name.as_str()), Some("Zap"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let ron = r#"[
            (id: "zap", name: "Zap", mana_cost: 2, cooldown: 0, effect: Utility),
            (id: "zap", name: "Zap Again", mana_cost: 2, cooldown: 0, effect: Utility),
        ]"#;
        let err = AbilityCatalog::parse(ron).unwrap_err();
        assert!(err.to_string().contains("duplicate ability id 'zap'"));
    }
}
