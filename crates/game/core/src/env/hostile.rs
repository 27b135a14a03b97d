//! Hostile entity data supplied by the host.
//!
//! The host resolves monster data before the encounter starts; the engine
//! clones it and never fetches or caches anything itself.

use crate::state::EntityId;

/// Resolved stat block of one hostile entity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostileData {
    pub id: EntityId,
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub attack_power: u32,
    pub defense: u32,
    /// Experience awarded when defeated.
    pub experience: u32,
    pub challenge_rating: f64,
    /// Free-form creature type ("beast", "undead", ...).
    pub creature_type: String,
    pub speed: u32,
}

impl HostileData {
    /// Creates a full-health hostile with zeroed combat stats.
    pub fn new(id: EntityId, name: impl Into<String>, max_health: u32) -> Self {
        Self {
            id,
            name: name.into(),
            health: max_health,
            max_health,
            attack_power: 0,
            defense: 0,
            experience: 0,
            challenge_rating: 0.0,
            creature_type: String::from("monster"),
            speed: 0,
        }
    }

    #[must_use]
    pub fn with_attack(mut self, attack_power: u32) -> Self {
        self.attack_power = attack_power;
        self
    }

    #[must_use]
    pub fn with_defense(mut self, defense: u32) -> Self {
        self.defense = defense;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_challenge_rating(mut self, challenge_rating: f64) -> Self {
        self.challenge_rating = challenge_rating;
        self
    }

    #[must_use]
    pub fn with_experience(mut self, experience: u32) -> Self {
        self.experience = experience;
        self
    }

    #[must_use]
    pub fn with_creature_type(mut self, creature_type: impl Into<String>) -> Self {
        self.creature_type = creature_type.into();
        self
    }

    #[must_use]
    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health.min(self.max_health);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}
