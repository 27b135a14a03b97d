//! Uniform in-combat view of the protagonist and hostiles.

use super::{EntityId, StatusEffects};
use crate::env::{HostileData, Protagonist};

/// Which side a combatant is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantKind {
    Protagonist,
    Hostile,
}

/// Projection of one participant.
///
/// Stats are re-derived from the underlying protagonist or hostile whenever
/// they change; `status_effects` is the only field owned by the projection
/// itself and is carried across re-derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: EntityId,
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub speed: u32,
    pub defense: u32,
    pub kind: CombatantKind,
    pub status_effects: StatusEffects,
}

impl Combatant {
    pub fn from_protagonist(protagonist: &(impl Protagonist + ?Sized), effects: StatusEffects) -> Self {
        Self {
            id: EntityId::PLAYER,
            name: protagonist.name().to_string(),
            health: protagonist.health(),
            max_health: protagonist.max_health(),
            speed: protagonist.speed(),
            defense: protagonist.defense(),
            kind: CombatantKind::Protagonist,
            status_effects: effects,
        }
    }

    pub fn from_hostile(hostile: &HostileData, effects: StatusEffects) -> Self {
        Self {
            id: hostile.id,
            name: hostile.name.clone(),
            health: hostile.health,
            max_health: hostile.max_health,
            speed: hostile.speed,
            defense: hostile.defense,
            kind: CombatantKind::Hostile,
            status_effects: effects,
        }
    }

    pub fn is_player(&self) -> bool {
        self.kind == CombatantKind::Protagonist
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}
