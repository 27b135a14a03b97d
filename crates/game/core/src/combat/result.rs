//! Attack result types.

use super::damage::DamageRoll;
use super::hit::AttackRoll;
use crate::state::EntityId;

/// Outcome of an attack attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    /// Attack missed the target.
    Miss,
    /// Attack hit the target.
    Hit,
    /// Critical hit.
    Critical,
}

/// Result of a basic attack, by either side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackResult {
    pub attacker: EntityId,
    pub target: EntityId,
    pub roll: AttackRoll,
    /// Damage breakdown (None if miss).
    pub damage: Option<DamageRoll>,
    /// Health actually removed after received-damage modifiers.
    pub damage_dealt: u32,
    pub killed: bool,
    pub message: String,
}

impl AttackResult {
    pub fn outcome(&self) -> AttackOutcome {
        match self.damage {
            None => AttackOutcome::Miss,
            Some(damage) if damage.critical => AttackOutcome::Critical,
            Some(_) => AttackOutcome::Hit,
        }
    }

    pub fn hit(&self) -> bool {
        self.roll.hit
    }
}
