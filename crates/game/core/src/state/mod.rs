//! Authoritative encounter state.
//!
//! This module owns the data structures describing combatants, their status
//! effects and turn bookkeeping. Hosts read this state but mutate it
//! exclusively through the combat session.
pub mod types;

pub use types::{
    ApplyOutcome, CombatLog, CombatState, CombatStatus, Combatant, CombatantKind, EffectApplication,
    EffectId, EffectTick, EntityId, StatusCategory, StatusEffect, StatusEffectKind, StatusEffects,
    TurnEntry,
};
