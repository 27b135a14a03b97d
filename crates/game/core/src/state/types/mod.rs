pub mod combatant;
pub mod common;
pub mod status;
pub mod turn;

pub use combatant::{Combatant, CombatantKind};
pub use common::{EffectId, EntityId};
pub use status::{
    ApplyOutcome, EffectApplication, EffectTick, StatusCategory, StatusEffect, StatusEffectKind,
    StatusEffects,
};
pub use turn::{CombatLog, CombatState, CombatStatus, TurnEntry};
