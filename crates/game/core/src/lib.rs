//! Deterministic turn-based combat resolution.
//!
//! `combat-core` resolves encounters between one protagonist and a party of
//! hostiles: initiative order, d20 attack and damage rolls, status effects and
//! protagonist abilities. Everything random is drawn from one injected
//! [`env::RngSource`], so a seed plus a call sequence replays exactly.
//!
//! All state mutation flows through [`engine::CombatSession`]. The host loop
//! decides who acts; the session tells it whose turn it is and resolves the
//! action it picks.
pub mod actor;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;

pub use actor::{Ability, AbilityEffect, AbilityResult, Hero, TimedBuff};
pub use combat::{
    AttackOutcome, AttackResult, AttackRoll, DamageRoll, DiceParseError, DiceRoll,
};
pub use config::CombatConfig;
pub use engine::{CombatSession, EffectApplyResult, TickResult};
pub use env::{
    BasicAttack, HostileData, PcgRng, Protagonist, RngSource, ScriptedRng, StatDeltas,
};
pub use error::{AbilityRejection, CombatError, ErrorSeverity, GameError};
pub use state::{
    CombatLog, CombatState, CombatStatus, Combatant, CombatantKind, EffectApplication, EffectId,
    EntityId, StatusCategory, StatusEffect, StatusEffectKind, StatusEffects, TurnEntry,
};
