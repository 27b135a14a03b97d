//! Status effect operations on a live encounter.
//!
//! Effects live on the [`Combatant`](crate::state::Combatant) projections and
//! survive every re-derivation of those projections. Ticks are driven by the
//! host, once per combatant turn, before the combatant acts.

use crate::env::{Protagonist, RngSource};
use crate::state::{
    ApplyOutcome, EffectApplication, EffectId, EntityId, StatusCategory, StatusEffect,
    StatusEffectKind, StatusEffects,
};

use super::CombatSession;

/// Outcome of [`CombatSession::apply_status_effect`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectApplyResult {
    /// False only when the target could not be found.
    pub applied: bool,
    /// An instance of the same kind was already active.
    pub refreshed: bool,
    /// The refresh also raised the per-turn value.
    pub upgraded: bool,
    pub effect_id: Option<EffectId>,
    pub message: String,
}

/// Outcome of one [`CombatSession::process_status_effects`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickResult {
    /// Effects active when the tick started.
    pub processed: Vec<StatusEffect>,
    /// DOT damage dealt.
    pub damage: u32,
    /// HOT healing total.
    pub healing: u32,
    /// Health actually restored after the max-health cap; 0 if DOT killed.
    pub healed: u32,
    /// The combatant loses this turn.
    pub incapacitated: bool,
    /// Effects that wore off during this tick.
    pub expired: Vec<StatusEffect>,
    /// The combatant died from DOT damage.
    pub died: bool,
    /// Log lines produced by this tick, in order.
    pub messages: Vec<String>,
}

impl<P, R> CombatSession<'_, P, R>
where
    P: Protagonist + ?Sized,
    R: RngSource,
{
    // ========================================================================
    // Mutations
    // ========================================================================

    /// Applies a status effect to a combatant.
    ///
    /// A second application of an active kind refreshes the existing instance
    /// instead of stacking. Returns `applied = false` if the target is unknown.
    /// Every call appends its message to the combat log.
    pub fn apply_status_effect(
        &mut self,
        target: EntityId,
        application: EffectApplication,
    ) -> EffectApplyResult {
        let kind = application.kind;
        let Some(combatant) = self.combatants.get_mut(&target) else {
            let message = format!("Cannot apply {kind}: target {target} not found.");
            self.log(message.clone());
            return EffectApplyResult {
                applied: false,
                refreshed: false,
                upgraded: false,
                effect_id: None,
                message,
            };
        };

        let max_health = combatant.max_health;
        let name = combatant.name.clone();
        let outcome =
            combatant
                .status_effects
                .apply(&application, max_health, &mut self.next_effect_id);
        let effect = combatant.status_effects.get(kind).cloned();

        let per_turn = effect
            .as_ref()
            .and_then(|e| e.value_per_turn)
            .map(|v| format!(" ({v} per turn)"))
            .unwrap_or_default();
        let turns = effect.as_ref().map_or(application.duration, |e| e.remaining_turns);

        let (effect_id, refreshed, upgraded, message) = match outcome {
            ApplyOutcome::Added { id } => (
                id,
                false,
                false,
                format!("{name} is {}{per_turn} for {turns} turns.", kind.afflicted()),
            ),
            ApplyOutcome::Refreshed { id, upgraded: true } => (
                id,
                true,
                true,
                format!("{name}'s {kind} intensifies{per_turn} for {turns} turns."),
            ),
            ApplyOutcome::Refreshed { id, upgraded: false } => (
                id,
                true,
                false,
                format!("{name}'s {kind} is refreshed ({turns} turns)."),
            ),
        };

        self.log(message.clone());
        EffectApplyResult {
            applied: true,
            refreshed,
            upgraded,
            effect_id: Some(effect_id),
            message,
        }
    }

    /// Removes one effect instance. Returns false if it was not present.
    pub fn remove_status_effect(&mut self, target: EntityId, effect_id: EffectId) -> bool {
        let Some(combatant) = self.combatants.get_mut(&target) else {
            return false;
        };
        match combatant.status_effects.remove(effect_id) {
            Some(effect) => {
                let line = format!("{}'s {} has been removed.", combatant.name, effect.kind);
                self.log(line);
                true
            }
            None => false,
        }
    }

    /// Removes every effect of one kind. Returns how many were removed.
    pub fn remove_effects_by_type(&mut self, target: EntityId, kind: StatusEffectKind) -> usize {
        let Some(combatant) = self.combatants.get_mut(&target) else {
            return 0;
        };
        let removed = combatant.status_effects.remove_kind(kind);
        if removed > 0 {
            let line = if kind == StatusEffectKind::Sleep {
                format!("{} wakes up!", combatant.name)
            } else {
                format!("{}'s {kind} has been removed.", combatant.name)
            };
            self.log(line);
        }
        removed
    }

    /// Runs one turn of status effects for a combatant.
    ///
    /// Totals come from the effects active at the start of the tick. DOT
    /// damage lands first; a combatant it kills gets no HOT healing and, if
    /// hostile, is removed from the encounter. For the protagonist the tick
    /// also counts down ability cooldowns and timed buffs.
    ///
    /// Returns an empty result for unknown ids or once the encounter is over.
    pub fn process_status_effects(&mut self, id: EntityId) -> TickResult {
        if self.state.status.is_terminal() {
            return TickResult::default();
        }
        let Some(combatant) = self.combatants.get_mut(&id) else {
            return TickResult::default();
        };

        let name = combatant.name.clone();
        let tick = combatant.status_effects.tick();
        let log_start = self.state.log.len();

        for effect in &tick.processed {
            let value = effect.value_per_turn.unwrap_or(0);
            match effect.category() {
                StatusCategory::DamageOverTime => {
                    self.log(format!("{name} takes {value} damage from {}.", effect.kind));
                }
                StatusCategory::HealOverTime => {
                    self.log(format!("{name} regenerates {value} health."));
                }
                StatusCategory::Incapacitation => {
                    self.log(format!(
                        "{name} is {} and cannot act!",
                        effect.kind.afflicted()
                    ));
                }
                StatusCategory::Buff | StatusCategory::Debuff => {}
            }
        }
        for effect in &tick.expired {
            self.log(format!("{name}'s {} has worn off.", effect.kind));
        }

        if id.is_player() {
            for buff in self.protagonist.advance_turn() {
                self.log(format!("{name}'s {buff} has worn off."));
            }
        }

        let mut died = false;
        if tick.damage > 0 && self.apply_hit(id, tick.damage) {
            died = true;
            self.handle_death(id);
        }

        let mut healed = 0;
        if tick.healing > 0 && !died {
            healed = self.apply_heal(id, tick.healing);
        }

        self.refresh_combatants();
        self.check_combat_end();

        TickResult {
            messages: self.state.log.entries()[log_start..].to_vec(),
            processed: tick.processed,
            damage: tick.damage,
            healing: tick.healing,
            healed,
            incapacitated: tick.incapacitated,
            expired: tick.expired,
            died,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Active effects on a combatant, empty for unknown ids.
    pub fn status_effects(&self, id: EntityId) -> &[StatusEffect] {
        static NONE: StatusEffects = StatusEffects::empty();
        self.combatants
            .get(&id)
            .map_or(&NONE, |c| &c.status_effects)
            .as_slice()
    }

    pub fn has_status_effect(&self, id: EntityId, kind: StatusEffectKind) -> bool {
        self.combatants
            .get(&id)
            .is_some_and(|c| c.status_effects.has(kind))
    }

    /// True if the combatant would lose its next turn.
    pub fn is_incapacitated(&self, id: EntityId) -> bool {
        self.combatants
            .get(&id)
            .is_some_and(|c| c.status_effects.is_incapacitated())
    }

    /// Net WEAKEN/STRENGTHEN percentage on outgoing attacks; 0 if unknown.
    pub fn effective_attack_modifier(&self, id: EntityId) -> i32 {
        self.combatants
            .get(&id)
            .map_or(0, |c| c.status_effects.attack_modifier())
    }

    /// Multiplier on incoming damage from VULNERABLE/FORTIFY; 1.0 if unknown.
    pub fn damage_received_modifier(&self, id: EntityId) -> f64 {
        self.combatants.get(&id).map_or(1.0, |c| {
            c.status_effects
                .damage_received_modifier(self.config.min_damage_received)
        })
    }
}
