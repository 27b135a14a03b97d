//! Encounter resolution.
//!
//! The [`CombatSession`] is the single entry point a host loop drives. It owns
//! the [`CombatState`], borrows the protagonist exclusively for the whole
//! encounter and draws every roll from one RNG stream, so the same seed and
//! the same sequence of calls reproduce the same encounter.
//!
//! Operations are split by concern:
//! - `turns`: initiative order, turn advancement, dead-enemy removal
//! - `status`: status-effect application, removal and per-turn ticks
//! - `attack`: basic attacks by either side
//! - `ability`: protagonist abilities

mod ability;
mod attack;
mod status;
mod turns;

pub use status::{EffectApplyResult, TickResult};

use std::collections::BTreeMap;

use crate::config::CombatConfig;
use crate::env::{HostileData, Protagonist, RngSource};
use crate::error::CombatError;
use crate::state::{CombatState, CombatStatus, Combatant, EffectId, EntityId};

/// One encounter between the protagonist and a party of hostiles.
///
/// The protagonist is mutated in place (health, mana, cooldowns, buffs);
/// hostiles are cloned on construction so the caller's list is never touched.
pub struct CombatSession<'a, P, R>
where
    P: Protagonist + ?Sized,
    R: RngSource,
{
    protagonist: &'a mut P,
    /// Living hostiles, in the order they were supplied.
    hostiles: Vec<HostileData>,
    /// Projections keyed by id; the only owner of status effects.
    combatants: BTreeMap<EntityId, Combatant>,
    state: CombatState,
    rng: R,
    config: CombatConfig,
    next_effect_id: EffectId,
    /// Hostiles killed this encounter, in kill order.
    defeated: Vec<HostileData>,
}

impl<'a, P, R> CombatSession<'a, P, R>
where
    P: Protagonist + ?Sized,
    R: RngSource,
{
    /// Starts an encounter with default tuning.
    pub fn new(
        protagonist: &'a mut P,
        hostiles: &[HostileData],
        rng: R,
    ) -> Result<Self, CombatError> {
        Self::with_config(protagonist, hostiles, rng, CombatConfig::default())
    }

    /// Starts an encounter.
    ///
    /// Hostiles already at 0 health are left out. Fails if a hostile reuses
    /// the protagonist's id or another hostile's id.
    pub fn with_config(
        protagonist: &'a mut P,
        hostiles: &[HostileData],
        rng: R,
        config: CombatConfig,
    ) -> Result<Self, CombatError> {
        let mut roster: Vec<HostileData> = Vec::with_capacity(hostiles.len());
        for hostile in hostiles.iter().filter(|h| h.is_alive()) {
            if hostile.id.is_player() || roster.iter().any(|h| h.id == hostile.id) {
                return Err(CombatError::DuplicateCombatant(hostile.id));
            }
            roster.push(hostile.clone());
        }

        let state = CombatState::new(
            std::iter::once((EntityId::PLAYER, protagonist.speed()))
                .chain(roster.iter().map(|h| (h.id, h.speed))),
        );

        let mut session = Self {
            protagonist,
            hostiles: roster,
            combatants: BTreeMap::new(),
            state,
            rng,
            config,
            next_effect_id: EffectId::FIRST,
            defeated: Vec::new(),
        };
        session.refresh_combatants();

        let names: Vec<&str> = session.hostiles.iter().map(|h| h.name.as_str()).collect();
        let opening = format!(
            "{} engages {} in combat!",
            session.protagonist.name(),
            names.join(", ")
        );
        let order: Vec<String> = session
            .state
            .turn_order
            .iter()
            .filter_map(|entry| session.combatants.get(&entry.combatant))
            .map(|c| format!("{} ({})", c.name, c.speed))
            .collect();
        let order = format!("Turn order: {}", order.join(", "));
        tracing::info!(hostiles = session.hostiles.len(), "combat started");
        session.log(opening);
        session.log(order);
        session.check_combat_end();

        Ok(session)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn state(&self) -> &CombatState {
        &self.state
    }

    pub fn status(&self) -> CombatStatus {
        self.state.status
    }

    pub fn is_over(&self) -> bool {
        self.state.status.is_terminal()
    }

    pub fn round(&self) -> u32 {
        self.state.round
    }

    pub fn log_entries(&self) -> &[String] {
        self.state.log.entries()
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn protagonist(&self) -> &P {
        self.protagonist
    }

    /// Hostiles still standing, in their original order.
    pub fn remaining_hostiles(&self) -> &[HostileData] {
        &self.hostiles
    }

    pub fn hostile(&self, id: EntityId) -> Option<&HostileData> {
        self.hostiles.iter().find(|h| h.id == id)
    }

    pub fn combatant(&self, id: EntityId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    /// Every combatant in initiative order.
    pub fn combatants(&self) -> Vec<&Combatant> {
        self.state
            .turn_order
            .iter()
            .filter_map(|entry| self.combatants.get(&entry.combatant))
            .collect()
    }

    /// Hostiles killed so far, in kill order.
    pub fn defeated(&self) -> &[HostileData] {
        &self.defeated
    }

    /// Total experience of every hostile killed so far.
    pub fn experience_earned(&self) -> u32 {
        self.defeated.iter().map(|h| h.experience).sum()
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    // ========================================================================
    // Outer transitions
    // ========================================================================

    /// Ends the encounter with the protagonist escaping.
    ///
    /// Returns false, changing nothing, if the encounter already ended.
    pub fn flee(&mut self) -> bool {
        if !self.state.finish(CombatStatus::Fled) {
            return false;
        }
        let line = format!("{} flees from combat!", self.protagonist.name());
        self.log(line);
        tracing::info!(round = self.state.round, status = %CombatStatus::Fled, "combat finished");
        true
    }

    // ========================================================================
    // Internal bookkeeping
    // ========================================================================

    /// Appends to the combat log and mirrors the line to tracing.
    fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::debug!(target: "combat::log", round = self.state.round, "{line}");
        self.state.log.push(line);
    }

    fn ensure_in_progress(&self) -> Result<(), CombatError> {
        if self.state.status.is_terminal() {
            return Err(CombatError::NotInProgress(self.state.status));
        }
        Ok(())
    }

    /// Re-derives every projection, carrying status effects forward by id.
    fn refresh_combatants(&mut self) {
        let mut previous = std::mem::take(&mut self.combatants);
        let mut carried = |id: EntityId| {
            previous
                .remove(&id)
                .map(|c| c.status_effects)
                .unwrap_or_default()
        };

        let player = Combatant::from_protagonist(&*self.protagonist, carried(EntityId::PLAYER));
        self.combatants.insert(EntityId::PLAYER, player);
        for hostile in &self.hostiles {
            let combatant = Combatant::from_hostile(hostile, carried(hostile.id));
            self.combatants.insert(hostile.id, combatant);
        }
    }

    fn name_of(&self, id: EntityId) -> String {
        if id.is_player() {
            return self.protagonist.name().to_string();
        }
        self.hostile(id)
            .map(|h| h.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Subtracts health from a combatant without touching defense or effects.
    ///
    /// Returns true if the combatant dropped to 0. Death bookkeeping is left
    /// to [`handle_death`](Self::handle_death) so callers can log the hit first.
    fn apply_hit(&mut self, id: EntityId, amount: u32) -> bool {
        let killed = if id.is_player() {
            self.protagonist.take_damage(amount);
            !self.protagonist.is_alive()
        } else {
            match self.hostiles.iter_mut().find(|h| h.id == id) {
                Some(hostile) => {
                    hostile.health = crate::combat::apply_damage(hostile.health, amount);
                    !hostile.is_alive()
                }
                None => false,
            }
        };
        self.refresh_combatants();
        killed
    }

    /// Heals a combatant up to max health. Returns the amount actually healed.
    fn apply_heal(&mut self, id: EntityId, amount: u32) -> u32 {
        let healed = if id.is_player() {
            self.protagonist.heal(amount)
        } else {
            match self.hostiles.iter_mut().find(|h| h.id == id) {
                Some(hostile) => {
                    let before = hostile.health;
                    hostile.health = hostile.health.saturating_add(amount).min(hostile.max_health);
                    hostile.health - before
                }
                None => 0,
            }
        };
        self.refresh_combatants();
        healed
    }

    /// Logs a death and removes dead hostiles. The protagonist is never
    /// removed; its death is reported through the terminal status.
    fn handle_death(&mut self, id: EntityId) {
        if id.is_player() {
            let line = format!("{} has fallen!", self.protagonist.name());
            self.log(line);
            return;
        }
        let line = format!("{} has been defeated!", self.name_of(id));
        self.log(line);
        self.remove_dead_enemy(id);
    }

    /// Sets VICTORY or DEFEAT if the encounter just ended.
    ///
    /// Runs after every health mutation; the first terminal status wins.
    fn check_combat_end(&mut self) -> CombatStatus {
        if self.state.status.is_terminal() {
            return self.state.status;
        }

        let outcome = if !self.protagonist.is_alive() {
            Some((CombatStatus::Defeat, "Defeat... the party has been overwhelmed."))
        } else if self.hostiles.is_empty() {
            Some((CombatStatus::Victory, "Victory! All enemies have been defeated."))
        } else {
            None
        };

        if let Some((status, line)) = outcome {
            self.state.finish(status);
            self.log(line);
            tracing::info!(round = self.state.round, status = %status, "combat finished");
        }
        self.state.status
    }

    /// Attack power after WEAKEN/STRENGTHEN on the attacker.
    fn modified_attack_power(&self, id: EntityId, attack_power: u32) -> u32 {
        let modifier = i64::from(self.effective_attack_modifier(id));
        (i64::from(attack_power) * (100 + modifier) / 100).max(0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Hero;
    use crate::env::PcgRng;

    fn goblin(id: u32, speed: u32) -> HostileData {
        HostileData::new(EntityId(id), format!("Goblin {id}"), 20).with_speed(speed)
    }

    #[test]
    fn hostile_list_is_cloned_not_aliased() {
        let mut hero = Hero::new("Aria", 3, 40, 10).with_stats(12, 10, 25);
        let hostiles = vec![goblin(1, 30)];
        let mut session = CombatSession::new(&mut hero, &hostiles, PcgRng::seeded(1)).unwrap();
        session.apply_hit(EntityId(1), 5);
        assert_eq!(session.hostile(EntityId(1)).map(|h| h.health), Some(15));
        drop(session);
        assert_eq!(hostiles[0].health, 20);
    }

    #[test]
    fn faster_hostile_acts_first() {
        let mut hero = Hero::new("Aria", 3, 40, 10).with_stats(12, 10, 25);
        let session =
            CombatSession::new(&mut hero, &[goblin(1, 30)], PcgRng::seeded(1)).unwrap();
        assert_eq!(session.current_turn().map(|e| e.combatant), Some(EntityId(1)));
        assert_eq!(session.state().turn_order.len(), 2);
    }

    #[test]
    fn dead_and_duplicate_hostiles() {
        let mut hero = Hero::new("Aria", 3, 40, 10);
        let corpse = goblin(2, 10).with_health(0);
        let session =
            CombatSession::new(&mut hero, &[goblin(1, 5), corpse], PcgRng::seeded(1)).unwrap();
        assert_eq!(session.remaining_hostiles().len(), 1);
        drop(session);

        let result = CombatSession::new(&mut hero, &[goblin(1, 5), goblin(1, 6)], PcgRng::seeded(1));
        assert!(matches!(result, Err(CombatError::DuplicateCombatant(EntityId(1)))));
    }

    #[test]
    fn empty_encounter_is_an_immediate_victory() {
        let mut hero = Hero::new("Aria", 3, 40, 10);
        let session = CombatSession::new(&mut hero, &[], PcgRng::seeded(1)).unwrap();
        assert_eq!(session.status(), CombatStatus::Victory);
        assert!(session.current_turn().is_none());
    }

    #[test]
    fn flee_is_terminal_and_exclusive() {
        let mut hero = Hero::new("Aria", 3, 40, 10);
        let mut session = CombatSession::new(&mut hero, &[goblin(1, 5)], PcgRng::seeded(1)).unwrap();
        assert!(session.flee());
        assert!(!session.flee());
        assert_eq!(session.status(), CombatStatus::Fled);
        assert!(session.next_turn().is_none());
        assert!(matches!(
            session.player_attack(EntityId(1)),
            Err(CombatError::NotInProgress(CombatStatus::Fled))
        ));
    }
}
