//! Reference protagonist.
//!
//! A self-contained character sheet implementing [`Protagonist`]. Hosts with
//! their own character model implement the trait directly instead.

use std::collections::BTreeMap;

use crate::actor::Ability;
use crate::combat::DiceRoll;
use crate::env::{Protagonist, StatDeltas};

/// A buff with a turn counter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedBuff {
    pub name: String,
    pub deltas: StatDeltas,
    pub remaining_turns: u32,
}

/// Character sheet for the controlled hero.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hero {
    pub name: String,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub base_attack: u32,
    pub base_defense: u32,
    pub base_speed: u32,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub weapon: Option<DiceRoll>,
    pub abilities: Vec<Ability>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldowns: BTreeMap<String, u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub buffs: Vec<TimedBuff>,
}

impl Hero {
    pub const DEFAULT_CRIT_CHANCE: f64 = 5.0;
    pub const DEFAULT_CRIT_MULTIPLIER: f64 = 2.0;

    /// Creates a hero at full health and mana with no gear.
    pub fn new(name: impl Into<String>, level: u32, max_health: u32, max_mana: u32) -> Self {
        Self {
            name: name.into(),
            level,
            health: max_health,
            max_health,
            mana: max_mana,
            max_mana,
            base_attack: 10,
            base_defense: 10,
            base_speed: 10,
            crit_chance: Self::DEFAULT_CRIT_CHANCE,
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            weapon: None,
            abilities: Vec::new(),
            cooldowns: BTreeMap::new(),
            buffs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_stats(mut self, attack: u32, defense: u32, speed: u32) -> Self {
        self.base_attack = attack;
        self.base_defense = defense;
        self.base_speed = speed;
        self
    }

    #[must_use]
    pub fn with_weapon(mut self, dice: DiceRoll) -> Self {
        self.weapon = Some(dice);
        self
    }

    #[must_use]
    pub fn with_crit(mut self, chance: f64, multiplier: f64) -> Self {
        self.crit_chance = chance;
        self.crit_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn with_abilities(mut self, abilities: Vec<Ability>) -> Self {
        self.abilities = abilities;
        self
    }

    #[must_use]
    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health.min(self.max_health);
        self
    }

    fn buffed(&self, base: u32, delta: impl Fn(&StatDeltas) -> i32) -> u32 {
        let bonus: i64 = self.buffs.iter().map(|b| i64::from(delta(&b.deltas))).sum();
        (i64::from(base) + bonus).max(0) as u32
    }
}

impl Protagonist for Hero {
    fn name(&self) -> &str {
        &self.name
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn health(&self) -> u32 {
        self.health
    }

    fn max_health(&self) -> u32 {
        self.max_health
    }

    fn mana(&self) -> u32 {
        self.mana
    }

    fn max_mana(&self) -> u32 {
        self.max_mana
    }

    fn speed(&self) -> u32 {
        self.buffed(self.base_speed, |d| d.speed)
    }

    fn defense(&self) -> u32 {
        self.buffed(self.base_defense, |d| d.defense)
    }

    fn attack_power(&self) -> u32 {
        self.buffed(self.base_attack, |d| d.attack_power)
    }

    fn crit_chance(&self) -> f64 {
        self.crit_chance
    }

    fn crit_multiplier(&self) -> f64 {
        self.crit_multiplier
    }

    fn weapon_dice(&self) -> Option<DiceRoll> {
        self.weapon
    }

    fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health - before
    }

    fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    fn use_mana(&mut self, amount: u32) -> bool {
        if amount > self.mana {
            return false;
        }
        self.mana -= amount;
        true
    }

    fn restore_mana(&mut self, amount: u32) -> u32 {
        let before = self.mana;
        self.mana = self.mana.saturating_add(amount).min(self.max_mana);
        self.mana - before
    }

    fn apply_buff(&mut self, name: &str, deltas: StatDeltas, duration: u32) {
        // Recasting a buff replaces it rather than stacking.
        self.buffs.retain(|b| b.name != name);
        self.buffs.push(TimedBuff {
            name: name.to_string(),
            deltas,
            remaining_turns: duration,
        });
    }

    fn abilities(&self) -> &[Ability] {
        &self.abilities
    }

    fn cooldown(&self, ability_id: &str) -> u32 {
        self.cooldowns.get(ability_id).copied().unwrap_or(0)
    }

    fn start_cooldown(&mut self, ability_id: &str, turns: u32) {
        if turns == 0 {
            self.cooldowns.remove(ability_id);
        } else {
            self.cooldowns.insert(ability_id.to_string(), turns);
        }
    }

    fn reset_cooldowns(&mut self) {
        self.cooldowns.clear();
    }

    fn advance_turn(&mut self) -> Vec<String> {
        self.cooldowns.retain(|_, turns| {
            *turns = turns.saturating_sub(1);
            *turns > 0
        });

        for buff in &mut self.buffs {
            buff.remaining_turns = buff.remaining_turns.saturating_sub(1);
        }
        let (expired, active): (Vec<_>, Vec<_>) = std::mem::take(&mut self.buffs)
            .into_iter()
            .partition(|b| b.remaining_turns == 0);
        self.buffs = active;
        expired.into_iter().map(|b| b.name).collect()
    }
}
