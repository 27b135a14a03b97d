//! The protagonist collaborator.
//!
//! The host owns the protagonist; a combat session borrows it mutably for the
//! whole encounter and is the only writer while it lives.

use crate::actor::Ability;
use crate::combat::DiceRoll;
use crate::config::CombatConfig;
use crate::env::RngSource;

/// Temporary stat changes granted by a buff.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatDeltas {
    pub attack_power: i32,
    pub defense: i32,
    pub speed: i32,
}

impl StatDeltas {
    pub const fn attack(amount: i32) -> Self {
        Self {
            attack_power: amount,
            defense: 0,
            speed: 0,
        }
    }

    pub const fn defense(amount: i32) -> Self {
        Self {
            attack_power: 0,
            defense: amount,
            speed: 0,
        }
    }
}

/// Outcome of the protagonist's plain weapon swing, used to scale abilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BasicAttack {
    pub damage: u32,
}

/// Everything the engine needs from the controlled character.
pub trait Protagonist {
    fn name(&self) -> &str;
    fn level(&self) -> u32;

    fn health(&self) -> u32;
    fn max_health(&self) -> u32;
    fn mana(&self) -> u32;
    fn max_mana(&self) -> u32;

    /// Effective stats, including active buffs.
    fn speed(&self) -> u32;
    fn defense(&self) -> u32;
    fn attack_power(&self) -> u32;
    /// Percent chance (0-100) of a critical hit.
    fn crit_chance(&self) -> f64;
    fn crit_multiplier(&self) -> f64;
    /// Equipped weapon dice, `None` when unarmed.
    fn weapon_dice(&self) -> Option<DiceRoll>;

    /// Restores health up to the maximum. Returns the amount actually healed.
    fn heal(&mut self, amount: u32) -> u32;
    /// Subtracts health directly, floored at 0. Defense is not applied here.
    fn take_damage(&mut self, amount: u32);
    /// Spends mana. Returns false, spending nothing, if there is not enough.
    fn use_mana(&mut self, amount: u32) -> bool;
    /// Restores mana up to the maximum. Returns the amount actually restored.
    fn restore_mana(&mut self, amount: u32) -> u32;
    fn apply_buff(&mut self, name: &str, deltas: StatDeltas, duration: u32);

    fn abilities(&self) -> &[Ability];
    /// Turns until the ability can be used again; 0 means ready.
    fn cooldown(&self, ability_id: &str) -> u32;
    fn start_cooldown(&mut self, ability_id: &str, turns: u32);
    fn reset_cooldowns(&mut self);

    /// Called once at the start of each of the protagonist's turns. Ticks
    /// cooldowns and buffs down and returns the names of buffs that ran out.
    fn advance_turn(&mut self) -> Vec<String>;

    fn is_alive(&self) -> bool {
        self.health() > 0
    }

    fn ability(&self, id: &str) -> Option<&Ability> {
        self.abilities().iter().find(|ability| ability.id == id)
    }

    /// Weapon roll plus half the attack power.
    fn basic_attack(&self, rng: &mut dyn RngSource) -> BasicAttack {
        let dice = self
            .weapon_dice()
            .unwrap_or(CombatConfig::DEFAULT_UNARMED_DICE);
        BasicAttack {
            damage: dice.roll(rng) + self.attack_power() / 2,
        }
    }
}
