//! Damage calculation and application.

use crate::combat::DiceRoll;
use crate::config::CombatConfig;
use crate::env::RngSource;

/// Breakdown of one damage calculation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRoll {
    pub weapon_roll: u32,
    /// Damage before defense, after the crit multiplier.
    pub base_damage: u32,
    pub critical: bool,
    pub damage_reduction: u32,
    pub final_damage: u32,
}

/// Calculate damage for a confirmed hit.
///
/// # Formula
///
/// ```text
/// base_damage = weapon_roll + floor(attack_power / 2)
/// critical    = natural_20 || d100 <= crit_chance
/// if critical:
///     base_damage = floor(base_damage * crit_multiplier)
/// reduction   = floor(target_defense / 2)
/// final       = max(1, base_damage - reduction)
/// ```
///
/// The d100 is only drawn when the attack roll was not a natural 20. Without
/// a weapon the unarmed die is rolled.
pub fn calculate_damage<R: RngSource + ?Sized>(
    rng: &mut R,
    attack_power: u32,
    weapon: Option<DiceRoll>,
    target_defense: u32,
    crit_chance: f64,
    crit_multiplier: f64,
    natural_20: bool,
) -> DamageRoll {
    let weapon_roll = weapon
        .unwrap_or(CombatConfig::DEFAULT_UNARMED_DICE)
        .roll(rng);
    let mut base_damage = weapon_roll + attack_power / 2;

    let critical = natural_20 || f64::from(rng.roll_d100()) <= crit_chance;
    if critical {
        base_damage = (f64::from(base_damage) * crit_multiplier).floor() as u32;
    }

    let damage_reduction = target_defense / 2;
    let final_damage = base_damage.saturating_sub(damage_reduction).max(1);

    DamageRoll {
        weapon_roll,
        base_damage,
        critical,
        damage_reduction,
        final_damage,
    }
}

/// Scale damage by a received-damage multiplier, never below 1.
pub fn apply_damage_modifier(damage: u32, modifier: f64) -> u32 {
    ((f64::from(damage) * modifier).floor() as u32).max(1)
}

/// Apply damage to current HP, clamped to 0.
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

/// Weapon dice for a hostile of the given challenge rating.
pub fn dice_for_challenge_rating(challenge_rating: f64) -> DiceRoll {
    const TABLE: [(f64, DiceRoll); 7] = [
        (0.5, DiceRoll::new(1, 4)),
        (1.0, DiceRoll::new(1, 6)),
        (2.0, DiceRoll::new(1, 8)),
        (4.0, DiceRoll::new(1, 10)),
        (8.0, DiceRoll::new(2, 6)),
        (12.0, DiceRoll::new(2, 8)),
        (16.0, DiceRoll::new(2, 10)),
    ];

    TABLE
        .iter()
        .find(|(threshold, _)| challenge_rating <= *threshold)
        .map(|(_, dice)| *dice)
        .unwrap_or(DiceRoll::new(2, 12))
}
