//! To-hit rolls and attack bonuses.

use crate::env::RngSource;

/// Everything about one d20 attack roll the host needs for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackRoll {
    /// Raw d20 face.
    pub roll: u32,
    pub attack_bonus: u32,
    /// `roll + attack_bonus`.
    pub total: u32,
    pub target_defense: u32,
    pub hit: bool,
    pub natural_20: bool,
    pub natural_1: bool,
}

/// Roll a d20 against a defense value.
///
/// # Formula
///
/// ```text
/// natural 20 => hit
/// natural 1  => miss
/// otherwise  => hit iff roll + attack_bonus >= target_defense
/// ```
pub fn roll_attack<R: RngSource + ?Sized>(
    rng: &mut R,
    attack_bonus: u32,
    target_defense: u32,
) -> AttackRoll {
    let roll = rng.roll_d20();
    let total = roll + attack_bonus;
    let natural_20 = roll == 20;
    let natural_1 = roll == 1;
    let hit = natural_20 || (!natural_1 && total >= target_defense);

    AttackRoll {
        roll,
        attack_bonus,
        total,
        target_defense,
        hit,
        natural_20,
        natural_1,
    }
}

/// `floor(attack_power / 5) + floor(level / 4)`
pub fn protagonist_attack_bonus(attack_power: u32, level: u32) -> u32 {
    attack_power / 5 + level / 4
}

/// `floor(attack_power / 5) + floor(challenge_rating / 4)`
pub fn hostile_attack_bonus(attack_power: u32, challenge_rating: f64) -> u32 {
    attack_power / 5 + (challenge_rating.max(0.0) / 4.0).floor() as u32
}
