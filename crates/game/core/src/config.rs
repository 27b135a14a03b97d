use crate::combat::DiceRoll;

/// Combat tuning constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Die rolled for attackers without a weapon.
    pub unarmed_dice: DiceRoll,
    /// Crit chance (percent) for every hostile attacker.
    pub hostile_crit_chance: f64,
    /// Crit multiplier for every hostile attacker.
    pub hostile_crit_multiplier: f64,
    /// Lower bound of the damage-received multiplier.
    pub min_damage_received: f64,
    /// Flat defense granted by invulnerability abilities.
    pub invulnerability_defense: u32,
}

impl CombatConfig {
    // ===== defaults =====
    pub const DEFAULT_UNARMED_DICE: DiceRoll = DiceRoll::new(1, 4);
    pub const DEFAULT_HOSTILE_CRIT_CHANCE: f64 = 10.0;
    pub const DEFAULT_HOSTILE_CRIT_MULTIPLIER: f64 = 1.5;
    pub const DEFAULT_MIN_DAMAGE_RECEIVED: f64 = 0.25;
    pub const DEFAULT_INVULNERABILITY_DEFENSE: u32 = 999;

    pub fn new() -> Self {
        Self {
            unarmed_dice: Self::DEFAULT_UNARMED_DICE,
            hostile_crit_chance: Self::DEFAULT_HOSTILE_CRIT_CHANCE,
            hostile_crit_multiplier: Self::DEFAULT_HOSTILE_CRIT_MULTIPLIER,
            min_damage_received: Self::DEFAULT_MIN_DAMAGE_RECEIVED,
            invulnerability_defense: Self::DEFAULT_INVULNERABILITY_DEFENSE,
        }
    }

    #[must_use]
    pub fn with_unarmed_dice(mut self, dice: DiceRoll) -> Self {
        self.unarmed_dice = dice;
        self
    }

    #[must_use]
    pub fn with_hostile_crit(mut self, chance: f64, multiplier: f64) -> Self {
        self.hostile_crit_chance = chance;
        self.hostile_crit_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn with_min_damage_received(mut self, floor: f64) -> Self {
        self.min_damage_received = floor;
        self
    }

    #[must_use]
    pub fn with_invulnerability_defense(mut self, defense: u32) -> Self {
        self.invulnerability_defense = defense;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
