//! Ability definitions.
//!
//! Every ability resolves as exactly one archetype. The archetype set is
//! closed, so the resolver's `match` covers every case.

use crate::error::AbilityRejection;
use crate::state::EntityId;

/// What an ability does when used.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityEffect {
    /// Heals `percent` of max health.
    SelfHeal { percent: u32 },
    /// Flat attack bonus for `duration` turns.
    AttackBuff { bonus: i32, duration: u32 },
    /// Restores health, mana and every cooldown.
    FullRestore,
    /// Massive defense bonus for `duration` turns.
    Invulnerability { duration: u32 },
    /// Hits every living hostile for `power`% of a basic attack.
    AreaDamage { power: u32 },
    /// Hits one target and heals `heal_percent`% of the damage dealt.
    Drain { power: u32, heal_percent: u32 },
    /// Hits one target, optionally stunning it for the given turns.
    Strike { power: u32, stun: Option<u32> },
    /// No numeric effect.
    Utility,
}

impl AbilityEffect {
    /// True if the ability must be aimed at a single hostile.
    pub const fn needs_target(&self) -> bool {
        matches!(self, Self::Drain { .. } | Self::Strike { .. })
    }

    /// Short tag reported back to the host.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::SelfHeal { .. } => "heal",
            Self::AttackBuff { .. } => "buff",
            Self::FullRestore => "restore",
            Self::Invulnerability { .. } => "invulnerable",
            Self::AreaDamage { .. } => "aoe",
            Self::Drain { .. } => "drain",
            Self::Strike { stun: Some(_), .. } => "stun",
            Self::Strike { stun: None, .. } => "damage",
            Self::Utility => "utility",
        }
    }
}

/// A usable ability known by the protagonist.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub id: String,
    pub name: String,
    pub mana_cost: u32,
    /// Turns before the ability is ready again.
    pub cooldown: u32,
    pub effect: AbilityEffect,
}

impl Ability {
    pub fn new(id: impl Into<String>, name: impl Into<String>, effect: AbilityEffect) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mana_cost: 0,
            cooldown: 0,
            effect,
        }
    }

    #[must_use]
    pub fn with_cost(mut self, mana_cost: u32, cooldown: u32) -> Self {
        self.mana_cost = mana_cost;
        self.cooldown = cooldown;
        self
    }
}

/// Outcome of an ability use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbilityResult {
    pub ability: String,
    pub success: bool,
    pub damage: Option<u32>,
    pub healing: Option<u32>,
    pub effect: Option<&'static str>,
    /// Hostiles killed by this use, in kill order.
    pub killed: Vec<EntityId>,
    pub message: String,
    /// Why the use was refused, when `success` is false.
    pub rejection: Option<AbilityRejection>,
}

impl AbilityResult {
    pub(crate) fn succeeded(ability: &Ability, message: String) -> Self {
        Self {
            ability: ability.name.clone(),
            success: true,
            damage: None,
            healing: None,
            effect: Some(ability.effect.tag()),
            killed: Vec::new(),
            message,
            rejection: None,
        }
    }

    pub(crate) fn rejected(ability: impl Into<String>, rejection: AbilityRejection) -> Self {
        Self {
            ability: ability.into(),
            success: false,
            damage: None,
            healing: None,
            effect: None,
            killed: Vec::new(),
            message: rejection.to_string(),
            rejection: Some(rejection),
        }
    }
}
