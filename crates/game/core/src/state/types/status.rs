//! Status effect system for combatants.
//!
//! Status effects are temporary conditions that damage or heal every turn,
//! scale outgoing and incoming damage, or prevent a combatant from acting.
//!
//! # Turn-based Duration
//!
//! Effects store `remaining_turns`. Every tick decrements all effects by one;
//! an effect whose counter reaches 0 has worn off and is removed.
//!
//! # Stacking
//!
//! A combatant carries at most one effect per [`StatusEffectKind`]. Applying a
//! kind that is already present refreshes it to the longer duration and, for
//! per-turn effects, upgrades it to the stronger value.

use crate::state::EffectId;

/// Types of status effects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum StatusEffectKind {
    // ========================================================================
    // Damage over time
    // ========================================================================
    /// Loses a share of max health each turn.
    Poison,
    /// Fire damage scaling with the source's level.
    Burn,
    /// Flat damage each turn.
    Bleed,

    // ========================================================================
    // Incapacitation (cannot act)
    // ========================================================================
    Stun,
    Freeze,
    /// Broken by any incoming damage.
    Sleep,

    // ========================================================================
    // Debuffs
    // ========================================================================
    Slow,
    /// Outgoing attack power reduced.
    Weaken,
    /// Incoming damage increased.
    Vulnerable,

    // ========================================================================
    // Buffs
    // ========================================================================
    Haste,
    /// Outgoing attack power increased.
    Strengthen,
    /// Incoming damage reduced.
    Fortify,

    // ========================================================================
    // Heal over time
    // ========================================================================
    Regeneration,
}

/// Behavioural category of a status effect, derived from its kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusCategory {
    #[strum(serialize = "DOT")]
    DamageOverTime,
    #[strum(serialize = "HOT")]
    HealOverTime,
    #[strum(serialize = "BUFF")]
    Buff,
    #[strum(serialize = "DEBUFF")]
    Debuff,
    #[strum(serialize = "INCAPACITATION")]
    Incapacitation,
}

impl StatusCategory {
    /// DOT and HOT effects carry a `value_per_turn`.
    pub const fn uses_value_per_turn(self) -> bool {
        matches!(self, Self::DamageOverTime | Self::HealOverTime)
    }

    /// Buffs and debuffs carry a `percent_modifier`.
    pub const fn uses_percent_modifier(self) -> bool {
        matches!(self, Self::Buff | Self::Debuff)
    }
}

impl StatusEffectKind {
    pub const fn category(self) -> StatusCategory {
        use StatusEffectKind::*;
        match self {
            Poison | Burn | Bleed => StatusCategory::DamageOverTime,
            Stun | Freeze | Sleep => StatusCategory::Incapacitation,
            Slow | Weaken | Vulnerable => StatusCategory::Debuff,
            Haste | Strengthen | Fortify => StatusCategory::Buff,
            Regeneration => StatusCategory::HealOverTime,
        }
    }

    /// Fixed percent modifier of buffs and debuffs.
    pub const fn percent_modifier(self) -> Option<i32> {
        use StatusEffectKind::*;
        match self {
            Slow => Some(-50),
            Weaken => Some(-25),
            Vulnerable => Some(25),
            Haste => Some(50),
            Strengthen => Some(25),
            Fortify => Some(25),
            Poison | Burn | Bleed | Stun | Freeze | Sleep | Regeneration => None,
        }
    }

    /// Per-turn magnitude before any override.
    ///
    /// Kinds without a per-turn value return 0.
    pub fn base_value(self, target_max_health: u32, source_level: u32) -> u32 {
        use StatusEffectKind::*;
        match self {
            Poison => (target_max_health / 20).max(1),
            Burn => source_level.saturating_mul(2).saturating_add(3),
            Bleed => 5,
            Regeneration => (source_level / 2).saturating_add(5),
            Stun | Freeze | Sleep | Slow | Weaken | Vulnerable | Haste | Strengthen | Fortify => 0,
        }
    }

    /// Adjective used in combat log lines ("is poisoned").
    pub const fn afflicted(self) -> &'static str {
        use StatusEffectKind::*;
        match self {
            Poison => "poisoned",
            Burn => "burning",
            Bleed => "bleeding",
            Stun => "stunned",
            Freeze => "frozen",
            Sleep => "asleep",
            Slow => "slowed",
            Weaken => "weakened",
            Vulnerable => "vulnerable",
            Haste => "hasted",
            Strengthen => "strengthened",
            Fortify => "fortified",
            Regeneration => "regenerating",
        }
    }
}

/// A single status effect instance on a combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub id: EffectId,
    pub kind: StatusEffectKind,
    /// Turns left; 0 means the effect is due for removal.
    pub remaining_turns: u32,
    /// Present only for DOT/HOT kinds.
    pub value_per_turn: Option<u32>,
    /// Present only for buff/debuff kinds.
    pub percent_modifier: Option<i32>,
    /// Who applied the effect, for attribution in the log.
    pub source: String,
    pub source_level: u32,
}

impl StatusEffect {
    pub const fn category(&self) -> StatusCategory {
        self.kind.category()
    }
}

/// Request to apply a status effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectApplication {
    pub kind: StatusEffectKind,
    pub duration: u32,
    pub source: String,
    pub source_level: u32,
    /// Replaces the kind's per-turn formula when set.
    pub value_override: Option<u32>,
}

impl EffectApplication {
    pub fn new(kind: StatusEffectKind, duration: u32) -> Self {
        Self {
            kind,
            duration,
            source: String::from("unknown"),
            source_level: 1,
            value_override: None,
        }
    }

    /// Attributes the effect to a source (builder pattern).
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>, source_level: u32) -> Self {
        self.source = source.into();
        self.source_level = source_level;
        self
    }

    /// Overrides the per-turn value (builder pattern).
    #[must_use]
    pub fn with_value(mut self, value: u32) -> Self {
        self.value_override = Some(value);
        self
    }

    /// Per-turn value this application would carry on the given target.
    pub fn value_for(&self, target_max_health: u32) -> u32 {
        self.value_override
            .unwrap_or_else(|| self.kind.base_value(target_max_health, self.source_level))
    }
}

/// How an application changed the effect list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A new instance was created.
    Added { id: EffectId },
    /// An existing instance of the same kind was refreshed.
    Refreshed {
        id: EffectId,
        /// The per-turn value was replaced by a stronger one.
        upgraded: bool,
    },
}

/// Aggregate result of one per-turn tick, before health is touched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectTick {
    /// Effects as they were when the tick started.
    pub processed: Vec<StatusEffect>,
    pub damage: u32,
    pub healing: u32,
    pub incapacitated: bool,
    /// Effects removed because their duration ran out.
    pub expired: Vec<StatusEffect>,
}

/// Active status effects on a combatant, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub const fn empty() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    /// Returns the active effect of the given kind.
    pub fn get(&self, kind: StatusEffectKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Checks if a specific status effect is active.
    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.get(kind).is_some()
    }

    /// True if any incapacitating effect is active.
    pub fn is_incapacitated(&self) -> bool {
        self.effects
            .iter()
            .any(|e| e.category() == StatusCategory::Incapacitation)
    }

    /// Applies an effect, refreshing or upgrading an existing one of the same kind.
    ///
    /// `next_id` is only advanced when a new instance is created.
    pub fn apply(
        &mut self,
        application: &EffectApplication,
        target_max_health: u32,
        next_id: &mut EffectId,
    ) -> ApplyOutcome {
        let kind = application.kind;
        let category = kind.category();
        let value = application.value_for(target_max_health);

        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.remaining_turns = existing.remaining_turns.max(application.duration);

            let mut upgraded = false;
            if category.uses_value_per_turn() && existing.value_per_turn.is_none_or(|v| value > v)
            {
                existing.value_per_turn = Some(value);
                upgraded = true;
            }
            return ApplyOutcome::Refreshed {
                id: existing.id,
                upgraded,
            };
        }

        let id = next_id.allocate();
        self.effects.push(StatusEffect {
            id,
            kind,
            remaining_turns: application.duration,
            value_per_turn: category.uses_value_per_turn().then_some(value),
            percent_modifier: kind.percent_modifier(),
            source: application.source.clone(),
            source_level: application.source_level,
        });
        ApplyOutcome::Added { id }
    }

    /// Removes one instance by id.
    pub fn remove(&mut self, id: EffectId) -> Option<StatusEffect> {
        let index = self.effects.iter().position(|e| e.id == id)?;
        Some(self.effects.remove(index))
    }

    /// Removes every instance of a kind, returning how many were removed.
    pub fn remove_kind(&mut self, kind: StatusEffectKind) -> usize {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        before - self.effects.len()
    }

    /// Advances every effect by one turn.
    ///
    /// Totals are accumulated from the effects active at the start of the tick;
    /// every effect is then decremented, including ones applied this turn, and
    /// those that reach 0 are removed.
    pub fn tick(&mut self) -> EffectTick {
        let mut tick = EffectTick {
            processed: self.effects.clone(),
            ..EffectTick::default()
        };

        for effect in &self.effects {
            match effect.category() {
                StatusCategory::DamageOverTime => {
                    tick.damage = tick.damage.saturating_add(effect.value_per_turn.unwrap_or(0));
                }
                StatusCategory::HealOverTime => {
                    tick.healing = tick.healing.saturating_add(effect.value_per_turn.unwrap_or(0));
                }
                StatusCategory::Incapacitation => tick.incapacitated = true,
                StatusCategory::Buff | StatusCategory::Debuff => {}
            }
        }

        for effect in &mut self.effects {
            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
        }

        let (expired, active): (Vec<_>, Vec<_>) = std::mem::take(&mut self.effects)
            .into_iter()
            .partition(|e| e.remaining_turns == 0);
        self.effects = active;
        tick.expired = expired;

        tick
    }

    /// Additive sum of WEAKEN and STRENGTHEN percent modifiers.
    pub fn attack_modifier(&self) -> i32 {
        self.effects
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    StatusEffectKind::Weaken | StatusEffectKind::Strengthen
                )
            })
            .filter_map(|e| e.percent_modifier)
            .sum()
    }

    /// Multiplier applied to incoming damage, never below `floor`.
    pub fn damage_received_modifier(&self, floor: f64) -> f64 {
        let mut modifier = 1.0;
        if let Some(percent) = self
            .get(StatusEffectKind::Vulnerable)
            .and_then(|e| e.percent_modifier)
        {
            modifier += f64::from(percent) / 100.0;
        }
        if let Some(percent) = self
            .get(StatusEffectKind::Fortify)
            .and_then(|e| e.percent_modifier)
        {
            modifier -= f64::from(percent) / 100.0;
        }
        modifier.max(floor)
    }

    pub fn as_slice(&self) -> &[StatusEffect] {
        &self.effects
    }

    /// Returns an iterator over all effects in application order.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Returns true if no status effects are active.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn apply(effects: &mut StatusEffects, application: EffectApplication) -> ApplyOutcome {
        let mut next = EffectId(effects.iter().map(|e| e.id.0).max().unwrap_or(0) + 1);
        effects.apply(&application, 100, &mut next)
    }

    #[test]
    fn every_kind_has_exactly_one_consistent_category() {
        for kind in StatusEffectKind::iter() {
            let category = kind.category();
            assert_eq!(
                category.uses_percent_modifier(),
                kind.percent_modifier().is_some(),
                "{kind} percent modifier must match its category"
            );
        }
        assert_eq!(StatusEffectKind::iter().count(), 13);
    }

    #[test]
    fn per_turn_formulas() {
        assert_eq!(StatusEffectKind::Poison.base_value(200, 1), 10);
        assert_eq!(StatusEffectKind::Poison.base_value(10, 1), 1);
        assert_eq!(StatusEffectKind::Burn.base_value(100, 5), 13);
        assert_eq!(StatusEffectKind::Bleed.base_value(100, 9), 5);
        assert_eq!(StatusEffectKind::Regeneration.base_value(100, 5), 7);
        assert_eq!(StatusEffectKind::Haste.base_value(100, 5), 0);
    }

    #[test]
    fn reapplying_refreshes_to_longer_duration() {
        let mut effects = StatusEffects::empty();
        apply(&mut effects, EffectApplication::new(StatusEffectKind::Bleed, 3));
        let outcome = apply(&mut effects, EffectApplication::new(StatusEffectKind::Bleed, 5));

        assert!(matches!(outcome, ApplyOutcome::Refreshed { upgraded: false, .. }));
        assert_eq!(effects.len(), 1);
        assert_eq!(effects.get(StatusEffectKind::Bleed).map(|e| e.remaining_turns), Some(5));

        apply(&mut effects, EffectApplication::new(StatusEffectKind::Bleed, 2));
        assert_eq!(effects.get(StatusEffectKind::Bleed).map(|e| e.remaining_turns), Some(5));
    }

    #[test]
    fn reapplying_upgrades_only_strictly_stronger_values() {
        let mut effects = StatusEffects::empty();
        apply(
            &mut effects,
            EffectApplication::new(StatusEffectKind::Burn, 3).with_source("imp", 1),
        );
        let same = apply(
            &mut effects,
            EffectApplication::new(StatusEffectKind::Burn, 3).with_source("imp", 1),
        );
        assert!(matches!(same, ApplyOutcome::Refreshed { upgraded: false, .. }));

        let stronger = apply(
            &mut effects,
            EffectApplication::new(StatusEffectKind::Burn, 1).with_source("demon", 5),
        );
        assert!(matches!(stronger, ApplyOutcome::Refreshed { upgraded: true, .. }));
        let burn = effects.get(StatusEffectKind::Burn).cloned();
        assert_eq!(burn.as_ref().and_then(|e| e.value_per_turn), Some(13));
        assert_eq!(burn.map(|e| e.remaining_turns), Some(3));
    }

    #[test]
    fn buffs_carry_percent_not_value() {
        let mut effects = StatusEffects::empty();
        apply(&mut effects, EffectApplication::new(StatusEffectKind::Slow, 2));
        let slow = effects.get(StatusEffectKind::Slow).cloned();
        assert_eq!(slow.as_ref().and_then(|e| e.percent_modifier), Some(-50));
        assert_eq!(slow.and_then(|e| e.value_per_turn), None);
    }

    #[test]
    fn vulnerable_and_fortify_cancel_out() {
        let mut effects = StatusEffects::empty();
        apply(&mut effects, EffectApplication::new(StatusEffectKind::Vulnerable, 3));
        apply(&mut effects, EffectApplication::new(StatusEffectKind::Fortify, 3));
        assert_eq!(effects.damage_received_modifier(0.25), 1.0);
    }

    #[test]
    fn damage_received_modifier_respects_floor() {
        let mut effects = StatusEffects::empty();
        apply(&mut effects, EffectApplication::new(StatusEffectKind::Fortify, 3));
        assert_eq!(effects.damage_received_modifier(0.25), 0.75);
        assert_eq!(effects.damage_received_modifier(0.9), 0.9);
    }

    #[test]
    fn attack_modifier_is_additive() {
        let mut effects = StatusEffects::empty();
        apply(&mut effects, EffectApplication::new(StatusEffectKind::Weaken, 3));
        assert_eq!(effects.attack_modifier(), -25);
        apply(&mut effects, EffectApplication::new(StatusEffectKind::Strengthen, 3));
        assert_eq!(effects.attack_modifier(), 0);
        apply(&mut effects, EffectApplication::new(StatusEffectKind::Haste, 3));
        assert_eq!(effects.attack_modifier(), 0);
    }

    #[test]
    fn tick_accumulates_then_expires() {
        let mut effects = StatusEffects::empty();
        apply(&mut effects, EffectApplication::new(StatusEffectKind::Bleed, 1));
        apply(
            &mut effects,
            EffectApplication::new(StatusEffectKind::Regeneration, 2).with_value(4),
        );
        apply(&mut effects, EffectApplication::new(StatusEffectKind::Stun, 1));

        let tick = effects.tick();
        assert_eq!(tick.processed.len(), 3);
        assert_eq!(tick.damage, 5);
        assert_eq!(tick.healing, 4);
        assert!(tick.incapacitated);
        let expired: Vec<_> = tick.expired.iter().map(|e| e.kind).collect();
        assert_eq!(expired, vec![StatusEffectKind::Bleed, StatusEffectKind::Stun]);
        assert_eq!(effects.len(), 1);
        assert!(!effects.is_incapacitated());
    }

    #[test]
    fn extreme_values_saturate() {
        assert_eq!(StatusEffectKind::Burn.base_value(10, u32::MAX), u32::MAX);
        assert_eq!(StatusEffectKind::Regeneration.base_value(10, u32::MAX), u32::MAX / 2 + 5);

        let mut effects = StatusEffects::empty();
        apply(
            &mut effects,
            EffectApplication::new(StatusEffectKind::Burn, 2).with_source("Dragon", u32::MAX),
        );
        apply(
            &mut effects,
            EffectApplication::new(StatusEffectKind::Poison, 2).with_value(u32::MAX),
        );
        let tick = effects.tick();
        assert_eq!(tick.damage, u32::MAX);
    }

    #[test]
    fn removal_is_idempotent() {
        let mut effects = StatusEffects::empty();
        let outcome = apply(&mut effects, EffectApplication::new(StatusEffectKind::Sleep, 2));
        let ApplyOutcome::Added { id } = outcome else {
            panic!("expected a new instance");
        };
        assert!(effects.remove(id).is_some());
        assert!(effects.remove(id).is_none());
        assert_eq!(effects.remove_kind(StatusEffectKind::Sleep), 0);
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("burn".parse::<StatusEffectKind>(), Ok(StatusEffectKind::Burn));
        assert_eq!(StatusEffectKind::Regeneration.to_string(), "Regeneration");
    }
}
