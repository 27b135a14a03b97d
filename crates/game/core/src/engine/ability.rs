//! Protagonist abilities.
//!
//! A use is validated in a fixed order (known ability, cooldown, mana,
//! target) and any failure is reported in the result without touching state.
//! A valid use pays its mana and starts its cooldown before the effect
//! resolves.
//!
//! Damaging abilities scale one basic-attack roll by their power percentage;
//! they ignore defense but respect the target's received-damage multiplier.

use crate::actor::{Ability, AbilityEffect, AbilityResult};
use crate::combat::apply_damage_modifier;
use crate::env::{Protagonist, RngSource, StatDeltas};
use crate::error::AbilityRejection;
use crate::state::{EffectApplication, EntityId, StatusEffectKind};

use super::CombatSession;

impl<P, R> CombatSession<'_, P, R>
where
    P: Protagonist + ?Sized,
    R: RngSource,
{
    /// Uses one of the protagonist's abilities.
    ///
    /// `target` is required by single-target abilities and ignored by the
    /// rest. Never fails: refusals come back with `success = false` and the
    /// reason in `rejection`.
    pub fn use_ability(&mut self, ability_id: &str, target: Option<EntityId>) -> AbilityResult {
        let ability = match self.validate_ability(ability_id, target) {
            Ok(ability) => ability,
            Err(rejection) => {
                tracing::debug!(ability = ability_id, %rejection, "ability rejected");
                let name = self
                    .protagonist
                    .ability(ability_id)
                    .map_or_else(|| ability_id.to_string(), |a| a.name.clone());
                return AbilityResult::rejected(name, rejection);
            }
        };

        self.protagonist.use_mana(ability.mana_cost);
        self.protagonist.start_cooldown(&ability.id, ability.cooldown);
        tracing::debug!(ability = %ability.id, mana = ability.mana_cost, "ability used");

        let result = match ability.effect {
            AbilityEffect::SelfHeal { percent } => self.resolve_self_heal(&ability, percent),
            AbilityEffect::AttackBuff { bonus, duration } => {
                self.resolve_attack_buff(&ability, bonus, duration)
            }
            AbilityEffect::FullRestore => self.resolve_full_restore(&ability),
            AbilityEffect::Invulnerability { duration } => {
                self.resolve_invulnerability(&ability, duration)
            }
            AbilityEffect::AreaDamage { power } => self.resolve_area_damage(&ability, power),
            AbilityEffect::Drain {
                power,
                heal_percent,
            } => self.resolve_drain(&ability, target, power, heal_percent),
            AbilityEffect::Strike { power, stun } => {
                self.resolve_strike(&ability, target, power, stun)
            }
            AbilityEffect::Utility => {
                let line = format!("{} uses {}.", self.protagonist.name(), ability.name);
                self.log(line.clone());
                AbilityResult::succeeded(&ability, line)
            }
        };

        self.refresh_combatants();
        self.check_combat_end();
        result
    }

    fn validate_ability(
        &self,
        ability_id: &str,
        target: Option<EntityId>,
    ) -> Result<Ability, AbilityRejection> {
        if self.state.status.is_terminal() {
            return Err(AbilityRejection::CombatOver);
        }
        let ability = self
            .protagonist
            .ability(ability_id)
            .ok_or_else(|| AbilityRejection::UnknownAbility(ability_id.to_string()))?;

        let remaining = self.protagonist.cooldown(&ability.id);
        if remaining > 0 {
            return Err(AbilityRejection::OnCooldown {
                name: ability.name.clone(),
                remaining,
            });
        }

        let available = self.protagonist.mana();
        if ability.mana_cost > available {
            return Err(AbilityRejection::InsufficientMana {
                name: ability.name.clone(),
                required: ability.mana_cost,
                available,
            });
        }

        if ability.effect.needs_target() {
            let target = target.ok_or_else(|| AbilityRejection::TargetRequired(ability.name.clone()))?;
            if self.hostile(target).is_none() {
                return Err(AbilityRejection::TargetNotFound(target));
            }
        }

        Ok(ability.clone())
    }

    // ========================================================================
    // Support abilities
    // ========================================================================

    fn resolve_self_heal(&mut self, ability: &Ability, percent: u32) -> AbilityResult {
        let amount = self.protagonist.max_health() * percent / 100;
        let healed = self.apply_heal(EntityId::PLAYER, amount);
        let line = format!(
            "{} uses {} and recovers {healed} health.",
            self.protagonist.name(),
            ability.name
        );
        self.log(line.clone());
        AbilityResult {
            healing: Some(healed),
            ..AbilityResult::succeeded(ability, line)
        }
    }

    fn resolve_attack_buff(&mut self, ability: &Ability, bonus: i32, duration: u32) -> AbilityResult {
        self.protagonist
            .apply_buff(&ability.name, StatDeltas::attack(bonus), duration);
        let line = format!(
            "{} uses {}: {bonus:+} attack for {duration} turns.",
            self.protagonist.name(),
            ability.name
        );
        self.log(line.clone());
        AbilityResult::succeeded(ability, line)
    }

    fn resolve_full_restore(&mut self, ability: &Ability) -> AbilityResult {
        let max_health = self.protagonist.max_health();
        let max_mana = self.protagonist.max_mana();
        let healed = self.apply_heal(EntityId::PLAYER, max_health);
        self.protagonist.restore_mana(max_mana);
        self.protagonist.reset_cooldowns();

        let line = format!(
            "{} uses {} and is fully restored!",
            self.protagonist.name(),
            ability.name
        );
        self.log(line.clone());
        AbilityResult {
            healing: Some(healed),
            ..AbilityResult::succeeded(ability, line)
        }
    }

    fn resolve_invulnerability(&mut self, ability: &Ability, duration: u32) -> AbilityResult {
        let defense = i32::try_from(self.config.invulnerability_defense).unwrap_or(i32::MAX);
        self.protagonist
            .apply_buff(&ability.name, StatDeltas::defense(defense), duration);
        let line = format!(
            "{} uses {} and becomes invulnerable for {duration} turns!",
            self.protagonist.name(),
            ability.name
        );
        self.log(line.clone());
        AbilityResult::succeeded(ability, line)
    }

    // ========================================================================
    // Damaging abilities
    // ========================================================================

    /// One basic-attack roll scaled by `power` percent and the protagonist's
    /// WEAKEN/STRENGTHEN, at least 1.
    fn ability_damage(&mut self, power: u32) -> u32 {
        let basic = self.protagonist.basic_attack(&mut self.rng);
        let scaled = basic.damage * power / 100;
        self.modified_attack_power(EntityId::PLAYER, scaled).max(1)
    }

    /// Lands ability damage on one hostile. Returns damage dealt and whether
    /// the hit was lethal; the caller logs and handles the death.
    fn land_ability_hit(&mut self, target: EntityId, damage: u32) -> (u32, bool) {
        let dealt = apply_damage_modifier(damage, self.damage_received_modifier(target));
        self.remove_effects_by_type(target, StatusEffectKind::Sleep);
        let killed = self.apply_hit(target, dealt);
        (dealt, killed)
    }

    fn resolve_area_damage(&mut self, ability: &Ability, power: u32) -> AbilityResult {
        let damage = self.ability_damage(power);
        let targets: Vec<(EntityId, String)> = self
            .hostiles
            .iter()
            .map(|h| (h.id, h.name.clone()))
            .collect();

        let opening = format!("{} unleashes {}!", self.protagonist.name(), ability.name);
        self.log(opening);

        let mut total = 0;
        let mut killed = Vec::new();
        for (id, name) in &targets {
            let (dealt, lethal) = self.land_ability_hit(*id, damage);
            total += dealt;
            self.log(format!("{} hits {name} for {dealt} damage.", ability.name));
            if lethal {
                self.handle_death(*id);
                killed.push(*id);
            }
        }

        let message = format!(
            "{} dealt {total} damage to {} enemies.",
            ability.name,
            targets.len()
        );
        AbilityResult {
            damage: Some(total),
            killed,
            ..AbilityResult::succeeded(ability, message)
        }
    }

    fn resolve_drain(
        &mut self,
        ability: &Ability,
        target: Option<EntityId>,
        power: u32,
        heal_percent: u32,
    ) -> AbilityResult {
        let Some(target) = target else {
            return AbilityResult::rejected(
                ability.name.clone(),
                AbilityRejection::TargetRequired(ability.name.clone()),
            );
        };
        let target_name = self.name_of(target);
        let damage = self.ability_damage(power);
        let (dealt, lethal) = self.land_ability_hit(target, damage);
        let healed = self.apply_heal(EntityId::PLAYER, dealt * heal_percent / 100);

        let line = format!(
            "{} drains {dealt} health from {target_name} and recovers {healed}.",
            self.protagonist.name()
        );
        self.log(line.clone());
        let mut killed = Vec::new();
        if lethal {
            self.handle_death(target);
            killed.push(target);
        }

        AbilityResult {
            damage: Some(dealt),
            healing: Some(healed),
            killed,
            ..AbilityResult::succeeded(ability, line)
        }
    }

    fn resolve_strike(
        &mut self,
        ability: &Ability,
        target: Option<EntityId>,
        power: u32,
        stun: Option<u32>,
    ) -> AbilityResult {
        let Some(target) = target else {
            return AbilityResult::rejected(
                ability.name.clone(),
                AbilityRejection::TargetRequired(ability.name.clone()),
            );
        };
        let target_name = self.name_of(target);
        let damage = self.ability_damage(power);
        let (dealt, lethal) = self.land_ability_hit(target, damage);

        let line = format!("{} hits {target_name} for {dealt} damage.", ability.name);
        self.log(line.clone());
        let mut killed = Vec::new();
        if lethal {
            self.handle_death(target);
            killed.push(target);
        } else if let Some(turns) = stun {
            let application = EffectApplication::new(StatusEffectKind::Stun, turns)
                .with_source(self.protagonist.name(), self.protagonist.level());
            self.apply_status_effect(target, application);
        }

        AbilityResult {
            damage: Some(dealt),
            killed,
            ..AbilityResult::succeeded(ability, line)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::actor::{Ability, AbilityEffect, Hero};
    use crate::engine::CombatSession;
    use crate::env::{HostileData, Protagonist, ScriptedRng};
    use crate::error::AbilityRejection;
    use crate::state::{CombatStatus, EffectApplication, EntityId, StatusEffectKind};

    fn kit() -> Vec<Ability> {
        vec![
            Ability::new("heal", "Healing Light", AbilityEffect::SelfHeal { percent: 30 })
                .with_cost(5, 2),
            Ability::new(
                "bash",
                "Shield Bash",
                AbilityEffect::Strike {
                    power: 100,
                    stun: Some(1),
                },
            )
            .with_cost(4, 3),
            Ability::new("nova", "Frost Nova", AbilityEffect::AreaDamage { power: 100 })
                .with_cost(8, 0),
            Ability::new(
                "drain",
                "Life Drain",
                AbilityEffect::Drain {
                    power: 100,
                    heal_percent: 50,
                },
            )
            .with_cost(3, 0),
            Ability::new("restore", "Second Wind", AbilityEffect::FullRestore).with_cost(0, 5),
            Ability::new("ward", "Divine Ward", AbilityEffect::Invulnerability { duration: 1 }),
            Ability::new(
                "cry",
                "Battle Cry",
                AbilityEffect::AttackBuff {
                    bonus: 5,
                    duration: 3,
                },
            ),
        ]
    }

    fn hero() -> Hero {
        Hero::new("Aria", 4, 100, 20)
            .with_stats(10, 10, 25)
            .with_abilities(kit())
    }

    fn wolf(id: u32, health: u32) -> HostileData {
        HostileData::new(EntityId(id), format!("Wolf {id}"), 50)
            .with_health(health)
            .with_speed(10)
            .with_experience(25)
    }

    #[test]
    fn self_heal_spends_mana_and_starts_cooldown() {
        let mut hero = hero().with_health(50);
        let mut session =
            CombatSession::new(&mut hero, &[wolf(1, 50)], ScriptedRng::new(vec![0])).unwrap();

        let result = session.use_ability("heal", None);
        assert!(result.success);
        assert_eq!(result.healing, Some(30));
        assert_eq!(result.effect, Some("heal"));
        assert_eq!(session.protagonist().mana(), 15);
        assert_eq!(session.protagonist().cooldown("heal"), 2);

        let again = session.use_ability("heal", None);
        assert!(!again.success);
        assert!(matches!(
            again.rejection,
            Some(AbilityRejection::OnCooldown { remaining: 2, .. })
        ));
        assert_eq!(session.protagonist().mana(), 15);
        assert_eq!(session.protagonist().health(), 80);
    }

    #[test]
    fn rejections_leave_state_untouched() {
        let mut hero = hero();
        hero.mana = 2;
        let mut session =
            CombatSession::new(&mut hero, &[wolf(1, 50)], ScriptedRng::new(vec![0])).unwrap();
        let log_len = session.log_entries().len();

        let unknown = session.use_ability("meteor", None);
        assert_eq!(
            unknown.rejection,
            Some(AbilityRejection::UnknownAbility("meteor".into()))
        );
        let broke = session.use_ability("bash", Some(EntityId(1)));
        assert!(matches!(
            broke.rejection,
            Some(AbilityRejection::InsufficientMana {
                required: 4,
                available: 2,
                ..
            })
        ));

        session.protagonist.mana = 20;
        let untargeted = session.use_ability("bash", None);
        assert!(matches!(
            untargeted.rejection,
            Some(AbilityRejection::TargetRequired(_))
        ));
        let missing = session.use_ability("bash", Some(EntityId(7)));
        assert_eq!(
            missing.rejection,
            Some(AbilityRejection::TargetNotFound(EntityId(7)))
        );

        assert_eq!(session.protagonist().mana(), 20);
        assert_eq!(session.protagonist().cooldown("bash"), 0);
        assert_eq!(session.log_entries().len(), log_len);
        assert_eq!(session.rng().draws(), 0);
    }

    #[test]
    fn strike_stuns_a_survivor() {
        let mut hero = hero();
        // unarmed 1d4 = 3, + 10/2
        let mut session =
            CombatSession::new(&mut hero, &[wolf(1, 50)], ScriptedRng::die_faces(&[3])).unwrap();

        let result = session.use_ability("bash", Some(EntityId(1)));
        assert!(result.success);
        assert_eq!(result.damage, Some(8));
        assert_eq!(session.hostile(EntityId(1)).map(|h| h.health), Some(42));
        assert!(session.has_status_effect(EntityId(1), StatusEffectKind::Stun));
        assert!(session.is_incapacitated(EntityId(1)));
    }

    #[test]
    fn attack_modifiers_scale_ability_damage() {
        let mut hero = hero();
        let rng = ScriptedRng::die_faces(&[3, 3]);
        let mut session = CombatSession::new(&mut hero, &[wolf(1, 50)], rng).unwrap();
        session.apply_status_effect(
            EntityId::PLAYER,
            EffectApplication::new(StatusEffectKind::Strengthen, 3),
        );

        // 8 * 1.25
        let result = session.use_ability("bash", Some(EntityId(1)));
        assert_eq!(result.damage, Some(10));
        assert_eq!(session.hostile(EntityId(1)).map(|h| h.health), Some(40));

        session.remove_effects_by_type(EntityId::PLAYER, StatusEffectKind::Strengthen);
        session.apply_status_effect(
            EntityId::PLAYER,
            EffectApplication::new(StatusEffectKind::Weaken, 3),
        );
        session.protagonist.start_cooldown("bash", 0);
        // 8 * 0.75
        let result = session.use_ability("bash", Some(EntityId(1)));
        assert_eq!(result.damage, Some(6));
    }

    #[test]
    fn area_damage_kills_several_and_reports_them_in_order() {
        let mut hero = hero();
        let pack = [wolf(1, 5), wolf(2, 50), wolf(3, 8)];
        let mut session =
            CombatSession::new(&mut hero, &pack, ScriptedRng::die_faces(&[3])).unwrap();

        let result = session.use_ability("nova", None);
        assert_eq!(result.killed, vec![EntityId(1), EntityId(3)]);
        assert_eq!(result.damage, Some(24));
        assert_eq!(session.remaining_hostiles().len(), 1);
        assert_eq!(session.status(), CombatStatus::InProgress);
        assert_eq!(session.experience_earned(), 50);
        assert_eq!(session.defeated().len(), 2);
    }

    #[test]
    fn drain_heals_half_the_damage_dealt() {
        let mut hero = hero().with_health(60);
        let mut session =
            CombatSession::new(&mut hero, &[wolf(1, 50)], ScriptedRng::die_faces(&[3])).unwrap();

        let result = session.use_ability("drain", Some(EntityId(1)));
        assert_eq!(result.damage, Some(8));
        assert_eq!(result.healing, Some(4));
        assert_eq!(session.protagonist().health(), 64);
    }

    #[test]
    fn full_restore_resets_every_cooldown() {
        let mut hero = hero().with_health(10);
        hero.mana = 5;
        let mut session =
            CombatSession::new(&mut hero, &[wolf(1, 50)], ScriptedRng::new(vec![0])).unwrap();
        session.use_ability("heal", None);
        assert_eq!(session.protagonist().cooldown("heal"), 2);

        let result = session.use_ability("restore", None);
        assert!(result.success);
        assert_eq!(session.protagonist().health(), 100);
        assert_eq!(session.protagonist().mana(), 20);
        assert_eq!(session.protagonist().cooldown("heal"), 0);
        assert_eq!(session.protagonist().cooldown("restore"), 0);
    }

    #[test]
    fn buffs_change_effective_stats() {
        let mut hero = hero();
        let mut session =
            CombatSession::new(&mut hero, &[wolf(1, 50)], ScriptedRng::new(vec![0])).unwrap();

        session.use_ability("ward", None);
        assert_eq!(session.protagonist().defense(), 10 + 999);
        assert_eq!(session.combatant(EntityId::PLAYER).map(|c| c.defense), Some(1009));

        session.use_ability("cry", None);
        assert_eq!(session.protagonist().attack_power(), 15);
    }

    #[test]
    fn abilities_are_refused_after_combat() {
        let mut hero = hero();
        let mut session =
            CombatSession::new(&mut hero, &[wolf(1, 50)], ScriptedRng::new(vec![0])).unwrap();
        session.flee();
        let result = session.use_ability("heal", None);
        assert_eq!(result.rejection, Some(AbilityRejection::CombatOver));
    }
}
