//! Basic attacks.
//!
//! Both sides resolve through the same pipeline:
//!
//! 1. attack roll (d20 + bonus vs. defense)
//! 2. on a hit, damage roll (weapon die, crit check, defense reduction)
//! 3. the target's received-damage multiplier, floored at 1
//! 4. any damage wakes a sleeping target
//! 5. health is reduced, the hit is logged, deaths are handled
//! 6. the encounter is checked for a terminal status
//!
//! Outgoing attack power is scaled by the attacker's WEAKEN/STRENGTHEN first.

use crate::combat::{
    AttackResult, AttackRoll, DiceRoll, apply_damage_modifier, calculate_damage,
    dice_for_challenge_rating, hostile_attack_bonus, protagonist_attack_bonus, roll_attack,
};
use crate::env::{Protagonist, RngSource};
use crate::error::CombatError;
use crate::state::{EntityId, StatusEffectKind};

use super::CombatSession;

/// Everything the shared pipeline needs to know about one swing.
struct Swing {
    attacker: EntityId,
    attacker_name: String,
    target: EntityId,
    target_name: String,
    target_defense: u32,
    attack_power: u32,
    weapon: DiceRoll,
    crit_chance: f64,
    crit_multiplier: f64,
}

impl<P, R> CombatSession<'_, P, R>
where
    P: Protagonist + ?Sized,
    R: RngSource,
{
    /// The protagonist attacks a hostile with their weapon.
    ///
    /// Fails if the target is not a living hostile in this encounter or the
    /// encounter is already over.
    pub fn player_attack(&mut self, target: EntityId) -> Result<AttackResult, CombatError> {
        self.ensure_in_progress()?;
        let hostile = self
            .hostile(target)
            .ok_or(CombatError::UnknownCombatant(target))?;

        let swing = Swing {
            attacker: EntityId::PLAYER,
            attacker_name: self.protagonist.name().to_string(),
            target,
            target_name: hostile.name.clone(),
            target_defense: hostile.defense,
            attack_power: self
                .modified_attack_power(EntityId::PLAYER, self.protagonist.attack_power()),
            weapon: self
                .protagonist
                .weapon_dice()
                .unwrap_or(self.config.unarmed_dice),
            crit_chance: self.protagonist.crit_chance(),
            crit_multiplier: self.protagonist.crit_multiplier(),
        };
        let bonus = protagonist_attack_bonus(swing.attack_power, self.protagonist.level());
        let roll = roll_attack(&mut self.rng, bonus, swing.target_defense);

        Ok(self.resolve_swing(swing, roll))
    }

    /// A hostile attacks the protagonist.
    ///
    /// The hostile's weapon die comes from its challenge rating; crit chance
    /// and multiplier are shared by every hostile. Fails if the attacker is
    /// not a living hostile or the encounter is already over.
    pub fn enemy_attack(&mut self, attacker: EntityId) -> Result<AttackResult, CombatError> {
        self.ensure_in_progress()?;
        let hostile = self
            .hostile(attacker)
            .ok_or(CombatError::UnknownCombatant(attacker))?;

        let swing = Swing {
            attacker,
            attacker_name: hostile.name.clone(),
            target: EntityId::PLAYER,
            target_name: self.protagonist.name().to_string(),
            target_defense: self.protagonist.defense(),
            attack_power: self.modified_attack_power(attacker, hostile.attack_power),
            weapon: dice_for_challenge_rating(hostile.challenge_rating),
            crit_chance: self.config.hostile_crit_chance,
            crit_multiplier: self.config.hostile_crit_multiplier,
        };
        let bonus = hostile_attack_bonus(swing.attack_power, hostile.challenge_rating);
        let roll = roll_attack(&mut self.rng, bonus, swing.target_defense);

        Ok(self.resolve_swing(swing, roll))
    }

    fn resolve_swing(&mut self, swing: Swing, roll: AttackRoll) -> AttackResult {
        let Swing {
            attacker,
            attacker_name,
            target,
            target_name,
            ..
        } = &swing;

        if !roll.hit {
            let message = if roll.natural_1 {
                format!("{attacker_name} fumbles the attack against {target_name}!")
            } else {
                format!(
                    "{attacker_name} misses {target_name} ({} vs {}).",
                    roll.total, roll.target_defense
                )
            };
            self.log(message.clone());
            return AttackResult {
                attacker: *attacker,
                target: *target,
                roll,
                damage: None,
                damage_dealt: 0,
                killed: false,
                message,
            };
        }

        let damage = calculate_damage(
            &mut self.rng,
            swing.attack_power,
            Some(swing.weapon),
            swing.target_defense,
            swing.crit_chance,
            swing.crit_multiplier,
            roll.natural_20,
        );
        let dealt = apply_damage_modifier(damage.final_damage, self.damage_received_modifier(*target));

        self.remove_effects_by_type(*target, StatusEffectKind::Sleep);
        let killed = self.apply_hit(*target, dealt);

        let message = if damage.critical {
            format!("Critical hit! {attacker_name} hits {target_name} for {dealt} damage.")
        } else {
            format!("{attacker_name} hits {target_name} for {dealt} damage.")
        };
        self.log(message.clone());

        if killed {
            self.handle_death(*target);
        }
        self.check_combat_end();

        AttackResult {
            attacker: *attacker,
            target: *target,
            roll,
            damage: Some(damage),
            damage_dealt: dealt,
            killed,
            message,
        }
    }
}
