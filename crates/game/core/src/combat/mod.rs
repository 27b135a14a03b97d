//! Combat resolution primitives.
//!
//! Pure functions for attack rolls and damage. Everything random is drawn
//! from the [`RngSource`](crate::env::RngSource) passed in, in a fixed order.
//!
//! # Core Functions
//!
//! - `roll_attack`: d20 + bonus against defense, with natural 1/20 rules
//! - `calculate_damage`: weapon roll, crit check, defense reduction
//! - `apply_damage_modifier`: received-damage scaling, floored at 1
//! - `dice_for_challenge_rating`: hostile weapon dice by CR

pub mod damage;
pub mod dice;
pub mod hit;
pub mod result;

pub use damage::{
    DamageRoll, apply_damage, apply_damage_modifier, calculate_damage, dice_for_challenge_rating,
};
pub use dice::{DiceParseError, DiceRoll};
pub use hit::{AttackRoll, hostile_attack_bonus, protagonist_attack_bonus, roll_attack};
pub use result::{AttackOutcome, AttackResult};
