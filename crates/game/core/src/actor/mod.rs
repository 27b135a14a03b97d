//! Protagonist-side definitions: abilities and the reference hero.

pub mod ability;
pub mod hero;

pub use ability::{Ability, AbilityEffect, AbilityResult};
pub use hero::{Hero, TimedBuff};
