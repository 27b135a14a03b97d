//! Collaborators the engine consumes but does not own.
//!
//! The RNG stream, the protagonist and the resolved hostile data all come
//! from the host. The engine never creates randomness or monster data itself.
mod hostile;
mod protagonist;
mod rng;

pub use hostile::HostileData;
pub use protagonist::{BasicAttack, Protagonist, StatDeltas};
pub use rng::{PcgRng, RngSource, ScriptedRng};
