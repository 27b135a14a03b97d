use crate::env::{Protagonist, RngSource};
use crate::state::{EntityId, TurnEntry};

use super::CombatSession;

/// Turn scheduling methods for CombatSession.
impl<P, R> CombatSession<'_, P, R>
where
    P: Protagonist + ?Sized,
    R: RngSource,
{
    /// Returns the entry of the combatant whose turn it is.
    ///
    /// None once the encounter is over, or briefly after the acting combatant
    /// in the first slot was removed.
    pub fn current_turn(&self) -> Option<TurnEntry> {
        self.state.current_turn()
    }

    /// Advances to the next combatant and returns its entry.
    ///
    /// Wrapping past the last slot starts a new round and logs a round banner.
    /// Returns None and changes nothing once the encounter is over.
    pub fn next_turn(&mut self) -> Option<TurnEntry> {
        let (entry, wrapped) = self.state.advance()?;
        if wrapped {
            let banner = format!("--- Round {} ---", self.state.round);
            self.log(banner);
        }
        tracing::trace!(round = self.state.round, combatant = %entry.combatant, "turn started");
        Some(entry)
    }

    /// Removes a killed hostile from the roster and the initiative order.
    ///
    /// The turn cursor is adjusted so the next advance lands on the correct
    /// successor. Removing the last hostile ends the encounter in victory.
    /// Returns false if the id is the protagonist, not present, or still alive.
    pub fn remove_dead_enemy(&mut self, id: EntityId) -> bool {
        if id.is_player() {
            return false;
        }
        let Some(index) = self.hostiles.iter().position(|h| h.id == id) else {
            return false;
        };
        if self.hostiles[index].is_alive() {
            return false;
        }

        let hostile = self.hostiles.remove(index);
        self.combatants.remove(&id);
        let slot = self.state.remove(id);
        tracing::debug!(
            combatant = %id,
            slot = ?slot,
            remaining = self.hostiles.len(),
            "hostile removed from encounter"
        );
        self.defeated.push(hostile);
        self.check_combat_end();
        true
    }
}
