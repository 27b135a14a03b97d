//! Round and initiative bookkeeping.

use super::EntityId;

/// Overall status of an encounter.
///
/// `InProgress` is the only non-terminal status; once any terminal status is
/// reached it never changes again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CombatStatus {
    #[default]
    InProgress,
    Victory,
    Defeat,
    Fled,
}

impl CombatStatus {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// One slot in the initiative order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnEntry {
    pub combatant: EntityId,
    pub initiative: u32,
}

/// Append-only, human-readable record of everything that happened.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatLog {
    entries: Vec<String>,
}

impl CombatLog {
    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Turn state for one encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatState {
    /// Starts at 1 and increases by one every time the order wraps.
    pub round: u32,
    /// Slot of the combatant currently acting.
    ///
    /// `None` only after the combatant in slot 0 was removed mid-turn; the
    /// next advance then lands on the new slot 0 without starting a round.
    pub current_turn_index: Option<usize>,
    /// Living combatants by initiative. Sorted once, afterwards only shrinks.
    pub turn_order: Vec<TurnEntry>,
    pub status: CombatStatus,
    pub log: CombatLog,
}

impl CombatState {
    /// Builds the initiative order from `(id, speed)` pairs.
    ///
    /// Sorted by speed descending. The protagonist wins ties; other ties keep
    /// the order in which they were supplied.
    pub fn new(combatants: impl IntoIterator<Item = (EntityId, u32)>) -> Self {
        let mut turn_order: Vec<TurnEntry> = combatants
            .into_iter()
            .map(|(combatant, speed)| TurnEntry {
                combatant,
                initiative: speed,
            })
            .collect();
        turn_order.sort_by_key(|entry| {
            (
                std::cmp::Reverse(entry.initiative),
                !entry.combatant.is_player(),
            )
        });

        Self {
            round: 1,
            current_turn_index: Some(0),
            turn_order,
            status: CombatStatus::InProgress,
            log: CombatLog::default(),
        }
    }

    /// Entry of the combatant currently acting, if the encounter is live.
    pub fn current_turn(&self) -> Option<TurnEntry> {
        if self.status.is_terminal() {
            return None;
        }
        self.turn_order.get(self.current_turn_index?).copied()
    }

    /// Moves to the next slot. Returns the new entry and whether a new round began.
    pub fn advance(&mut self) -> Option<(TurnEntry, bool)> {
        if self.status.is_terminal() || self.turn_order.is_empty() {
            return None;
        }

        let mut next = self.current_turn_index.map_or(0, |index| index + 1);
        let wrapped = next >= self.turn_order.len();
        if wrapped {
            next = 0;
            self.round += 1;
        }
        self.current_turn_index = Some(next);
        self.turn_order.get(next).map(|entry| (*entry, wrapped))
    }

    /// Removes a combatant from the order.
    ///
    /// The cursor is recomputed from the removed slot's position at the time
    /// of removal, so the next advance lands on the correct successor even
    /// when several combatants are removed in a row.
    pub fn remove(&mut self, id: EntityId) -> Option<usize> {
        let position = self
            .turn_order
            .iter()
            .position(|entry| entry.combatant == id)?;
        self.turn_order.remove(position);

        if let Some(current) = self.current_turn_index {
            if position <= current {
                self.current_turn_index = current.checked_sub(1);
            }
        }
        Some(position)
    }

    /// Sets a terminal status. Returns false if the encounter already ended.
    pub fn finish(&mut self, status: CombatStatus) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = status;
        true
    }
}
