use std::fmt;

use crate::player::{Character, ControlScheme, MAX_PLAYERS, Player, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    SlotOutOfRange(usize),
    CharacterTaken { character: String, slot: usize },
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SlotOutOfRange(slot) => {
                write!(f, "slot {slot} out of range (max {MAX_PLAYERS})")
            },
            Self::CharacterTaken { character, slot } => {
                write!(f, "character {character} already taken by slot {slot}")
            },
        }
    }
}

impl std::error::Error for RosterError {}

/// The four character-select slots. Each occupied slot holds one player
/// with that slot's preset controls.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    slots: [Option<Player>; MAX_PLAYERS],
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `character` into `slot`, replacing whoever was there.
    pub fn assign(&mut self, slot: usize, character: Character) -> Result<&Player, RosterError> {
        let controls = ControlScheme::for_slot(slot).ok_or(RosterError::SlotOutOfRange(slot))?;
        if let Some(other) = self
            .slots
            .iter()
            .flatten()
            .find(|p| p.slot != slot && p.character.id == character.id)
        {
            return Err(RosterError::CharacterTaken {
                character: character.id,
                slot: other.slot,
            });
        }

        tracing::debug!(slot, character = %character.name, "Slot assigned");
        let player = Player {
            id: PlayerId::for_slot(slot),
            slot,
            character,
            controls,
        };
        Ok(self.slots[slot].insert(player))
    }

    /// Vacate a slot, returning its previous occupant.
    pub fn remove(&mut self, slot: usize) -> Result<Option<Player>, RosterError> {
        self.slots
            .get_mut(slot)
            .map(Option::take)
            .ok_or(RosterError::SlotOutOfRange(slot))
    }

    pub fn get(&self, slot: usize) -> Option<&Player> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Occupied slots in slot order.
    pub fn players(&self) -> Vec<Player> {
        self.slots.iter().flatten().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A race needs at least one occupied slot.
    pub fn can_start(&self) -> bool {
        !self.is_empty()
    }

    /// Character ids currently in use.
    pub fn used_characters(&self) -> Vec<&str> {
        self.slots
            .iter()
            .flatten()
            .map(|p| p.character.id.as_str())
            .collect()
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_uses_slot_controls() {
        let mut roster = Roster::new();
        let presets = Character::presets();
        let p = roster.assign(1, presets[0].clone()).unwrap();
        assert_eq!(p.id.as_str(), "player-2");
        assert_eq!(p.controls.left, "ArrowLeft");
        assert!(roster.can_start());
    }

    #[test]
    fn reassigning_a_slot_replaces_it() {
        let mut roster = Roster::new();
        let presets = Character::presets();
        roster.assign(0, presets[0].clone()).unwrap();
        roster.assign(0, presets[1].clone()).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get(0).unwrap().character.id, "blue");
    }

    #[test]
    fn character_cannot_be_shared() {
        let mut roster = Roster::new();
        let presets = Character::presets();
        roster.assign(0, presets[2].clone()).unwrap();
        let err = roster.assign(3, presets[2].clone()).unwrap_err();
        assert_eq!(
            err,
            RosterError::CharacterTaken {
                character: "green".to_string(),
                slot: 0
            }
        );
    }

    #[test]
    fn out_of_range_slot_rejected() {
        let mut roster = Roster::new();
        let c = Character::presets().remove(0);
        assert_eq!(
            roster.assign(4, c).unwrap_err(),
            RosterError::SlotOutOfRange(4)
        );
        assert!(roster.remove(9).is_err());
    }

    #[test]
    fn players_come_back_in_slot_order() {
        let mut roster = Roster::new();
        let presets = Character::presets();
        roster.assign(3, presets[0].clone()).unwrap();
        roster.assign(1, presets[1].clone()).unwrap();
        let slots: Vec<_> = roster.players().iter().map(|p| p.slot).collect();
        assert_eq!(slots, vec![1, 3]);
    }

    #[test]
    fn remove_vacates_slot() {
        let mut roster = Roster::new();
        roster.assign(0, Character::presets().remove(0)).unwrap();
        let removed = roster.remove(0).unwrap();
        assert!(removed.is_some());
        assert!(!roster.can_start());
        assert!(roster.used_characters().is_empty());
    }
}
