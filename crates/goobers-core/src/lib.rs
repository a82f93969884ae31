pub mod events;
pub mod player;
pub mod record;
pub mod roster;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::player::{Character, ControlScheme, Player, PlayerId};
    use crate::roster::Roster;

    /// Create `n` test players in slots `0..n` with preset characters and controls.
    pub fn make_players(n: usize) -> Vec<Player> {
        let presets = Character::presets();
        (0..n)
            .map(|slot| Player {
                id: PlayerId::for_slot(slot),
                slot,
                character: presets[slot % presets.len()].clone(),
                controls: ControlScheme::for_slot(slot).unwrap_or_else(|| {
                    ControlScheme::new(
                        &format!("l{slot}"),
                        &format!("r{slot}"),
                        &format!("j{slot}"),
                        &format!("d{slot}"),
                    )
                }),
            })
            .collect()
    }

    /// A roster with the first `n` slots filled (n <= 4).
    pub fn make_roster(n: usize) -> Roster {
        let mut roster = Roster::new();
        for (slot, character) in Character::presets().into_iter().take(n).enumerate() {
            roster
                .assign(slot, character)
                .expect("preset characters fit preset slots");
        }
        roster
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn helpers_agree() {
            let roster = make_roster(3);
            assert_eq!(roster.players(), make_players(3));
        }
    }
}
