use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of player slots on the character select screen.
pub const MAX_PLAYERS: usize = 4;

/// Stable identifier for a racer, formatted as `player-<slot>` (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Id for a zero-based slot index.
    pub fn for_slot(slot: usize) -> Self {
        Self(format!("player-{}", slot + 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body color of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for PlayerColor {
    fn default() -> Self {
        Self::PALETTE[0]
    }
}

impl PlayerColor {
    pub const RED: PlayerColor = PlayerColor {
        r: 239,
        g: 68,
        b: 68,
    };
    pub const BLUE: PlayerColor = PlayerColor {
        r: 59,
        g: 130,
        b: 246,
    };
    pub const GREEN: PlayerColor = PlayerColor {
        r: 34,
        g: 197,
        b: 94,
    };
    pub const YELLOW: PlayerColor = PlayerColor {
        r: 234,
        g: 179,
        b: 8,
    };

    /// One color per preset character, in selection order.
    pub const PALETTE: &[PlayerColor] = &[Self::RED, Self::BLUE, Self::GREEN, Self::YELLOW];

    /// CSS-style `#rrggbb` string for renderers.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A selectable character. Immutable for the duration of a race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub color: PlayerColor,
    pub emoji: String,
}

impl Character {
    pub fn new(id: &str, name: &str, color: PlayerColor, emoji: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color,
            emoji: emoji.to_string(),
        }
    }

    /// The four preset goobers offered on the character select screen.
    pub fn presets() -> Vec<Character> {
        vec![
            Character::new("red", "Crimson Goober", PlayerColor::RED, "😄"),
            Character::new("blue", "Azure Goober", PlayerColor::BLUE, "😎"),
            Character::new("green", "Lime Goober", PlayerColor::GREEN, "🤪"),
            Character::new("yellow", "Golden Goober", PlayerColor::YELLOW, "😊"),
        ]
    }
}

/// Key bindings for the four racer actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlScheme {
    pub left: String,
    pub right: String,
    pub jump: String,
    pub dash: String,
}

impl ControlScheme {
    pub fn new(left: &str, right: &str, jump: &str, dash: &str) -> Self {
        Self {
            left: left.to_string(),
            right: right.to_string(),
            jump: jump.to_string(),
            dash: dash.to_string(),
        }
    }

    /// Preset bindings for a zero-based slot. Each slot owns a distinct set.
    pub fn for_slot(slot: usize) -> Option<Self> {
        match slot {
            0 => Some(Self::new("a", "d", "w", "s")),
            1 => Some(Self::new("ArrowLeft", "ArrowRight", "ArrowUp", "ArrowDown")),
            2 => Some(Self::new("j", "l", "i", "k")),
            3 => Some(Self::new("z", "c", "x", "v")),
            _ => None,
        }
    }

    /// Whether any key of `self` is also bound in `other` (case-insensitive).
    pub fn overlaps(&self, other: &ControlScheme) -> bool {
        let ours = [&self.left, &self.right, &self.jump, &self.dash];
        let theirs = [&other.left, &other.right, &other.jump, &other.dash];
        ours.iter()
            .any(|a| theirs.iter().any(|b| !a.is_empty() && a.eq_ignore_ascii_case(b)))
    }
}

/// A racer as chosen on the character select screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Zero-based slot index; slot order is the stable input order.
    pub slot: usize,
    pub character: Character,
    pub controls: ControlScheme,
}

impl Player {
    /// Spawn point for a freshly created player in `slot`.
    pub fn spawn_position(slot: usize) -> (f32, f32) {
        (100.0 + slot as f32 * 50.0, 400.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_one_based() {
        assert_eq!(PlayerId::for_slot(0).as_str(), "player-1");
        assert_eq!(PlayerId::for_slot(3).to_string(), "player-4");
    }

    #[test]
    fn slot_control_sets_are_disjoint() {
        let sets: Vec<_> = (0..MAX_PLAYERS)
            .map(|s| ControlScheme::for_slot(s).unwrap())
            .collect();
        for (i, a) in sets.iter().enumerate() {
            for b in sets.iter().skip(i + 1) {
                assert!(!a.overlaps(b), "{a:?} shares a key with {b:?}");
            }
        }
        assert!(ControlScheme::for_slot(MAX_PLAYERS).is_none());
    }

    #[test]
    fn overlap_is_case_insensitive() {
        let a = ControlScheme::new("A", "d", "w", "s");
        let b = ControlScheme::new("q", "e", "a", "f");
        assert!(a.overlaps(&b));
    }

    #[test]
    fn presets_have_distinct_colors() {
        let presets = Character::presets();
        assert_eq!(presets.len(), MAX_PLAYERS);
        for (c, color) in presets.iter().zip(PlayerColor::PALETTE) {
            assert_eq!(c.color, *color);
        }
    }

    #[test]
    fn hex_color() {
        assert_eq!(PlayerColor::RED.to_hex(), "#ef4444");
    }

    #[test]
    fn spawn_positions_step_by_slot() {
        assert_eq!(Player::spawn_position(0), (100.0, 400.0));
        assert_eq!(Player::spawn_position(2), (200.0, 400.0));
    }
}
