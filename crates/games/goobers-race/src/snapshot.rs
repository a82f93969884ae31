use serde::{Deserialize, Serialize};

use goobers_core::player::{PlayerColor, PlayerId};

use crate::RacePhase;
use crate::effects::Particle;
use crate::physics::Racer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    EmptyPayload,
    SerializeError(String),
    DeserializeError(String),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "empty snapshot payload"),
            Self::SerializeError(e) => write!(f, "serialize error: {e}"),
            Self::DeserializeError(e) => write!(f, "deserialize error: {e}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

/// What a renderer needs to draw one racer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RacerView {
    pub player_id: PlayerId,
    pub name: String,
    pub emoji: String,
    pub color: PlayerColor,
    pub x: f32,
    pub y: f32,
    pub grounded: bool,
    pub finished: bool,
    pub finish_time: Option<f64>,
}

impl From<&Racer> for RacerView {
    fn from(racer: &Racer) -> Self {
        Self {
            player_id: racer.player.id.clone(),
            name: racer.player.character.name.clone(),
            emoji: racer.player.character.emoji.clone(),
            color: racer.player.character.color,
            x: racer.x,
            y: racer.y,
            grounded: racer.grounded,
            finished: racer.finished,
            finish_time: racer.finish_time_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    pub x: f32,
    pub y: f32,
    pub color: PlayerColor,
    pub alpha: f32,
}

impl From<&Particle> for ParticleView {
    fn from(p: &Particle) -> Self {
        Self {
            x: p.x,
            y: p.y,
            color: p.color,
            alpha: p.alpha(),
        }
    }
}

/// One rendered frame of the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub frame: u64,
    pub map_name: String,
    pub elapsed_secs: f64,
    pub phase: RacePhase,
    pub racers: Vec<RacerView>,
    pub particles: Vec<ParticleView>,
    pub finish_order: Vec<PlayerId>,
}

impl RaceSnapshot {
    /// MessagePack bytes for the render channel.
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        rmp_serde::to_vec(self).map_err(|e| SnapshotError::SerializeError(e.to_string()))
    }

    pub fn decode(data: &[u8]) -> Result<Self, SnapshotError> {
        if data.is_empty() {
            return Err(SnapshotError::EmptyPayload);
        }
        rmp_serde::from_slice(data).map_err(|e| SnapshotError::DeserializeError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goobers_core::test_helpers::make_players;

    fn sample() -> RaceSnapshot {
        let racers: Vec<Racer> = make_players(2).into_iter().map(Racer::new).collect();
        RaceSnapshot {
            frame: 42,
            map_name: "Islands".to_string(),
            elapsed_secs: 0.7,
            phase: RacePhase::Ending {
                winner: PlayerId::for_slot(1),
                ends_at: std::time::Duration::from_secs(3),
            },
            racers: racers.iter().map(RacerView::from).collect(),
            particles: Vec::new(),
            finish_order: vec![PlayerId::for_slot(1)],
        }
    }

    #[test]
    fn encodes_and_decodes() {
        let snap = sample();
        let bytes = snap.encode().unwrap();
        assert_eq!(RaceSnapshot::decode(&bytes).unwrap(), snap);
    }

    #[test]
    fn racer_view_carries_character() {
        let snap = sample();
        assert_eq!(snap.racers[0].name, "Crimson Goober");
        assert_eq!(snap.racers[1].x, 150.0);
        assert_eq!(snap.racers[0].finish_time, None);
    }

    #[test]
    fn empty_payload_rejected() {
        assert_eq!(
            RaceSnapshot::decode(&[]).unwrap_err(),
            SnapshotError::EmptyPayload
        );
    }

    #[test]
    fn garbage_payload_rejected() {
        assert!(matches!(
            RaceSnapshot::decode(&[0xc1, 0xff, 0x00]),
            Err(SnapshotError::DeserializeError(_))
        ));
    }
}
