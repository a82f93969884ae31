use std::time::Duration;

use serde::{Deserialize, Serialize};

use goobers_core::player::{Character, PlayerId};
use goobers_core::record::RaceRecord;

use crate::physics::Racer;

/// One row of the victory screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based place. Unfinished racers are ranked after every finisher.
    pub place: usize,
    pub player_id: PlayerId,
    pub character: Character,
    pub finish_time: Option<Duration>,
}

/// The settled result of a race. Built once when the race ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceOutcome {
    pub winner: PlayerId,
    pub finish_order: Vec<PlayerId>,
    pub standings: Vec<Standing>,
    pub elapsed: Duration,
}

impl RaceOutcome {
    /// Result rows for every finisher, in standings order.
    pub fn records(&self, recorded_at: &str) -> Vec<RaceRecord> {
        self.standings
            .iter()
            .filter_map(|s| {
                s.finish_time.map(|t| RaceRecord {
                    player_id: s.player_id.clone(),
                    character_name: Some(s.character.name.clone()),
                    character_emoji: Some(s.character.emoji.clone()),
                    finish_time: t.as_secs_f64(),
                    recorded_at: recorded_at.to_string(),
                })
            })
            .collect()
    }

    pub fn winner_standing(&self) -> Option<&Standing> {
        self.standings.iter().find(|s| s.player_id == self.winner)
    }
}

/// Earliest finisher; ties go to the lower slot.
pub fn pick_winner(racers: &[Racer]) -> Option<PlayerId> {
    racers
        .iter()
        .filter_map(|r| r.finish_time.map(|t| (t, r.player.slot, &r.player.id)))
        .min_by_key(|(t, slot, _)| (*t, *slot))
        .map(|(_, _, id)| id.clone())
}

/// Finishers by time (ties by slot), then everyone else in slot order.
pub fn standings(racers: &[Racer]) -> Vec<Standing> {
    let mut ordered: Vec<&Racer> = racers.iter().collect();
    ordered.sort_by_key(|r| (r.finish_time.is_none(), r.finish_time, r.player.slot));
    ordered
        .into_iter()
        .enumerate()
        .map(|(i, r)| Standing {
            place: i + 1,
            player_id: r.player.id.clone(),
            character: r.player.character.clone(),
            finish_time: r.finish_time,
        })
        .collect()
}
