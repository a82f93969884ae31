use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// One finished racer, shaped like a `race_results` row of the results backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceRecord {
    pub player_id: PlayerId,
    pub character_name: Option<String>,
    pub character_emoji: Option<String>,
    /// Seconds from race start to crossing the finish line.
    pub finish_time: f64,
    pub recorded_at: String,
}

/// Whether `time` beats a stored personal best. Lower is better.
pub fn is_personal_best(previous_best: Option<f64>, time: f64) -> bool {
    match previous_best {
        Some(best) => time < best,
        None => true,
    }
}

/// Encode records as a JSON array for the persistence layer.
pub fn records_to_json(records: &[RaceRecord]) -> serde_json::Result<String> {
    serde_json::to_string(records)
}
