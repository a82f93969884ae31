use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use goobers_core::player::MAX_PLAYERS;

use crate::physics::RacePhysicsConfig;

const CONFIG_ENV: &str = "GOOBERS_RACE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/race.toml";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, message: String },
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "failed to read {path}: {message}"),
            Self::Parse(e) => write!(f, "invalid race config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Race rules, settable before a race starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Finishers needed before the race can end (1-4).
    pub max_winners: u8,
    /// After this long the race ends as soon as anyone has finished.
    pub time_limit_secs: f32,
    /// Pause between the race being decided and the winner being reported.
    pub presentation_delay_secs: f32,
    /// Seed for map choice and respawn points. Random when absent.
    pub seed: Option<u64>,
    /// Pin a catalog layout instead of picking one at random.
    pub map_index: Option<usize>,
    pub physics: RacePhysicsConfig,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            max_winners: 1,
            time_limit_secs: 60.0,
            presentation_delay_secs: 2.0,
            seed: None,
            map_index: None,
            physics: RacePhysicsConfig::default(),
        }
    }
}

fn secs(value: f32) -> Duration {
    Duration::try_from_secs_f32(value.max(0.0)).unwrap_or(Duration::ZERO)
}

impl RaceConfig {
    /// `max_winners` clamped to the number of player slots.
    pub fn winner_threshold(&self) -> usize {
        usize::from(self.max_winners).clamp(1, MAX_PLAYERS)
    }

    pub fn time_limit(&self) -> Duration {
        secs(self.time_limit_secs)
    }

    pub fn presentation_delay(&self) -> Duration {
        secs(self.presentation_delay_secs)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        match Self::from_file(&path) {
            Ok(cfg) => cfg,
            Err(e @ ConfigError::Parse(_)) => {
                tracing::warn!("{e} ({path}), using defaults");
                Self::default()
            },
            Err(ConfigError::Io { .. }) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = RaceConfig::default();
        assert_eq!(cfg.winner_threshold(), 1);
        assert_eq!(cfg.time_limit(), Duration::from_secs(60));
        assert_eq!(cfg.presentation_delay(), Duration::from_secs(2));
    }

    #[test]
    fn winner_threshold_is_clamped() {
        let mut cfg = RaceConfig {
            max_winners: 0,
            ..Default::default()
        };
        assert_eq!(cfg.winner_threshold(), 1);
        cfg.max_winners = 9;
        assert_eq!(cfg.winner_threshold(), 4);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = RaceConfig::from_toml_str(
            r#"
            max_winners = 3
            seed = 99

            [physics]
            gravity = 1.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.max_winners, 3);
        assert_eq!(cfg.seed, Some(99));
        assert_eq!(cfg.physics.gravity, 1.0);
        assert_eq!(cfg.physics.move_speed, 5.0);
        assert_eq!(cfg.time_limit_secs, 60.0);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = RaceConfig::from_toml_str("max_winners = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = RaceConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn negative_durations_become_zero() {
        let cfg = RaceConfig {
            presentation_delay_secs: -1.0,
            time_limit_secs: f32::NAN,
            ..Default::default()
        };
        assert_eq!(cfg.presentation_delay(), Duration::ZERO);
        assert_eq!(cfg.time_limit(), Duration::ZERO);
    }
}
