use std::time::Duration;

use serde::Deserialize;

use goobers_core::events::AudioSettings;

const CONFIG_ENV: &str = "GOOBERS_HOST_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/host.toml";

/// Slowest frame rate the scheduler will run at.
const MIN_FRAME_RATE_HZ: f32 = 1.0;

/// Host configuration, loaded from `config/host.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub frame_rate_hz: f32,
    pub audio: AudioSettings,
    /// Scripted racers the headless binary puts on the start line.
    pub demo_players: usize,
    /// The headless binary stops the arena after this long.
    pub demo_timeout_secs: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            frame_rate_hz: 60.0,
            audio: AudioSettings::default(),
            demo_players: 2,
            demo_timeout_secs: 90,
        }
    }
}

impl HostConfig {
    pub fn frame_interval(&self) -> Duration {
        let hz = if self.frame_rate_hz.is_finite() {
            self.frame_rate_hz.max(MIN_FRAME_RATE_HZ)
        } else {
            MIN_FRAME_RATE_HZ
        };
        Duration::from_secs_f32(1.0 / hz)
    }

    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<HostConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from {path}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    HostConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No {path} found, using defaults");
                HostConfig::default()
            },
        };

        if let Ok(val) = std::env::var("GOOBERS_FRAME_RATE")
            && let Ok(hz) = val.parse::<f32>()
        {
            config.frame_rate_hz = hz;
        }
        if let Ok(val) = std::env::var("GOOBERS_MUTED")
            && let Ok(muted) = val.parse::<bool>()
        {
            config.audio.muted = muted;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sixty_hz() {
        let cfg = HostConfig::default();
        let interval = cfg.frame_interval();
        assert!((interval.as_secs_f64() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_frame_rates_are_clamped() {
        for hz in [0.0, -30.0, f32::NAN, f32::INFINITY] {
            let cfg = HostConfig {
                frame_rate_hz: hz,
                ..Default::default()
            };
            assert_eq!(cfg.frame_interval(), Duration::from_secs(1), "{hz}");
        }
    }

    #[test]
    fn parses_partial_toml() {
        let cfg: HostConfig = toml::from_str(
            r#"
            frame_rate_hz = 30.0

            [audio]
            muted = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.frame_rate_hz, 30.0);
        assert!(cfg.audio.muted);
        assert_eq!(cfg.audio.master_volume, 0.5);
        assert_eq!(cfg.demo_players, 2);
    }
}
