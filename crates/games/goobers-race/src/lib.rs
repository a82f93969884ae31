pub mod arena;
pub mod audio;
pub mod config;
pub mod effects;
pub mod input;
pub mod map;
pub mod physics;
pub mod scoring;
pub mod snapshot;

use std::collections::HashMap;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use goobers_core::events::EffectKind;
use goobers_core::player::{Player, PlayerColor, PlayerId};

use config::RaceConfig;
use input::KeyboardState;
use map::{RaceMap, generate_map, map_by_index};
use physics::{Cooldowns, Racer, Step, advance};
use scoring::{RaceOutcome, pick_winner, standings};

/// Something that happened during a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RaceEvent {
    Jumped {
        player_id: PlayerId,
    },
    Dashed {
        player_id: PlayerId,
    },
    /// Touched a spike. `x`/`y` is where the racer was when it died.
    Died {
        player_id: PlayerId,
        x: f32,
        y: f32,
        color: PlayerColor,
    },
    Fell {
        player_id: PlayerId,
    },
    Finished {
        player_id: PlayerId,
        time: Duration,
    },
    RaceEnding {
        winner: PlayerId,
    },
    RaceEnded {
        winner: PlayerId,
    },
}

impl RaceEvent {
    /// Sound effect this event triggers, if any.
    pub fn effect(&self) -> Option<EffectKind> {
        match self {
            RaceEvent::Jumped { .. } => Some(EffectKind::Jump),
            RaceEvent::Dashed { .. } => Some(EffectKind::Dash),
            RaceEvent::Died { .. } => Some(EffectKind::Death),
            RaceEvent::Finished { .. } => Some(EffectKind::Finish),
            RaceEvent::Fell { .. } | RaceEvent::RaceEnding { .. } | RaceEvent::RaceEnded { .. } => {
                None
            },
        }
    }
}

/// Where the race is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    Running,
    /// Winner decided; racers are still simulated until `ends_at`.
    Ending { winner: PlayerId, ends_at: Duration },
    Ended { winner: PlayerId },
}

impl RacePhase {
    pub fn winner(&self) -> Option<&PlayerId> {
        match self {
            RacePhase::Running => None,
            RacePhase::Ending { winner, .. } | RacePhase::Ended { winner } => Some(winner),
        }
    }
}

/// Serializable race state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceState {
    /// One racer per occupied slot, in slot order.
    pub racers: Vec<Racer>,
    pub finish_order: Vec<PlayerId>,
    pub elapsed: Duration,
    pub phase: RacePhase,
}

/// The race director.
pub struct GooberRace {
    map: RaceMap,
    state: RaceState,
    cooldowns: HashMap<PlayerId, Cooldowns>,
    config: RaceConfig,
    rng: StdRng,
    outcome: Option<RaceOutcome>,
}

impl GooberRace {
    /// Start a race on a layout picked from the catalog (pinned by
    /// `config.map_index` when set).
    pub fn new(players: Vec<Player>, config: RaceConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let map = match config.map_index {
            Some(index) => map_by_index(index),
            None => generate_map(&mut rng),
        };
        Self::build(players, config, map, rng)
    }

    /// Start a race on a pre-supplied map.
    pub fn with_map(players: Vec<Player>, config: RaceConfig, map: RaceMap) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::build(players, config, map, rng)
    }

    fn build(mut players: Vec<Player>, config: RaceConfig, map: RaceMap, rng: StdRng) -> Self {
        players.sort_by_key(|p| p.slot);
        tracing::info!(
            map = %map.name,
            players = players.len(),
            max_winners = config.winner_threshold(),
            "Race started"
        );
        Self {
            map,
            state: RaceState {
                racers: players.into_iter().map(Racer::new).collect(),
                finish_order: Vec::new(),
                elapsed: Duration::ZERO,
                phase: RacePhase::Running,
            },
            cooldowns: HashMap::new(),
            config,
            rng,
            outcome: None,
        }
    }

    pub fn state(&self) -> &RaceState {
        &self.state
    }

    pub fn map(&self) -> &RaceMap {
        &self.map
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    pub fn phase(&self) -> &RacePhase {
        &self.state.phase
    }

    pub fn outcome(&self) -> Option<&RaceOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.state.phase, RacePhase::Ended { .. })
    }

    pub fn racer(&self, id: &PlayerId) -> Option<&Racer> {
        self.state.racers.iter().find(|r| &r.player.id == id)
    }

    /// Run one frame. `now` is wall-clock time since the race started.
    pub fn update(&mut self, now: Duration, keys: &KeyboardState) -> Vec<RaceEvent> {
        if self.is_ended() {
            return Vec::new();
        }

        self.state.elapsed = now;
        let mut events = Vec::new();
        let step = Step {
            map: &self.map,
            config: &self.config.physics,
            now,
        };

        for racer in &mut self.state.racers {
            if racer.finished {
                continue;
            }
            let input = keys.sample(&racer.player.controls);
            let cooldowns = self.cooldowns.entry(racer.player.id.clone()).or_default();
            for event in advance(racer, &input, cooldowns, &step, &mut self.rng) {
                if let RaceEvent::Finished { player_id, time } = &event {
                    tracing::info!(player = %player_id, time = time.as_secs_f64(), "Finished");
                    self.state.finish_order.push(player_id.clone());
                }
                events.push(event);
            }
        }

        if self.state.phase == RacePhase::Running
            && self.should_end(now)
            && let Some(winner) = pick_winner(&self.state.racers)
        {
            let ends_at = now + self.config.presentation_delay();
            tracing::info!(winner = %winner, "Race decided");
            self.state.phase = RacePhase::Ending {
                winner: winner.clone(),
                ends_at,
            };
            events.push(RaceEvent::RaceEnding { winner });
        }

        // A zero presentation delay ends the race on the deciding frame.
        if let RacePhase::Ending { winner, ends_at } = &self.state.phase
            && now >= *ends_at
        {
            let winner = winner.clone();
            tracing::info!(winner = %winner, elapsed = now.as_secs_f64(), "Race ended");
            self.outcome = Some(RaceOutcome {
                winner: winner.clone(),
                finish_order: self.state.finish_order.clone(),
                standings: standings(&self.state.racers),
                elapsed: now,
            });
            self.state.phase = RacePhase::Ended {
                winner: winner.clone(),
            };
            events.push(RaceEvent::RaceEnded { winner });
        }

        events
    }

    fn should_end(&self, now: Duration) -> bool {
        let finished = self.state.finish_order.len();
        finished >= self.config.winner_threshold()
            || (now > self.config.time_limit() && finished > 0)
    }
}
