use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use goobers_core::events::{AudioSettings, EffectKind, EffectSink};

use crate::audio::EffectQueue;
use crate::effects::ParticleSystem;
use crate::input::KeyboardState;
use crate::scoring::RaceOutcome;
use crate::snapshot::{ParticleView, RaceSnapshot, RacerView};
use crate::{GooberRace, RaceEvent};

/// Mixed into the race seed so particle spray does not mirror respawn draws.
const PARTICLE_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// What one arena frame produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub events: Vec<RaceEvent>,
    /// Effects drained to the sink this frame.
    pub effects: Vec<EffectKind>,
    pub ended: bool,
}

/// Everything owned by one visit to the race arena: the director, the held
/// keys, queued sound effects and particles. Dropping or tearing down the
/// arena releases all of it; nothing outlives the visit.
pub struct Arena {
    race: GooberRace,
    keys: KeyboardState,
    effects: EffectQueue,
    particles: ParticleSystem,
    particle_rng: StdRng,
    sink: Box<dyn EffectSink>,
    audio: AudioSettings,
    frame: u64,
    torn_down: bool,
}

impl Arena {
    pub fn new(race: GooberRace, sink: Box<dyn EffectSink>, audio: AudioSettings) -> Self {
        let particle_rng = match race.config().seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ PARTICLE_SEED_SALT),
            None => StdRng::from_os_rng(),
        };
        Self {
            race,
            keys: KeyboardState::new(),
            effects: EffectQueue::new(),
            particles: ParticleSystem::new(),
            particle_rng,
            sink,
            audio,
            frame: 0,
            torn_down: false,
        }
    }

    pub fn on_key_down(&mut self, key: &str) {
        if !self.torn_down {
            self.keys.on_key_down(key);
        }
    }

    pub fn on_key_up(&mut self, key: &str) {
        if !self.torn_down {
            self.keys.on_key_up(key);
        }
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.keys.is_held(key)
    }

    /// Queue an effect; it plays on the next `step`.
    pub fn play_effect(&mut self, kind: EffectKind) {
        if !self.torn_down {
            self.effects.push(kind);
        }
    }

    /// One simulation frame followed by one presentation frame.
    pub fn step(&mut self, now: Duration) -> FrameReport {
        if self.torn_down {
            return FrameReport::default();
        }

        let events = self.race.update(now, &self.keys);
        for event in &events {
            if let Some(kind) = event.effect() {
                self.effects.push(kind);
            }
            match event {
                RaceEvent::Died { x, y, color, .. } => {
                    self.particles
                        .spawn_death(&mut self.particle_rng, *x, *y, *color);
                },
                RaceEvent::Finished { .. } => self.particles.spawn_finish(&mut self.particle_rng),
                _ => {},
            }
        }

        self.particles.update();
        let effects = self.effects.process(self.sink.as_mut(), &self.audio);
        self.frame += 1;

        FrameReport {
            events,
            effects,
            ended: self.race.is_ended(),
        }
    }

    pub fn snapshot(&self) -> RaceSnapshot {
        let state = self.race.state();
        RaceSnapshot {
            frame: self.frame,
            map_name: self.race.map().name.clone(),
            elapsed_secs: state.elapsed.as_secs_f64(),
            phase: state.phase.clone(),
            racers: state.racers.iter().map(RacerView::from).collect(),
            particles: self
                .particles
                .particles()
                .iter()
                .map(ParticleView::from)
                .collect(),
            finish_order: state.finish_order.clone(),
        }
    }

    /// Release held keys, pending effects and particles. Safe to call twice.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.keys.clear();
        self.effects.clear();
        self.particles.clear();
        tracing::debug!(frame = self.frame, "Arena torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn race(&self) -> &GooberRace {
        &self.race
    }

    pub fn outcome(&self) -> Option<&RaceOutcome> {
        self.race.outcome()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}
