use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use goobers_core::player::Player;
use goobers_core::time::millis_between;

use crate::RaceEvent;
use crate::input::ActionInput;
use crate::map::{Platform, RaceMap, Rect, THICK_PLATFORM_HEIGHT};

/// Downward acceleration added to vy each airborne frame.
pub const GRAVITY: f32 = 0.8;
/// Horizontal velocity multiplier on frames without left/right input.
pub const FRICTION: f32 = 0.8;
/// Horizontal speed while left or right is held.
pub const MOVE_SPEED: f32 = 5.0;
/// Vertical velocity set by a jump (negative is up).
pub const JUMP_VELOCITY: f32 = -15.0;
/// Minimum time between two jumps of the same racer.
pub const JUMP_DEBOUNCE_MS: u64 = 200;
/// Speed added in the current direction by a dash.
pub const DASH_BOOST: f32 = 3.0;
/// Dash never pushes |vx| past this.
pub const DASH_MAX_SPEED: f32 = 12.0;
/// Minimum time between two dashes of the same racer.
pub const DASH_COOLDOWN_MS: u64 = 500;
/// Edge length of every racer's square bounding box.
pub const PLAYER_SIZE: f32 = 30.0;
/// How far into a thick platform's face a racer may be and still grab it.
pub const GRAB_MARGIN: f32 = 10.0;
/// Racers whose y passes this are reset.
pub const FALL_Y: f32 = 600.0;
/// Crossing this x finishes the race for a racer.
pub const FINISH_LINE_X: f32 = 1400.0;
/// Respawn x is drawn uniformly from `[RESPAWN_X_MIN, RESPAWN_X_MAX)`.
pub const RESPAWN_X_MIN: f32 = 50.0;
pub const RESPAWN_X_MAX: f32 = 150.0;
pub const RESPAWN_Y: f32 = 400.0;

/// Tunable physics parameters, loadable from TOML. Defaults are the
/// reference tuning; all values are per frame or in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RacePhysicsConfig {
    pub gravity: f32,
    pub friction: f32,
    pub move_speed: f32,
    pub jump_velocity: f32,
    pub jump_debounce_ms: u64,
    pub dash_boost: f32,
    pub dash_max_speed: f32,
    pub dash_cooldown_ms: u64,
    pub player_size: f32,
    pub thick_platform_height: f32,
    pub grab_margin: f32,
    pub fall_y: f32,
    pub finish_line_x: f32,
    pub respawn_x_min: f32,
    pub respawn_x_max: f32,
    pub respawn_y: f32,
}

impl Default for RacePhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction: FRICTION,
            move_speed: MOVE_SPEED,
            jump_velocity: JUMP_VELOCITY,
            jump_debounce_ms: JUMP_DEBOUNCE_MS,
            dash_boost: DASH_BOOST,
            dash_max_speed: DASH_MAX_SPEED,
            dash_cooldown_ms: DASH_COOLDOWN_MS,
            player_size: PLAYER_SIZE,
            thick_platform_height: THICK_PLATFORM_HEIGHT,
            grab_margin: GRAB_MARGIN,
            fall_y: FALL_Y,
            finish_line_x: FINISH_LINE_X,
            respawn_x_min: RESPAWN_X_MIN,
            respawn_x_max: RESPAWN_X_MAX,
            respawn_y: RESPAWN_Y,
        }
    }
}

/// Live simulation state of one racer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Racer {
    pub player: Player,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub grounded: bool,
    pub finished: bool,
    /// Race-relative time the finish line was crossed. Set once.
    pub finish_time: Option<Duration>,
}

impl Racer {
    /// A racer at its slot's spawn point.
    pub fn new(player: Player) -> Self {
        let (x, y) = Player::spawn_position(player.slot);
        Self::at(player, x, y)
    }

    pub fn at(player: Player, x: f32, y: f32) -> Self {
        Self {
            player,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            grounded: false,
            finished: false,
            finish_time: None,
        }
    }

    pub fn rect(&self, size: f32) -> Rect {
        Rect::new(self.x, self.y, size, size)
    }

    pub fn finish_time_secs(&self) -> Option<f64> {
        self.finish_time.map(|t| t.as_secs_f64())
    }

    /// Move back to the start band with zero velocity. Race state is untouched.
    pub fn respawn<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &RacePhysicsConfig) {
        let span = (config.respawn_x_max - config.respawn_x_min).max(0.0);
        let x = config.respawn_x_min + rng.random::<f32>() * span;
        // The top of the unit draw can round up onto the exclusive bound.
        self.x = if span > 0.0 && x >= config.respawn_x_max {
            config.respawn_x_max.next_down()
        } else {
            x
        };
        self.y = config.respawn_y;
        self.vx = 0.0;
        self.vy = 0.0;
    }
}

/// Last successful jump and dash of one racer, race-relative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cooldowns {
    pub last_jump: Option<Duration>,
    pub last_dash: Option<Duration>,
}

fn ready(last: Option<Duration>, now: Duration, wait_ms: u64) -> bool {
    last.is_none_or(|t| millis_between(t, now) >= u128::from(wait_ms))
}

/// Everything shared by all racers for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Step<'a> {
    pub map: &'a RaceMap,
    pub config: &'a RacePhysicsConfig,
    /// Wall-clock time since race start.
    pub now: Duration,
}

/// Which surface of a platform a racer hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Top,
    LeftFace,
    RightFace,
}

/// First platform the racer collides with, in map order.
pub fn find_contact<'m>(
    racer: &Racer,
    platforms: &'m [Platform],
    config: &RacePhysicsConfig,
) -> Option<(Contact, &'m Platform)> {
    let body = racer.rect(config.player_size);
    for platform in platforms {
        let p = &platform.rect;
        if !body.overlaps(p) {
            continue;
        }
        if racer.vy > 0.0 && body.y < p.y {
            return Some((Contact::Top, platform));
        }
        if platform.is_thick(config.thick_platform_height) {
            if racer.vx > 0.0 && body.x < p.x + config.grab_margin {
                return Some((Contact::LeftFace, platform));
            }
            if racer.vx < 0.0 && body.right() > p.right() - config.grab_margin {
                return Some((Contact::RightFace, platform));
            }
        }
    }
    None
}

/// Advance one racer by one frame. Finished racers are left untouched.
pub fn advance<R: Rng + ?Sized>(
    racer: &mut Racer,
    input: &ActionInput,
    cooldowns: &mut Cooldowns,
    step: &Step<'_>,
    rng: &mut R,
) -> Vec<RaceEvent> {
    let mut events = Vec::new();
    if racer.finished {
        return events;
    }
    let cfg = step.config;
    let id = racer.player.id.clone();

    // Horizontal control
    if input.left {
        racer.vx = -cfg.move_speed;
    } else if input.right {
        racer.vx = cfg.move_speed;
    } else {
        racer.vx *= cfg.friction;
    }

    if input.jump && racer.grounded && ready(cooldowns.last_jump, step.now, cfg.jump_debounce_ms) {
        racer.vy = cfg.jump_velocity;
        racer.grounded = false;
        cooldowns.last_jump = Some(step.now);
        tracing::debug!(player = %id, "Jump");
        events.push(RaceEvent::Jumped {
            player_id: id.clone(),
        });
    }

    if input.dash && ready(cooldowns.last_dash, step.now, cfg.dash_cooldown_ms) {
        if racer.vx > 0.0 {
            racer.vx = (racer.vx + cfg.dash_boost).min(cfg.dash_max_speed);
        } else if racer.vx < 0.0 {
            racer.vx = (racer.vx - cfg.dash_boost).max(-cfg.dash_max_speed);
        }
        cooldowns.last_dash = Some(step.now);
        tracing::debug!(player = %id, vx = racer.vx, "Dash");
        events.push(RaceEvent::Dashed {
            player_id: id.clone(),
        });
    }

    if !racer.grounded {
        racer.vy += cfg.gravity;
    }

    racer.x += racer.vx;
    racer.y += racer.vy;

    match find_contact(racer, &step.map.platforms, cfg) {
        Some((Contact::Top, p)) => {
            racer.y = p.rect.y - cfg.player_size;
            racer.vy = 0.0;
            racer.grounded = true;
        },
        Some((Contact::LeftFace, p)) => {
            racer.x = p.rect.x - cfg.player_size;
            racer.vx = 0.0;
        },
        Some((Contact::RightFace, p)) => {
            racer.x = p.rect.right();
            racer.vx = 0.0;
        },
        None => racer.grounded = false,
    }

    let body = racer.rect(cfg.player_size);
    if step.map.spikes.iter().any(|s| s.rect.overlaps(&body)) {
        let (x, y) = (racer.x, racer.y);
        racer.respawn(rng, cfg);
        tracing::debug!(player = %id, x, y, "Spiked");
        events.push(RaceEvent::Died {
            player_id: id.clone(),
            x,
            y,
            color: racer.player.character.color,
        });
    }

    if racer.y > cfg.fall_y {
        racer.respawn(rng, cfg);
        tracing::debug!(player = %id, "Fell off the map");
        events.push(RaceEvent::Fell {
            player_id: id.clone(),
        });
    }

    if racer.x >= cfg.finish_line_x && !racer.finished {
        racer.finished = true;
        racer.finish_time = Some(step.now);
        events.push(RaceEvent::Finished {
            player_id: id.clone(),
            time: step.now,
        });
    }

    events
}
