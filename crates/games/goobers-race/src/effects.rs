use rand::Rng;
use serde::{Deserialize, Serialize};

use goobers_core::player::PlayerColor;

use crate::physics::{FINISH_LINE_X, PLAYER_SIZE};

pub const DEATH_PARTICLES: usize = 8;
pub const DEATH_LIFE: u32 = 60;
pub const DEATH_GRAVITY: f32 = 0.3;
pub const FINISH_PARTICLES: usize = 10;
pub const FINISH_LIFE: u32 = 120;
pub const FINISH_GRAVITY: f32 = 0.1;
/// Finish confetti is gold.
pub const FINISH_COLOR: PlayerColor = PlayerColor {
    r: 255,
    g: 215,
    b: 0,
};

/// One cosmetic particle. Velocities are per frame, life counts frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: u32,
    pub max_life: u32,
    pub gravity: f32,
    pub color: PlayerColor,
}

impl Particle {
    /// Fade factor for renderers, 1.0 when fresh.
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f32 / self.max_life as f32
    }
}

/// All live particles in the arena.
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Burst at the centre of a racer whose top-left corner was at `(x, y)`.
    pub fn spawn_death<R: Rng + ?Sized>(&mut self, rng: &mut R, x: f32, y: f32, color: PlayerColor) {
        let (cx, cy) = (x + PLAYER_SIZE / 2.0, y + PLAYER_SIZE / 2.0);
        for _ in 0..DEATH_PARTICLES {
            let vx = (rng.random::<f32>() - 0.5) * 10.0;
            let vy = (rng.random::<f32>() - 0.5) * 10.0 - 5.0;
            self.particles.push(Particle {
                x: cx,
                y: cy,
                vx,
                vy,
                life: DEATH_LIFE,
                max_life: DEATH_LIFE,
                gravity: DEATH_GRAVITY,
                color,
            });
        }
    }

    /// Confetti rising along the finish line.
    pub fn spawn_finish<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for _ in 0..FINISH_PARTICLES {
            let x = FINISH_LINE_X + rng.random::<f32>() * 50.0;
            let y = rng.random::<f32>() * 400.0;
            let vy = -rng.random::<f32>() * 5.0 - 2.0;
            self.particles.push(Particle {
                x,
                y,
                vx: 0.0,
                vy,
                life: FINISH_LIFE,
                max_life: FINISH_LIFE,
                gravity: FINISH_GRAVITY,
                color: FINISH_COLOR,
            });
        }
    }

    /// Move, apply gravity, age, and drop expired particles.
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.vy += p.gravity;
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn death_burst_starts_at_racer_centre() {
        let mut system = ParticleSystem::new();
        system.spawn_death(&mut StdRng::seed_from_u64(3), 100.0, 200.0, PlayerColor::BLUE);
        assert_eq!(system.len(), DEATH_PARTICLES);
        for p in system.particles() {
            assert_eq!((p.x, p.y), (115.0, 215.0));
            assert!((-5.0..5.0).contains(&p.vx));
            assert!((-10.0..0.0).contains(&p.vy));
            assert_eq!(p.color, PlayerColor::BLUE);
        }
    }

    #[test]
    fn finish_burst_rises_from_the_line() {
        let mut system = ParticleSystem::new();
        system.spawn_finish(&mut StdRng::seed_from_u64(3));
        assert_eq!(system.len(), FINISH_PARTICLES);
        for p in system.particles() {
            assert!((FINISH_LINE_X..FINISH_LINE_X + 50.0).contains(&p.x));
            assert!(p.vy <= -2.0);
        }
    }

    #[test]
    fn particles_expire_after_their_life() {
        let mut system = ParticleSystem::new();
        system.spawn_death(&mut StdRng::seed_from_u64(1), 0.0, 0.0, PlayerColor::RED);
        for _ in 0..DEATH_LIFE - 1 {
            system.update();
        }
        assert_eq!(system.len(), DEATH_PARTICLES);
        system.update();
        assert!(system.is_empty());
    }

    #[test]
    fn gravity_applies_after_move() {
        let mut system = ParticleSystem::new();
        system.spawn_death(&mut StdRng::seed_from_u64(9), 0.0, 0.0, PlayerColor::RED);
        let before = system.particles()[0].clone();
        system.update();
        let after = &system.particles()[0];
        assert_eq!(after.y, before.y + before.vy);
        assert_eq!(after.vy, before.vy + DEATH_GRAVITY);
        assert!(after.alpha() < 1.0);
    }
}
