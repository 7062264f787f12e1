//! Particle effects driven by simulation events
//!
//! Purely cosmetic. Particles move in pixels per frame and are stepped once
//! per simulation step; nothing here feeds back into `GameState`.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{GameEvent, ParticleRequest};

/// Downward acceleration (px/frame²)
pub const GRAVITY: f32 = 0.1;
/// Dust kicked up by a hop
pub const DUST_COLOR: u32 = 0x8B4513;

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    pub color: u32,
    /// Frames left
    pub life: u32,
    pub max_life: u32,
    pub size: f32,
}

impl Particle {
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel.y += GRAVITY;
        self.life = self.life.saturating_sub(1);
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Remaining life fraction (drives fade and shrink)
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }

    pub fn draw_size(&self) -> f32 {
        self.size * self.alpha()
    }
}

/// Velocity ranges and lifetime for one kind of burst
struct BurstShape {
    vel_x: (f32, f32),
    vel_y: (f32, f32),
    life: (u32, u32),
}

const EXPLOSION: BurstShape = BurstShape {
    vel_x: (-3.0, 3.0),
    vel_y: (-5.0, -1.0),
    life: (30, 60),
};
const DUST: BurstShape = BurstShape {
    vel_x: (-1.0, 1.0),
    vel_y: (-2.0, 0.0),
    life: (20, 40),
};
const POWERUP_BURST: BurstShape = BurstShape {
    vel_x: (-2.0, 2.0),
    vel_y: (-3.0, -1.0),
    life: (40, 80),
};

/// Owns every live particle. When full, the oldest make room.
pub struct ParticleSystem {
    particles: VecDeque<Particle>,
    rng: Pcg32,
    max: usize,
}

impl ParticleSystem {
    pub fn new(max: usize, seed: u64) -> Self {
        Self {
            particles: VecDeque::with_capacity(max.min(1024)),
            rng: Pcg32::seed_from_u64(seed),
            max,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn spawn(&mut self, request: ParticleRequest) {
        match request {
            ParticleRequest::Explosion { pos, color, count } => {
                self.burst(pos, color, count, &EXPLOSION)
            }
            ParticleRequest::Dust { pos, count } => self.burst(pos, DUST_COLOR, count, &DUST),
            ParticleRequest::PowerUpBurst { pos, color, count } => {
                self.burst(pos, color, count, &POWERUP_BURST)
            }
        }
    }

    fn burst(&mut self, pos: Vec2, color: u32, count: u32, shape: &BurstShape) {
        if self.max == 0 {
            return;
        }
        for _ in 0..count {
            if self.particles.len() >= self.max {
                self.particles.pop_front();
            }
            let vel = Vec2::new(
                self.rng.random_range(shape.vel_x.0..=shape.vel_x.1),
                self.rng.random_range(shape.vel_y.0..=shape.vel_y.1),
            );
            let life = self.rng.random_range(shape.life.0..=shape.life.1);
            let size = self.rng.random_range(2..=5) as f32;
            self.particles.push_back(Particle {
                pos,
                vel,
                color,
                life,
                max_life: life,
                size,
            });
        }
    }

    /// Advance every particle by one frame and drop the dead ones
    pub fn update(&mut self) {
        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(Particle::is_alive);
    }

    /// Spawn for particle events; other events are ignored
    pub fn handle(&mut self, event: &GameEvent) {
        if let GameEvent::Particles(request) = event {
            self.spawn(*request);
        }
    }
}
