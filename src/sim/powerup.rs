//! Collectible power-up tokens and their effect table

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::Rect;
use crate::consts::*;
use crate::lane_center_y;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Speed,
    Invincibility,
    ExtraLife,
    SlowCars,
    JumpBoost,
}

/// Who a power-up acts on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Timed buff on the actor
    ActorBuff,
    /// One extra life, applied immediately
    ExtraLife,
    /// Every live obstacle gets slowed
    SlowObstacles { duration: f64 },
}

/// An index outside the closed kind table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown power-up kind index {0}")]
pub struct UnknownPowerUp(pub u8);

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Speed,
        PowerUpKind::Invincibility,
        PowerUpKind::ExtraLife,
        PowerUpKind::SlowCars,
        PowerUpKind::JumpBoost,
    ];

    pub fn effect(self) -> Effect {
        match self {
            PowerUpKind::Speed | PowerUpKind::Invincibility | PowerUpKind::JumpBoost => {
                Effect::ActorBuff
            }
            PowerUpKind::ExtraLife => Effect::ExtraLife,
            PowerUpKind::SlowCars => Effect::SlowObstacles {
                duration: SLOWDOWN_SECS,
            },
        }
    }

    /// Token color (0xRRGGBB)
    pub fn color(self) -> u32 {
        match self {
            PowerUpKind::Speed => 0x00FFFF,
            PowerUpKind::Invincibility => 0xFFD700,
            PowerUpKind::ExtraLife => 0xFFC0CB,
            PowerUpKind::SlowCars => 0x8A2BE2,
            PowerUpKind::JumpBoost => 0xFFA500,
        }
    }

    /// Short HUD name
    pub fn name(self) -> &'static str {
        match self {
            PowerUpKind::Speed => "SPEED",
            PowerUpKind::Invincibility => "SHIELD",
            PowerUpKind::ExtraLife => "LIFE",
            PowerUpKind::SlowCars => "SLOW",
            PowerUpKind::JumpBoost => "JUMP",
        }
    }

    /// Banner shown when the effect kicks in
    pub fn banner(self) -> &'static str {
        match self {
            PowerUpKind::Speed => "SPEED BOOST!",
            PowerUpKind::Invincibility => "INVINCIBLE!",
            PowerUpKind::ExtraLife => "EXTRA LIFE!",
            PowerUpKind::SlowCars => "CARS SLOWED!",
            PowerUpKind::JumpBoost => "JUMP BOOST!",
        }
    }
}

impl TryFrom<u8> for PowerUpKind {
    type Error = UnknownPowerUp;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(UnknownPowerUp(index))
    }
}

/// A pickup lying on the playfield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub spawned_at: f64,
    pub ttl: f64,
    pub collected: bool,
}

impl PowerUp {
    pub fn new(id: u32, kind: PowerUpKind, pos: Vec2, now: f64) -> Self {
        Self {
            id,
            kind,
            pos,
            spawned_at: now,
            ttl: POWERUP_TTL_SECS,
            collected: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, POWERUP_HALF_SIZE * 2.0)
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now - self.spawned_at >= self.ttl
    }

    /// Mark as collected. Returns false if it already was.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }
}

/// Candidate spawn spots: one in each grass strip plus one on every lane
pub fn spawn_candidates<R: Rng>(rng: &mut R) -> Vec<Vec2> {
    let w = PLAYFIELD_WIDTH as i32;
    let h = PLAYFIELD_HEIGHT as i32;
    let lane_h = LANE_HEIGHT as i32;

    let mut spots = Vec::with_capacity(2 + LANE_COUNT);
    spots.push(Vec2::new(
        rng.random_range(50..=w - 50) as f32,
        rng.random_range(20..=lane_h - 20) as f32,
    ));
    spots.push(Vec2::new(
        rng.random_range(50..=w - 50) as f32,
        rng.random_range(h - lane_h + 20..=h - 50) as f32,
    ));
    for lane in 0..LANE_COUNT {
        spots.push(Vec2::new(
            rng.random_range(100..=w - 100) as f32,
            lane_center_y(lane),
        ));
    }
    spots
}

/// Draw a spawn position and a kind uniformly
pub fn roll_spawn<R: Rng>(rng: &mut R) -> (Vec2, PowerUpKind) {
    let spots = spawn_candidates(rng);
    let pos = spots
        .choose(rng)
        .copied()
        .unwrap_or_else(|| Vec2::new(PLAYFIELD_WIDTH / 2.0, LANE_HEIGHT / 2.0));
    let kind = PowerUpKind::ALL
        .choose(rng)
        .copied()
        .unwrap_or(PowerUpKind::Speed);
    (pos, kind)
}
