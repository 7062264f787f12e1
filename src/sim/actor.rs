//! The player-controlled actor and its timed buffs

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::powerup::PowerUpKind;
use crate::consts::*;

/// Facing / movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit step in screen space (y grows downward)
    pub fn delta(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
        }
    }
}

/// A timed buff: active until `expires_at` (inclusive deadline)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Buff {
    pub active: bool,
    pub expires_at: f64,
}

impl Buff {
    /// Activate (or refresh) for `duration` seconds from `now`
    pub fn activate(&mut self, now: f64, duration: f64) {
        self.active = true;
        self.expires_at = now + duration;
    }

    /// Deactivate once the deadline is reached. Returns true if it just expired.
    pub fn expire(&mut self, now: f64) -> bool {
        if self.active && now >= self.expires_at {
            self.active = false;
            return true;
        }
        false
    }

    /// Seconds left (0 when inactive)
    pub fn remaining(&self, now: f64) -> f64 {
        if self.active {
            (self.expires_at - now).max(0.0)
        } else {
            0.0
        }
    }
}

/// All actor buffs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Buffs {
    pub speed: Buff,
    pub invincible: Buff,
    pub jump: Buff,
    /// Double-jump charges granted by jump-boost. Nothing consumes them yet.
    pub jump_uses: u8,
}

/// The player token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    pub size: f32,
    pub facing: Direction,
    pub buffs: Buffs,
    /// Clock time of the last successful hop (used by the autopilot cadence)
    #[serde(default)]
    pub last_hop_at: Option<f64>,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            pos: Self::spawn_point(),
            size: ACTOR_SIZE,
            facing: Direction::Up,
            buffs: Buffs::default(),
            last_hop_at: None,
        }
    }
}

impl Actor {
    pub fn spawn_point() -> Vec2 {
        Vec2::new(SPAWN_X, SPAWN_Y)
    }

    /// Bounding box used for every collision test
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    pub fn is_invincible(&self) -> bool {
        self.buffs.invincible.active
    }

    /// Hop distance, doubled under speed-boost
    pub fn move_distance(&self) -> f32 {
        if self.buffs.speed.active {
            MOVE_DISTANCE * 2.0
        } else {
            MOVE_DISTANCE
        }
    }

    /// Where a hop in `dir` would land, if it stays inside the playfield
    pub fn move_target(&self, dir: Direction) -> Option<Vec2> {
        let target = self.pos + dir.delta() * self.move_distance();
        let inside = (0.0..=PLAYFIELD_WIDTH).contains(&target.x)
            && (0.0..=PLAYFIELD_HEIGHT).contains(&target.y);
        inside.then_some(target)
    }

    /// Try to hop one step. Out-of-bounds hops are rejected and change nothing.
    pub fn attempt_move(&mut self, dir: Direction) -> bool {
        match self.move_target(dir) {
            Some(target) => {
                self.pos = target;
                self.facing = dir;
                true
            }
            None => false,
        }
    }

    /// Activate the buff granted by a power-up kind. Kinds that act on the
    /// round or the obstacles (extra life, slow cars) leave the actor untouched.
    pub fn apply_effect(&mut self, kind: PowerUpKind, now: f64) {
        match kind {
            PowerUpKind::Speed => self.buffs.speed.activate(now, SPEED_BOOST_SECS),
            PowerUpKind::Invincibility => {
                self.buffs.invincible.activate(now, INVINCIBLE_SECS)
            }
            PowerUpKind::JumpBoost => {
                self.buffs.jump.activate(now, JUMP_BOOST_SECS);
                self.buffs.jump_uses = JUMP_BOOST_USES;
            }
            PowerUpKind::ExtraLife | PowerUpKind::SlowCars => {}
        }
    }

    /// Drop buffs whose deadline has passed
    pub fn tick_buffs(&mut self, now: f64) {
        self.buffs.speed.expire(now);
        self.buffs.invincible.expire(now);
        if self.buffs.jump.expire(now) {
            self.buffs.jump_uses = 0;
        }
    }

    /// Back to the spawn point; buffs are kept
    pub fn reset_to_spawn(&mut self) {
        self.pos = Self::spawn_point();
        self.facing = Direction::Up;
    }
}
