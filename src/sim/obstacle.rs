//! Lane hazards: vehicles that drive across the road and wrap around

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;
use crate::lane_center_y;

/// Vehicle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    #[default]
    Car,
    Truck,
    Sports,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] =
        [ObstacleKind::Car, ObstacleKind::Truck, ObstacleKind::Sports];

    /// Footprint (width, height) in pixels
    pub fn footprint(self) -> Vec2 {
        match self {
            ObstacleKind::Car => Vec2::new(CAR_WIDTH, CAR_HEIGHT),
            ObstacleKind::Truck => Vec2::new(CAR_WIDTH + 20.0, CAR_HEIGHT + 5.0),
            ObstacleKind::Sports => Vec2::new(CAR_WIDTH - 10.0, CAR_HEIGHT - 5.0),
        }
    }
}

/// Body colors for the plain palette and the extended one (0xRRGGBB)
pub const CLASSIC_PALETTE: [u32; 4] = [0xDC143C, 0x1E90FF, 0xFFD700, 0xFFFFFF];
pub const EXTENDED_PALETTE: [u32; 6] = [
    0xDC143C, 0x1E90FF, 0xFFD700, 0xFFFFFF, 0xFFA500, 0x8A2BE2,
];

/// Temporary speed reduction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slowdown {
    pub expires_at: f64,
}

/// A vehicle bound to one lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Center position; `pos.y` never changes after creation
    pub pos: Vec2,
    /// Signed base speed in pixels/second (sign = direction of travel)
    pub base_speed: f32,
    /// Signed speed currently applied (reduced while slowed)
    pub speed: f32,
    pub size: Vec2,
    pub color: u32,
    #[serde(default)]
    pub slowdown: Option<Slowdown>,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, pos: Vec2, base_speed: f32, color: u32) -> Self {
        Self {
            id,
            kind,
            pos,
            base_speed,
            speed: base_speed,
            size: kind.footprint(),
            color,
            slowdown: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size / 2.0)
    }

    pub fn is_slowed(&self) -> bool {
        self.slowdown.is_some()
    }

    /// Distance between two consecutive appearances at the same screen x
    pub fn wrap_span(&self) -> f32 {
        PLAYFIELD_WIDTH + 2.0 * self.size.x
    }

    /// Move along the lane by `dt` seconds of travel.
    ///
    /// Once the vehicle is a full footprint past the far edge it is moved back
    /// by exactly one wrap span, so the overshoot carries over and no distance
    /// is lost across the wrap.
    pub fn advance(&mut self, dt: f32) {
        self.pos.x += self.speed * dt;

        let span = self.wrap_span();
        if self.speed > 0.0 {
            let far_edge = PLAYFIELD_WIDTH + self.size.x;
            if self.pos.x > far_edge {
                let laps = ((self.pos.x - far_edge) / span).ceil();
                self.pos.x -= laps * span;
            }
        } else if self.speed < 0.0 {
            let far_edge = -self.size.x;
            if self.pos.x < far_edge {
                let laps = ((far_edge - self.pos.x) / span).ceil();
                self.pos.x += laps * span;
            }
        }
    }

    /// Drop to 30% of base speed until `now + duration`. A second call while
    /// slowed only moves the deadline.
    pub fn apply_slowdown(&mut self, duration: f64, now: f64) {
        self.slowdown = Some(Slowdown {
            expires_at: now + duration,
        });
        self.speed = self.base_speed * SLOWDOWN_FACTOR;
    }

    /// Restore base speed once the slowdown deadline is reached
    pub fn tick(&mut self, now: f64) {
        if let Some(slow) = self.slowdown {
            if now >= slow.expires_at {
                self.slowdown = None;
                self.speed = self.base_speed;
            }
        }
    }
}

/// Lane layout options
#[derive(Debug, Clone, Copy)]
pub struct LaneConfig {
    /// Mix trucks and sports cars in with regular cars
    pub vehicle_variety: bool,
}

/// Build the vehicles for all lanes. Even lanes drive right, odd lanes left;
/// every vehicle in a lane shares that lane's speed.
pub fn build_lanes<R: Rng>(rng: &mut R, config: LaneConfig, next_id: &mut u32) -> Vec<Obstacle> {
    let palette: &[u32] = if config.vehicle_variety {
        &EXTENDED_PALETTE
    } else {
        &CLASSIC_PALETTE
    };

    let mut obstacles = Vec::new();
    for lane in 0..LANE_COUNT {
        let y = lane_center_y(lane);
        let magnitude = rng.random_range(MIN_LANE_SPEED..MAX_LANE_SPEED);
        let speed = if lane % 2 == 0 { magnitude } else { -magnitude };
        let count = rng.random_range(MIN_VEHICLES_PER_LANE..=MAX_VEHICLES_PER_LANE);

        for i in 0..count {
            // Start just off-screen on the entry side, queued behind each other
            let offset = i as f32 * VEHICLE_SPACING;
            let x = if speed > 0.0 {
                -CAR_WIDTH - offset
            } else {
                PLAYFIELD_WIDTH + CAR_WIDTH + offset
            };

            let color = palette.choose(rng).copied().unwrap_or(CLASSIC_PALETTE[0]);
            let kind = if config.vehicle_variety {
                ObstacleKind::ALL.choose(rng).copied().unwrap_or_default()
            } else {
                ObstacleKind::Car
            };

            let id = *next_id;
            *next_id += 1;
            obstacles.push(Obstacle::new(id, kind, Vec2::new(x, y), speed, color));
        }
    }

    log::debug!("Built {} vehicles across {} lanes", obstacles.len(), LANE_COUNT);
    obstacles
}
