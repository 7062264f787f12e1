//! Lane Hopper - a lane-crossing arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, wraparound, power-ups, collisions)
//! - `settings`: Variant selection and player preferences
//! - `audio`: Cue sink interface and tone recipes
//! - `fx`: Cosmetic particle system fed by simulation requests

pub mod audio;
pub mod fx;
pub mod settings;
pub mod sim;

pub use settings::{Settings, Variant};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (pixels)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Road layout
    pub const LANE_COUNT: usize = 5;
    pub const LANE_HEIGHT: f32 = 80.0;

    /// Actor defaults
    pub const ACTOR_SIZE: f32 = 30.0;
    /// Distance covered by one hop
    pub const MOVE_DISTANCE: f32 = 40.0;
    /// Spawn point sits 50px above the bottom edge, centered
    pub const SPAWN_X: f32 = PLAYFIELD_WIDTH / 2.0;
    pub const SPAWN_Y: f32 = PLAYFIELD_HEIGHT - 50.0;
    pub const STARTING_LIVES: u8 = 3;

    /// Obstacle defaults (regular car footprint)
    pub const CAR_WIDTH: f32 = 60.0;
    pub const CAR_HEIGHT: f32 = 30.0;
    /// Lane speed range in pixels/second (2-4 px per 60 Hz frame)
    pub const MIN_LANE_SPEED: f32 = 120.0;
    pub const MAX_LANE_SPEED: f32 = 240.0;
    /// Vehicles per lane (inclusive range)
    pub const MIN_VEHICLES_PER_LANE: u32 = 2;
    pub const MAX_VEHICLES_PER_LANE: u32 = 4;
    /// Horizontal gap between consecutive vehicles at lane creation
    pub const VEHICLE_SPACING: f32 = 200.0;
    /// Slow-cars multiplier and duration
    pub const SLOWDOWN_FACTOR: f32 = 0.3;
    pub const SLOWDOWN_SECS: f64 = 8.0;

    /// Buff durations (seconds)
    pub const SPEED_BOOST_SECS: f64 = 10.0;
    pub const INVINCIBLE_SECS: f64 = 8.0;
    pub const JUMP_BOOST_SECS: f64 = 15.0;
    pub const JUMP_BOOST_USES: u8 = 3;

    /// Power-up tokens
    pub const POWERUP_HALF_SIZE: f32 = 20.0;
    pub const POWERUP_TTL_SECS: f64 = 30.0;
    pub const POWERUP_SPAWN_INTERVAL_SECS: f64 = 15.0;

    /// Scoring
    pub const POWERUP_BONUS: u64 = 100;
    pub const WIN_BONUS: u64 = 500;
    pub const TIME_BONUS_BASE: u64 = 1000;
    pub const TIME_BONUS_DECAY_PER_SEC: u64 = 10;

    /// Screen shake length after a hit (frames)
    pub const SCREEN_SHAKE_FRAMES: u32 = 10;
}

/// Top boundary of the topmost lane; reaching it wins the round
#[inline]
pub fn goal_line() -> f32 {
    consts::LANE_HEIGHT
}

/// Center line of a road lane (lane 0 is the lowest-index, topmost road lane)
#[inline]
pub fn lane_center_y(lane: usize) -> f32 {
    consts::LANE_HEIGHT + (lane as f32 + 1.0) * consts::LANE_HEIGHT
}
