//! Game state and round bookkeeping
//!
//! Everything the simulation mutates lives in `GameState`. Rendering code
//! should read it through `Snapshot`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, Direction};
use super::events::EventQueue;
use super::obstacle::{LaneConfig, Obstacle, ObstacleKind, build_lanes};
use super::powerup::{PowerUp, PowerUpKind};
use crate::consts::*;
use crate::settings::{ScoreMode, Settings, Variant};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Actor is crossing
    Playing,
    /// Actor reached the goal line
    Won,
    /// Out of lives
    GameOver,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Drives lane layout and power-up spawns
    pub rng: Pcg32,
    /// Active rule set
    pub variant: Variant,
    /// Lives remaining
    pub lives: u8,
    /// Points from power-ups and the win bonus
    pub bonus_score: u64,
    /// Simulation clock in seconds; stops while the round is over
    pub clock: f64,
    /// Clock value when the current round began
    pub round_started_at: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub actor: Actor,
    /// Lane vehicles (sorted by id)
    pub obstacles: Vec<Obstacle>,
    /// Live power-up tokens (sorted by id)
    pub powerups: Vec<PowerUp>,
    /// Clock value of the last power-up spawn (or round start)
    pub last_powerup_spawn: f64,
    /// Frames of screen shake left
    pub screen_shake: u32,
    /// Whether a hit starts a screen shake (off for Classic and reduced motion)
    pub shake_enabled: bool,
    /// Events produced since the host last drained them
    pub events: EventQueue,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, variant: Variant) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            variant,
            lives: STARTING_LIVES,
            bonus_score: 0,
            clock: 0.0,
            round_started_at: 0.0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            actor: Actor::default(),
            obstacles: Vec::new(),
            powerups: Vec::new(),
            last_powerup_spawn: 0.0,
            screen_shake: 0,
            shake_enabled: variant.effects_enabled(),
            events: EventQueue::new(variant.effects_enabled()),
            next_id: 1,
        };
        state.rebuild_lanes();
        log::info!(
            "New {} run (seed {}): {} vehicles",
            variant.as_str(),
            seed,
            state.obstacles.len()
        );
        state
    }

    /// New run using the variant, seed and motion preferences from settings.
    /// A missing seed falls back to `fallback_seed`.
    pub fn from_settings(settings: &Settings, fallback_seed: u64) -> Self {
        let mut state = Self::new(settings.seed.unwrap_or(fallback_seed), settings.variant);
        state.shake_enabled = settings.effective_screen_shake();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn rebuild_lanes(&mut self) {
        let config = LaneConfig {
            vehicle_variety: self.variant.vehicle_variety(),
        };
        self.obstacles = build_lanes(&mut self.rng, config, &mut self.next_id);
    }

    /// Start a fresh round. Only call between ticks.
    pub fn reset(&mut self) {
        self.lives = STARTING_LIVES;
        self.bonus_score = 0;
        self.round_started_at = self.clock;
        self.phase = GamePhase::Playing;
        self.actor = Actor::default();
        self.powerups.clear();
        self.last_powerup_spawn = self.clock;
        self.screen_shake = 0;
        self.events.clear();
        self.rebuild_lanes();
        log::info!("Round reset at t={:.2}s", self.clock);
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_won(&self) -> bool {
        self.phase == GamePhase::Won
    }

    pub fn is_round_over(&self) -> bool {
        self.phase != GamePhase::Playing
    }

    /// Seconds since the current round started
    pub fn elapsed_secs(&self) -> f64 {
        (self.clock - self.round_started_at).max(0.0)
    }

    /// Displayed score. Pure read, never mutates.
    pub fn score(&self) -> u64 {
        let elapsed = self.elapsed_secs().floor() as u64;
        match self.variant.score_mode() {
            ScoreMode::ElapsedSeconds => elapsed,
            ScoreMode::TimeBonus => {
                let decay = elapsed.saturating_mul(TIME_BONUS_DECAY_PER_SEC);
                let time_bonus = TIME_BONUS_BASE.saturating_sub(decay);
                self.bonus_score + time_bonus
            }
        }
    }

    /// Ensure entity lists are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.obstacles.sort_by_key(|o| o.id);
        self.powerups.sort_by_key(|p| p.id);
    }

    /// Read-only view for renderers and HUDs
    pub fn snapshot(&self) -> Snapshot {
        let now = self.clock;
        let buffs = &self.actor.buffs;
        Snapshot {
            actor: ActorView {
                pos: self.actor.pos,
                facing: self.actor.facing,
                speed_boost: buffs.speed.remaining(now),
                invincible: buffs.invincible.remaining(now),
                jump_boost: buffs.jump.remaining(now),
                jump_uses: buffs.jump_uses,
            },
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    pos: o.pos,
                    size: o.size,
                    kind: o.kind,
                    color: o.color,
                    slowed: o.is_slowed(),
                })
                .collect(),
            powerups: self
                .powerups
                .iter()
                .map(|p| PowerUpView {
                    pos: p.pos,
                    kind: p.kind,
                    collected: p.collected,
                    age: now - p.spawned_at,
                })
                .collect(),
            lives: self.lives,
            score: self.score(),
            elapsed_secs: self.elapsed_secs(),
            game_over: self.is_game_over(),
            won: self.is_won(),
            screen_shake: self.screen_shake,
        }
    }
}

/// Actor as seen by a renderer; buff values are seconds remaining (0 = off)
#[derive(Debug, Clone, Serialize)]
pub struct ActorView {
    pub pos: Vec2,
    pub facing: Direction,
    pub speed_boost: f64,
    pub invincible: f64,
    pub jump_boost: f64,
    pub jump_uses: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObstacleView {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ObstacleKind,
    pub color: u32,
    pub slowed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PowerUpView {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub collected: bool,
    /// Seconds since spawn (drives the pulse animation)
    pub age: f64,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub actor: ActorView,
    pub obstacles: Vec<ObstacleView>,
    pub powerups: Vec<PowerUpView>,
    pub lives: u8,
    pub score: u64,
    pub elapsed_secs: f64,
    pub game_over: bool,
    pub won: bool,
    pub screen_shake: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(1234, Variant::PowerUps);
        assert_eq!(state.lives, 3);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.actor.pos, Vec2::new(400.0, 550.0));
        assert!(state.powerups.is_empty());
        let n = state.obstacles.len();
        assert!((2 * LANE_COUNT..=4 * LANE_COUNT).contains(&n));
    }

    #[test]
    fn test_classic_uses_plain_cars() {
        let state = GameState::new(5, Variant::Classic);
        assert!(state.obstacles.iter().all(|o| o.kind == ObstacleKind::Car));
    }

    #[test]
    fn test_score_time_bonus() {
        let mut state = GameState::new(1, Variant::PowerUps);
        assert_eq!(state.score(), 1000);

        state.clock = 12.7;
        state.bonus_score = 200;
        assert_eq!(state.score(), 200 + 1000 - 120);

        // Time bonus bottoms out at zero
        state.clock = 500.0;
        assert_eq!(state.score(), 200);
        // Reading twice changes nothing
        assert_eq!(state.score(), 200);
    }

    #[test]
    fn test_score_elapsed_seconds() {
        let mut state = GameState::new(1, Variant::Enhanced);
        state.clock = 42.9;
        state.bonus_score = 100;
        assert_eq!(state.score(), 42);
    }

    #[test]
    fn test_reset_restores_round() {
        let mut state = GameState::new(77, Variant::PowerUps);
        state.clock = 30.0;
        state.lives = 0;
        state.phase = GamePhase::GameOver;
        state.bonus_score = 300;
        state.screen_shake = 4;
        state.actor.pos = Vec2::new(100.0, 100.0);
        state.actor.buffs.invincible.activate(29.0, 8.0);
        let id = state.next_entity_id();
        state
            .powerups
            .push(PowerUp::new(id, PowerUpKind::Speed, Vec2::new(10.0, 10.0), 29.0));

        state.reset();

        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.bonus_score, 0);
        assert_eq!(state.elapsed_secs(), 0.0);
        assert_eq!(state.screen_shake, 0);
        assert_eq!(state.actor.pos, Actor::spawn_point());
        assert!(!state.actor.is_invincible());
        assert!(state.powerups.is_empty());
        assert_eq!(state.last_powerup_spawn, 30.0);
        assert!(!state.obstacles.is_empty());
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::for_variant(Variant::Enhanced);
        settings.seed = Some(31);
        let state = GameState::from_settings(&settings, 99);
        assert_eq!(state.seed, 31);
        assert_eq!(state.variant, Variant::Enhanced);
        assert!(state.shake_enabled);

        settings.seed = None;
        settings.reduced_motion = true;
        let state = GameState::from_settings(&settings, 99);
        assert_eq!(state.seed, 99);
        assert!(!state.shake_enabled);
        // Reduced motion only affects shake; cues and particles still flow
        assert!(state.events.cosmetics);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = GameState::new(8, Variant::PowerUps);
        state.actor.buffs.speed.activate(0.0, 10.0);
        state.clock = 4.0;
        let snap = state.snapshot();
        assert_eq!(snap.obstacles.len(), state.obstacles.len());
        assert_eq!(snap.lives, 3);
        assert!((snap.actor.speed_boost - 6.0).abs() < 1e-9);
        assert_eq!(snap.actor.invincible, 0.0);
        assert!(!snap.game_over && !snap.won);

        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"lives\":3"));
    }
}
