//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies (cosmetics go out as events)

pub mod actor;
pub mod autopilot;
pub mod collision;
pub mod events;
pub mod obstacle;
pub mod powerup;
pub mod state;
pub mod tick;

pub use actor::{Actor, Buff, Buffs, Direction};
pub use collision::Rect;
pub use events::{EventQueue, GameEvent, ParticleRequest, SoundCue};
pub use obstacle::{Obstacle, ObstacleKind, build_lanes};
pub use powerup::{Effect, PowerUp, PowerUpKind, UnknownPowerUp};
pub use state::{GamePhase, GameState, Snapshot};
pub use tick::{TickInput, tick};
