//! Events emitted by the simulation for cosmetic collaborators
//!
//! The simulation never waits on these. Hosts drain them after each tick and
//! forward cues to an audio sink and particle requests to a particle system.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::powerup::PowerUpKind;

/// Sound cues, one per state transition that makes a noise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Hop,
    Collision,
    Victory,
    PowerUpCollected,
    PowerUpActivated,
}

/// Particle spawn requests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParticleRequest {
    Explosion { pos: Vec2, color: u32, count: u32 },
    Dust { pos: Vec2, count: u32 },
    PowerUpBurst { pos: Vec2, color: u32, count: u32 },
}

/// Colors used for particle effects (0xRRGGBB)
pub const HIT_COLOR: u32 = 0xDC143C;
pub const VICTORY_COLOR: u32 = 0x228B22;

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundCue),
    Particles(ParticleRequest),
    /// A power-up effect just started (HUD banner)
    PowerUpActivated { kind: PowerUpKind },
    LifeLost { lives_left: u8 },
    RoundWon,
    GameOver,
}

/// Event buffer with a switch that mutes the cosmetic ones. Pending events
/// are transient; only the switch is saved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQueue {
    #[serde(skip)]
    events: Vec<GameEvent>,
    /// Sound and particle events are dropped when false
    pub cosmetics: bool,
}

impl EventQueue {
    pub fn new(cosmetics: bool) -> Self {
        Self {
            events: Vec::new(),
            cosmetics,
        }
    }

    pub fn push(&mut self, event: GameEvent) {
        let cosmetic = matches!(event, GameEvent::Sound(_) | GameEvent::Particles(_));
        if cosmetic && !self.cosmetics {
            return;
        }
        self.events.push(event);
    }

    pub fn sound(&mut self, cue: SoundCue) {
        self.push(GameEvent::Sound(cue));
    }

    pub fn particles(&mut self, request: ParticleRequest) {
        self.push(GameEvent::Particles(request));
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn as_slice(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
