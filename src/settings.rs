//! Game variant selection and player preferences
//!
//! Persisted as JSON next to the binary (or wherever the host points).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::WIN_BONUS;

/// Rule set variants. Each adds capabilities on top of the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Plain cars, no effects, score is the crossing time
    Classic,
    /// Vehicle variety, sound cues, particles, screen shake
    Enhanced,
    /// Enhanced plus collectible power-ups and bonus scoring
    #[default]
    PowerUps,
}

/// How the displayed score is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreMode {
    /// Whole seconds since the round started
    ElapsedSeconds,
    /// Bonus points plus a time bonus that decays with elapsed time
    TimeBonus,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Enhanced => "Enhanced",
            Variant::PowerUps => "PowerUps",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "minimal" => Some(Variant::Classic),
            "enhanced" => Some(Variant::Enhanced),
            "powerups" | "power-ups" => Some(Variant::PowerUps),
            _ => None,
        }
    }

    pub fn powerups_enabled(&self) -> bool {
        matches!(self, Variant::PowerUps)
    }

    /// Sound cues, particles and screen shake
    pub fn effects_enabled(&self) -> bool {
        !matches!(self, Variant::Classic)
    }

    /// Trucks and sports cars in addition to regular cars
    pub fn vehicle_variety(&self) -> bool {
        !matches!(self, Variant::Classic)
    }

    /// Points awarded for reaching the goal
    pub fn win_bonus(&self) -> u64 {
        match self {
            Variant::PowerUps => WIN_BONUS,
            Variant::Classic | Variant::Enhanced => 0,
        }
    }

    pub fn score_mode(&self) -> ScoreMode {
        match self {
            Variant::PowerUps => ScoreMode::TimeBonus,
            Variant::Classic | Variant::Enhanced => ScoreMode::ElapsedSeconds,
        }
    }
}

/// Settings load/save failures
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rule set
    pub variant: Variant,
    /// Fixed run seed (random per run when absent)
    pub seed: Option<u64>,

    // === Visual Effects ===
    /// Screen shake on collisions
    pub screen_shake: bool,
    /// Particle effects (explosions, dust, pickup bursts)
    pub particles: bool,
    /// Particle budget when particles are on
    pub max_particles: usize,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            seed: None,

            screen_shake: true,
            particles: true,
            max_particles: 500,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion && self.variant.effects_enabled()
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles || !self.variant.effects_enabled() {
            0
        } else {
            self.max_particles
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path`, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Using default settings ({err})");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
