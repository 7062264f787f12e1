//! Audio cues
//!
//! Procedurally described sound effects - no external files needed!
//! The simulation only emits `SoundCue`s; a `CueSink` decides what playing
//! one means on the current platform.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

pub use crate::sim::SoundCue;
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Default synthesis rate for `ToneRecipe::render`
pub const SAMPLE_RATE: u32 = 22_050;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    /// White noise (frequency fields are ignored)
    Noise,
}

/// Amplitude envelope over the tone's duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// Linear fade from full to silence
    FadeOut,
    /// Half-sine swell: silent, peak in the middle, silent
    Swell,
}

/// Recipe for one sound effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneRecipe {
    pub waveform: Waveform,
    /// Frequency at the start of the tone (Hz)
    pub start_freq: f32,
    /// Frequency at the end; equal to `start_freq` for a steady pitch
    pub end_freq: f32,
    /// Vibrato depth (Hz) and rate (Hz); zero depth disables it
    pub vibrato_depth: f32,
    pub vibrato_rate: f32,
    /// Length in seconds
    pub duration: f32,
    /// Peak amplitude (0.0 - 1.0)
    pub amplitude: f32,
    pub envelope: Envelope,
}

impl ToneRecipe {
    /// The recipe used for each cue
    pub fn for_cue(cue: SoundCue) -> Self {
        match cue {
            // Short beep
            SoundCue::Hop => Self {
                waveform: Waveform::Sine,
                start_freq: 800.0,
                end_freq: 800.0,
                vibrato_depth: 0.0,
                vibrato_rate: 0.0,
                duration: 0.1,
                amplitude: 0.125,
                envelope: Envelope::FadeOut,
            },
            // Crash
            SoundCue::Collision => Self {
                waveform: Waveform::Noise,
                start_freq: 0.0,
                end_freq: 0.0,
                vibrato_depth: 0.0,
                vibrato_rate: 0.0,
                duration: 0.3,
                amplitude: 0.0625,
                envelope: Envelope::FadeOut,
            },
            // Rising sweep
            SoundCue::Victory => Self {
                waveform: Waveform::Sine,
                start_freq: 400.0,
                end_freq: 800.0,
                vibrato_depth: 0.0,
                vibrato_rate: 0.0,
                duration: 0.8,
                amplitude: 0.0625,
                envelope: Envelope::Swell,
            },
            // Warbling ding
            SoundCue::PowerUpCollected => Self {
                waveform: Waveform::Sine,
                start_freq: 600.0,
                end_freq: 600.0,
                vibrato_depth: 200.0,
                vibrato_rate: 35.0,
                duration: 0.2,
                amplitude: 0.09,
                envelope: Envelope::FadeOut,
            },
            SoundCue::PowerUpActivated => Self {
                waveform: Waveform::Sine,
                start_freq: 300.0,
                end_freq: 600.0,
                vibrato_depth: 0.0,
                vibrato_rate: 0.0,
                duration: 0.4,
                amplitude: 0.075,
                envelope: Envelope::Swell,
            },
        }
    }

    /// Number of samples at `sample_rate`
    pub fn frame_count(&self, sample_rate: u32) -> usize {
        (self.duration * sample_rate as f32) as usize
    }

    /// Synthesize mono samples in [-1, 1]. Noise is seeded, so the output is
    /// identical on every call.
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let frames = self.frame_count(sample_rate);
        let rate = sample_rate as f32;
        let mut rng = Pcg32::seed_from_u64(0x5EED);
        let mut phase = 0.0f32;

        (0..frames)
            .map(|i| {
                let progress = i as f32 / frames as f32;
                let raw = match self.waveform {
                    Waveform::Noise => rng.random_range(-0.5f32..0.5),
                    Waveform::Sine => {
                        let t = i as f32 / rate;
                        let freq = self.start_freq
                            + (self.end_freq - self.start_freq) * progress
                            + self.vibrato_depth
                                * (std::f32::consts::TAU * self.vibrato_rate * t).sin();
                        phase = (phase + std::f32::consts::TAU * freq / rate)
                            % std::f32::consts::TAU;
                        phase.sin()
                    }
                };
                let envelope = match self.envelope {
                    Envelope::FadeOut => 1.0 - progress,
                    Envelope::Swell => (std::f32::consts::PI * progress).sin(),
                };
                raw * envelope * self.amplitude
            })
            .collect()
    }
}

/// Platform playback backend
pub trait CueSink {
    /// Play `tone` at `volume` (already scaled, > 0)
    fn play(&mut self, cue: SoundCue, tone: &ToneRecipe, volume: f32);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl CueSink for NullSink {
    fn play(&mut self, _cue: SoundCue, _tone: &ToneRecipe, _volume: f32) {}
}

/// Logs each cue (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl CueSink for LogSink {
    fn play(&mut self, cue: SoundCue, tone: &ToneRecipe, volume: f32) {
        log::debug!(
            "sfx {:?}: {:?} {:.0}->{:.0}Hz {:.2}s vol {:.2}",
            cue,
            tone.waveform,
            tone.start_freq,
            tone.end_freq,
            tone.duration,
            volume
        );
    }
}

/// Audio manager for the game
pub struct AudioManager<S: CueSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: CueSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Volumes and mute taken from settings. Variants without cosmetics stay silent.
    pub fn from_settings(settings: &Settings, sink: S) -> Self {
        let mut audio = Self::new(sink);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted || !settings.variant.effects_enabled());
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound cue
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(cue, &ToneRecipe::for_cue(cue), vol);
    }

    /// Play the cue carried by an event; other events are ignored
    pub fn handle(&mut self, event: &GameEvent) {
        if let GameEvent::Sound(cue) = event {
            self.play(*cue);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
