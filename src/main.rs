//! Lane Hopper entry point
//!
//! Headless host: loads settings, lets the autopilot play one demo round on
//! the fixed-step loop, and prints the final snapshot as JSON.
//!
//! Usage: `lane-hopper [settings.json] [max-seconds]`

use std::error::Error;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use lane_hopper::Settings;
use lane_hopper::audio::{AudioManager, CueSink, LogSink};
use lane_hopper::consts::*;
use lane_hopper::fx::ParticleSystem;
use lane_hopper::sim::{GameEvent, GameState, TickInput, tick};

/// Simulated display refresh; deliberately not a multiple of the sim rate
const FRAME_DT: f32 = 1.0 / 75.0;
const DEFAULT_MAX_SECONDS: f32 = 120.0;

/// Game instance holding all state
struct Game<S: CueSink> {
    state: GameState,
    audio: AudioManager<S>,
    particles: ParticleSystem,
    accumulator: f32,
    input: TickInput,
}

impl<S: CueSink> Game<S> {
    fn new(settings: &Settings, seed: u64, sink: S) -> Self {
        Self {
            state: GameState::from_settings(settings, seed),
            audio: AudioManager::from_settings(settings, sink),
            particles: ParticleSystem::new(settings.max_particles(), seed ^ 0xF00D),
            accumulator: 0.0,
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
        }
    }

    /// Run simulation ticks. Returns true once the round is over.
    fn update(&mut self, dt: f32) -> bool {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.moves.clear();
            self.input.reset = false;

            self.dispatch_events();
            self.particles.update();

            if self.state.is_round_over() {
                return true;
            }
        }
        false
    }

    fn dispatch_events(&mut self) {
        for event in self.state.events.drain() {
            self.audio.handle(&event);
            self.particles.handle(&event);
            match event {
                GameEvent::PowerUpActivated { kind } => log::info!("{}", kind.banner()),
                GameEvent::LifeLost { lives_left } => {
                    if self.state.screen_shake > 0 {
                        log::debug!("Screen shake for {} frames", self.state.screen_shake);
                    }
                    log::info!("Squashed! {} lives left", lives_left);
                }
                GameEvent::RoundWon => log::info!("YOU WIN!"),
                GameEvent::GameOver => log::info!("GAME OVER!"),
                GameEvent::Sound(_) | GameEvent::Particles(_) => {}
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("Lane Hopper (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(Path::new(&path)),
        None => Settings::default(),
    };
    let max_seconds = match args.next() {
        Some(raw) => raw.parse::<f32>()?,
        None => DEFAULT_MAX_SECONDS,
    };

    let clock_seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut game = Game::new(&settings, clock_seed, LogSink);
    log::info!(
        "Game initialized with seed: {} ({})",
        game.state.seed,
        settings.variant.as_str()
    );
    let mut wall_clock = 0.0f32;
    while wall_clock < max_seconds {
        wall_clock += FRAME_DT;
        if game.update(FRAME_DT) {
            break;
        }
    }
    if !game.state.is_round_over() {
        log::warn!("Demo round still running after {:.0}s", max_seconds);
    }
    log::info!(
        "{} particles still alive, effective volume {:.2}",
        game.particles.len(),
        game.audio.effective_volume()
    );

    println!("{}", serde_json::to_string_pretty(&game.state.snapshot())?);
    Ok(())
}
