//! Idle/demo mode autopilot
//!
//! Plays the game through the same `TickInput` a human would produce.

use glam::Vec2;

use super::actor::Direction;
use super::collision::Rect;
use super::state::GameState;
use super::tick::TickInput;
use crate::consts::*;

/// Minimum time between two autopilot hops
const HOP_INTERVAL_SECS: f64 = 0.25;
/// How far ahead vehicle motion is projected when judging a square safe
const LOOK_AHEAD_SECS: f32 = 0.5;
const LOOK_AHEAD_SAMPLES: u32 = 6;
/// Extra clearance around the actor while projecting
const SAFETY_MARGIN: f32 = 6.0;

/// Fill in `input` for this frame. Queued moves from the host win.
pub fn drive(state: &GameState, input: &mut TickInput) {
    if state.is_round_over() {
        input.reset = true;
        return;
    }
    if !input.moves.is_empty() {
        return;
    }
    if let Some(last) = state.actor.last_hop_at {
        if state.clock - last < HOP_INTERVAL_SECS {
            return;
        }
    }
    if let Some(dir) = plan(state) {
        input.moves.push(dir);
    }
}

/// Choose the next hop, or `None` to wait where we are
pub fn plan(state: &GameState) -> Option<Direction> {
    let actor = &state.actor;
    let mut preferred = Vec::with_capacity(4);

    // Sidestep toward a token sitting on our row
    if let Some(target) = nearest_powerup_on_row(state) {
        if (target.x - actor.pos.x).abs() >= MOVE_DISTANCE / 2.0 {
            preferred.push(if target.x > actor.pos.x {
                Direction::Right
            } else {
                Direction::Left
            });
        }
    }
    preferred.push(Direction::Up);

    for dir in preferred {
        if let Some(target) = actor.move_target(dir) {
            if is_safe(state, target) {
                return Some(dir);
            }
        }
    }

    if actor.is_invincible() || is_safe(state, actor.pos) {
        return None;
    }

    // Standing in harm's way: dodge anywhere that is clear
    [Direction::Left, Direction::Right, Direction::Down]
        .into_iter()
        .find(|&dir| actor.move_target(dir).is_some_and(|t| is_safe(state, t)))
}

fn nearest_powerup_on_row(state: &GameState) -> Option<Vec2> {
    let pos = state.actor.pos;
    state
        .powerups
        .iter()
        .filter(|p| !p.collected && (p.pos.y - pos.y).abs() <= LANE_HEIGHT / 2.0)
        .min_by(|a, b| {
            let dist_a = (a.pos.x - pos.x).abs();
            let dist_b = (b.pos.x - pos.x).abs();
            dist_a
                .partial_cmp(&dist_b)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|p| p.pos)
}

/// True when no vehicle touches the actor's box at `pos` over the look-ahead
fn is_safe(state: &GameState, pos: Vec2) -> bool {
    if state.actor.is_invincible() {
        return true;
    }
    let probe = Rect::square(pos, state.actor.size + SAFETY_MARGIN * 2.0);
    let step = LOOK_AHEAD_SECS / LOOK_AHEAD_SAMPLES as f32;

    state.obstacles.iter().all(|obstacle| {
        let mut ghost = obstacle.clone();
        (0..=LOOK_AHEAD_SAMPLES).all(|i| {
            if i > 0 {
                ghost.advance(step);
            }
            !probe.intersects(&ghost.rect())
        })
    })
}
