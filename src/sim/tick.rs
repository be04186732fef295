//! Frame update
//!
//! One call per animation frame: inputs, reverts, spawns, chaos, physics,
//! collisions, scoring. A fatal collision returns immediately and nothing
//! further advances until a restart.

use super::state::{GamePhase, GameState};
use super::{chaos, collision, physics, spawn};
use crate::consts::*;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (space/up/tap/click)
    pub jump: bool,
    /// Restart after game over (R / restart button)
    pub restart: bool,
    /// Demo mode - a simple bot presses jump for you
    pub autopilot: bool,
}

/// Advance the session by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::Idle => {
            if input.jump || input.restart {
                state.reset();
            }
            return;
        }
        GamePhase::GameOver => {
            if input.restart {
                state.reset();
            }
            return;
        }
        GamePhase::Running => {}
    }

    // Clamp so a stalled tab doesn't teleport everything
    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    state.time += dt;
    state.uptime += dt;

    if input.jump || (input.autopilot && autopilot_wants_jump(state)) {
        state.jump();
    }

    chaos::apply_due_effects(state);

    // Difficulty ramps slowly
    state.speed += state.tuning.speed_ramp * dt;
    spawn::update_spawns(state, dt);

    chaos::update_trigger(state);

    physics::step(state, dt);

    if collision::resolve_collisions(state).is_some() {
        return;
    }

    // Distance scoring
    state.score += dt * (state.speed / DISTANCE_SCORE_DIV);
    state.high.observe(state.score);
}

/// Jump when a grounded bug is about to reach the player
pub fn autopilot_wants_jump(state: &GameState) -> bool {
    if !state.player.grounded || state.chaos.controls_inverted {
        return false;
    }
    let front = state.player.pos.x + state.player.size.x;
    let reach = state.speed * 0.3;
    state.bugs.iter().any(|bug| {
        let gap = bug.pos.x - front;
        gap >= 0.0 && gap <= reach && bug.pos.y + bug.size.y > state.player.pos.y
    })
}
