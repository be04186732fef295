//! Entity factory and spawn cadence
//!
//! New entities appear just past the right edge with randomized size and a
//! speed derived from the current scroll speed.

use glam::Vec2;

use super::draw::{BUG_SPEECH, STORM_SPEECH, pick_uniform};
use super::state::{Bug, Duck, GameState, Snippet};

/// Spawn one bug. Storm bugs are smaller, faster and shout about it.
pub fn spawn_bug(state: &mut GameState, storm: bool) {
    let h = state.roll(18.0, 32.0);
    let w = state.roll(26.0, 44.0);
    let y = state.ground_y() - h;
    let x = state.viewport.width + 20.0 + state.roll(0.0, 160.0);
    let speed = state.speed + state.roll(-10.0, 30.0);
    let r = state.unit();
    let speech = (*pick_uniform(BUG_SPEECH, r)).to_string();
    let speech_ttl = 1.6 + state.roll(0.0, 2.0);
    let glitchy = state.chance(state.tuning.glitchy_chance);
    let homing = state.chance(state.tuning.homing_chance);
    let id = state.next_entity_id();

    let mut bug = Bug {
        id,
        pos: Vec2::new(x, y),
        size: Vec2::new(w, h),
        speed,
        homing,
        glitchy,
        speech,
        speech_ttl,
    };

    // y is kept from the full-size roll, so storm bugs hover a little
    if storm {
        bug.size *= 0.6;
        bug.speed += 60.0;
        bug.speech = STORM_SPEECH.to_string();
        bug.speech_ttl = 2.2;
    }

    state.bugs.push(bug);
}

/// Spawn one snippet floating above the ground
pub fn spawn_snippet(state: &mut GameState) {
    let size = 14.0;
    let y = state.ground_y() - size - state.roll(40.0, 150.0);
    let x = state.viewport.width + 12.0 + state.roll(0.0, 80.0);
    let explosive = state.chance(state.tuning.explosive_chance);
    let id = state.next_entity_id();
    state.snippets.push(Snippet {
        id,
        pos: Vec2::new(x, y),
        size: Vec2::splat(size),
        speed: state.speed * 0.9,
        explosive,
    });
}

/// Spawn one rubber duck
pub fn spawn_duck(state: &mut GameState) {
    let size = 18.0;
    let y = state.ground_y() - size - state.roll(60.0, 160.0);
    let x = state.viewport.width + 12.0 + state.roll(0.0, 80.0);
    let id = state.next_entity_id();
    state.ducks.push(Duck {
        id,
        pos: Vec2::new(x, y),
        size: Vec2::splat(size),
        speed: state.speed * 0.95,
    });
}

/// Advance spawn timers and spawn whatever is due
pub fn update_spawns(state: &mut GameState, dt: f32) {
    state.spawn_bug_timer += dt;
    state.spawn_snippet_timer += dt;
    state.spawn_duck_timer += dt;

    if state.spawn_bug_timer > state.tuning.bug_interval_at(state.speed) {
        spawn_bug(state, false);
        state.spawn_bug_timer = 0.0;
    }

    if state.spawn_snippet_timer > state.tuning.snippet_interval_at(state.speed) {
        spawn_snippet(state);
        state.spawn_snippet_timer = 0.0;
    }

    // The duck threshold is re-rolled every frame
    let window = state.tuning.duck_window_at(state.speed);
    if state.spawn_duck_timer > state.roll_range(window) {
        spawn_duck(state);
        state.spawn_duck_timer = 0.0;
    }
}
