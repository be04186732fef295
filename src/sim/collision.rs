//! Collision detection and response
//!
//! Everything is an axis-aligned box. Each entity category has its own
//! response; collections are walked in reverse so hits can be removed in place.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::draw::{CURSED_DUCK_MESSAGE, DUCK_ROASTS, DUCK_TABLE, DuckOutcome, pick_uniform};
use super::lifecycle::GameOverCause;
use super::state::{GameState, RevertAction, RoastFollower, SpeechBubble};
use crate::consts::*;

/// Axis-aligned bounding box (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Inclusive overlap test: touching edges count as a hit
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        !(a_max.x < b_min.x || a_min.x > b_max.x || a_max.y < b_min.y || a_min.y > b_max.y)
    }
}

/// Resolve all player collisions for this frame
///
/// Order is bugs, snippets, then ducks. Returns the cause if the run ended, in
/// which case the state is already in GameOver and later categories are not
/// checked.
pub fn resolve_collisions(state: &mut GameState) -> Option<GameOverCause> {
    if let Some(cause) = resolve_bugs(state) {
        return Some(cause);
    }
    resolve_snippets(state);
    resolve_ducks(state)
}

/// Bugs end the run unless the player is invincible, in which case they get
/// squashed for points.
pub fn resolve_bugs(state: &mut GameState) -> Option<GameOverCause> {
    let player = state.player.aabb();
    for i in (0..state.bugs.len()).rev() {
        if !player.overlaps(&state.bugs[i].aabb()) {
            continue;
        }
        if !state.player.invincible {
            state.end_game(GameOverCause::BugHit);
            return Some(GameOverCause::BugHit);
        }
        state.bugs.remove(i);
        state.score += BUG_SQUASH_SCORE;
        state.log_event("Invincible - you squashed a bug like a god.");
    }
    None
}

/// Snippets always score; explosive ones may also kick the scroll speed and
/// flash the screen.
pub fn resolve_snippets(state: &mut GameState) {
    let player = state.player.aabb();
    for i in (0..state.snippets.len()).rev() {
        if !player.overlaps(&state.snippets[i].aabb()) {
            continue;
        }
        let snippet = state.snippets.remove(i);
        state.score += SNIPPET_SCORE;

        if snippet.explosive && state.chance(state.tuning.explosion_chance) {
            state.log_event("Exploding snippet! Screen will glitch.");
            start_screen_invert(state, 0.9);
            let kick = state.roll_range(state.tuning.explosion_speed_factor);
            state.speed = (state.speed * (1.0 + kick)).max(1.0);
            log::debug!("Snippet {} exploded, speed now {:.1}", snippet.id, state.speed);
        }
    }
}

/// Ducks roll one of three outcomes
pub fn resolve_ducks(state: &mut GameState) -> Option<GameOverCause> {
    let player = state.player.aabb();
    for i in (0..state.ducks.len()).rev() {
        if !player.overlaps(&state.ducks[i].aabb()) {
            continue;
        }
        state.ducks.remove(i);
        let r = state.unit();
        if let Some(cause) = apply_duck_draw(state, r) {
            return Some(cause);
        }
    }
    None
}

/// Apply a collected duck's outcome for the given unit draw
pub fn apply_duck_draw(state: &mut GameState, r: f32) -> Option<GameOverCause> {
    match DUCK_TABLE.pick(r) {
        DuckOutcome::Invincible => {
            state.player.grant_invincibility(INVINCIBILITY_DURATION);
            state.log_event("Rubber duck acquired - invincible for 5s (maybe).");
            None
        }
        DuckOutcome::Roast => {
            start_roast(state);
            state.log_event("Rubber duck is judgemental and follows you.");
            None
        }
        DuckOutcome::Cursed => {
            state.log_event("The duck was cursed. You exploded. (worth it)");
            log::debug!("{CURSED_DUCK_MESSAGE}");
            state.end_game(GameOverCause::CursedDuck);
            Some(GameOverCause::CursedDuck)
        }
    }
}

/// Color-invert the screen for at least 0.6 seconds
pub fn start_screen_invert(state: &mut GameState, seconds: f32) {
    state.chaos.screen_inverted = true;
    state.schedule(seconds.max(0.6), RevertAction::EndScreenInvert);
}

/// Spawn the roasting follower; a second roast refreshes the timer
pub fn start_roast(state: &mut GameState) {
    state
        .scheduled
        .retain(|e| e.action != RevertAction::EndRoast);
    state.roast = Some(RoastFollower {
        pos: state.player.pos - Vec2::new(40.0, 20.0),
        size: Vec2::splat(14.0),
        next_line_in: 0.0,
    });
    state.schedule(ROAST_DURATION, RevertAction::EndRoast);
}

/// Drop a roast line near the player's head
pub fn roast_line(state: &mut GameState) {
    let r = state.unit();
    let text = (*pick_uniform(DUCK_ROASTS, r)).to_string();
    let dx = state.roll(-20.0, 20.0);
    let dy = state.roll(-10.0, 10.0);
    let pos = Vec2::new(
        state.player.pos.x + state.player.size.x / 2.0 - 10.0 + dx,
        state.player.pos.y - 30.0 + dy,
    );
    state.bubbles.push(SpeechBubble { text, pos, ttl: 2.2 });
}
