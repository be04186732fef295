//! Physics and movement
//!
//! Player gravity integration, invincibility countdown, world scrolling with
//! per-entity behaviors, off-screen culling and cosmetic aging.

use glam::Vec2;

use super::collision::roast_line;
use super::state::GameState;
use crate::consts::*;

/// Advance all physical state by `dt` seconds
pub fn step(state: &mut GameState, dt: f32) {
    update_player(state, dt);
    update_invincibility(state, dt);
    update_bugs(state, dt);
    update_pickups(state, dt);
    cull_offscreen(state);
    update_cosmetics(state, dt);
}

/// Gravity (scaled by chaos) and ground contact
pub fn update_player(state: &mut GameState, dt: f32) {
    let gravity = state.tuning.gravity * state.chaos.gravity_multiplier;
    let ground = state.ground_y();
    let player = &mut state.player;

    player.vy += gravity * dt;
    player.pos.y += player.vy * dt;

    if player.bottom() >= ground {
        player.pos.y = ground - player.size.y;
        player.vy = 0.0;
        player.grounded = true;
    } else {
        player.grounded = false;
    }
}

/// Count invincibility down; clears exactly once it reaches zero
pub fn update_invincibility(state: &mut GameState, dt: f32) {
    if !state.player.invincible {
        return;
    }
    state.player.inv_timer -= dt;
    if state.player.inv_timer <= 0.0 {
        state.player.invincible = false;
        state.player.inv_timer = 0.0;
        state.log_event("Invincibility ended.");
    }
}

/// Horizontal displacement for an entity with its own `speed`
#[inline]
fn scroll_delta(global_speed: f32, entity_speed: f32, dt: f32) -> f32 {
    global_speed * dt * (entity_speed / (global_speed + 1.0))
}

fn update_bugs(state: &mut GameState, dt: f32) {
    let player_y = state.player.pos.y;
    let speed = state.speed;
    let time = state.time;

    for i in (0..state.bugs.len()).rev() {
        if state.bugs[i].homing && state.chance(0.35) {
            let bug = &mut state.bugs[i];
            bug.pos.y += (player_y - bug.pos.y) * 0.04;
        }
        if state.bugs[i].glitchy && state.chance(0.05) {
            state.bugs[i].pos.y += (time * 20.0 + i as f32).sin() * 2.0;
        }

        let bug = &mut state.bugs[i];
        bug.pos.x -= scroll_delta(speed, bug.speed, dt);
        if bug.speech_ttl > 0.0 {
            bug.speech_ttl -= dt;
        }
    }
}

fn update_pickups(state: &mut GameState, dt: f32) {
    let speed = state.speed;
    for snippet in &mut state.snippets {
        snippet.pos.x -= scroll_delta(speed, snippet.speed, dt);
    }
    for duck in &mut state.ducks {
        duck.pos.x -= scroll_delta(speed, duck.speed, dt);
    }
}

/// Remove anything whose right edge has left the screen
pub fn cull_offscreen(state: &mut GameState) {
    state.bugs.retain(|b| b.pos.x + b.size.x >= OFFSCREEN_X);
    state.snippets.retain(|s| s.pos.x + s.size.x >= OFFSCREEN_X);
    state.ducks.retain(|d| d.pos.x + d.size.x >= OFFSCREEN_X);
}

/// Speech bubbles fade; the roasting duck chases the player and heckles
fn update_cosmetics(state: &mut GameState, dt: f32) {
    for bubble in &mut state.bubbles {
        bubble.ttl -= dt;
        bubble.pos.y -= 8.0 * dt;
    }
    state.bubbles.retain(|b| b.ttl > 0.0);

    let target = state.player.pos - Vec2::new(40.0, 20.0);
    let mut wants_line = false;
    if let Some(roast) = state.roast.as_mut() {
        roast.pos = roast.pos.lerp(target, (dt * 6.0).min(1.0));
        roast.next_line_in -= dt;
        wants_line = roast.next_line_in <= 0.0;
    }
    if wants_line {
        roast_line(state);
        let next = state.roll(1.5, 3.3);
        if let Some(roast) = state.roast.as_mut() {
            roast.next_line_in = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::start_roast;
    use crate::sim::spawn::{spawn_bug, spawn_duck, spawn_snippet};
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;

    fn running() -> GameState {
        let mut state = GameState::new(21, Viewport::default(), Tuning::default());
        state.reset();
        state
    }

    #[test]
    fn test_grounded_player_stays_put() {
        let mut state = running();
        let y = state.player.pos.y;
        for _ in 0..10 {
            update_player(&mut state, 1.0 / 60.0);
        }
        assert_eq!(state.player.pos.y, y);
        assert!(state.player.grounded);
        assert_eq!(state.player.vy, 0.0);
    }

    #[test]
    fn test_jump_arc_lands() {
        let mut state = running();
        state.tuning.jump_jitter_chance = 0.0;
        state.jump();
        update_player(&mut state, 0.05);
        assert!(!state.player.grounded);
        assert!(state.player.bottom() < state.ground_y());
        for _ in 0..40 {
            update_player(&mut state, 0.05);
        }
        assert!(state.player.grounded);
        assert_eq!(state.player.bottom(), state.ground_y());
    }

    #[test]
    fn test_gravity_multiplier_scales_fall() {
        let mut a = running();
        let mut b = running();
        a.player.pos.y -= 200.0;
        b.player.pos.y -= 200.0;
        b.chaos.gravity_multiplier = 2.0;
        update_player(&mut a, 0.05);
        update_player(&mut b, 0.05);
        assert!((b.player.vy - 2.0 * a.player.vy).abs() < 1e-3);
    }

    #[test]
    fn test_invincibility_clears_at_zero() {
        let mut state = running();
        state.player.grant_invincibility(0.1);
        update_invincibility(&mut state, 0.06);
        assert!(state.player.invincible);
        update_invincibility(&mut state, 0.06);
        assert!(!state.player.invincible);
        assert_eq!(state.player.inv_timer, 0.0);
        assert_eq!(
            state.events().latest().map(|e| e.text.as_str()),
            Some("Invincibility ended.")
        );
    }

    #[test]
    fn test_entities_scroll_left_and_cull() {
        let mut state = running();
        spawn_bug(&mut state, false);
        spawn_snippet(&mut state);
        spawn_duck(&mut state);
        let x0 = state.snippets[0].pos.x;
        step(&mut state, 0.05);
        assert!(state.snippets[0].pos.x < x0);

        state.bugs[0].pos.x = -100.0;
        state.ducks[0].pos.x = OFFSCREEN_X - 18.0;
        cull_offscreen(&mut state);
        assert!(state.bugs.is_empty());
        assert_eq!(state.ducks.len(), 1, "right edge exactly at threshold stays");
        assert_eq!(state.snippets.len(), 1);
    }

    #[test]
    fn test_homing_bug_drifts_toward_player() {
        let mut state = running();
        spawn_bug(&mut state, false);
        state.bugs[0].homing = true;
        state.bugs[0].glitchy = false;
        state.bugs[0].pos.y = 100.0;
        for _ in 0..60 {
            update_bugs(&mut state, 1.0 / 60.0);
        }
        assert!(state.bugs[0].pos.y > 100.0);
        assert!(state.bugs[0].pos.y <= state.player.pos.y);
    }

    #[test]
    fn test_glitchy_bug_jitters_vertically() {
        let mut state = running();
        state.tuning.glitchy_chance = 1.0;
        state.tuning.homing_chance = 0.0;
        spawn_bug(&mut state, false);
        assert!(state.bugs[0].glitchy);
        // Noise is sin-shaped over session time; t = 0 would be a flat spot
        state.time = 1.0;

        let y0 = state.bugs[0].pos.y;
        let mut moved = false;
        for _ in 0..300 {
            let before = state.bugs[0].pos.y;
            update_bugs(&mut state, 1.0 / 60.0);
            let step = (state.bugs[0].pos.y - before).abs();
            assert!(step <= 2.0 + 1e-4);
            moved |= state.bugs[0].pos.y != y0;
        }
        assert!(moved);
    }

    #[test]
    fn test_bubbles_expire_and_roast_heckles() {
        let mut state = running();
        start_roast(&mut state);
        update_cosmetics(&mut state, 0.016);
        assert_eq!(state.bubbles.len(), 1);
        for _ in 0..200 {
            update_cosmetics(&mut state, 0.016);
        }
        assert!(state.bubbles.iter().all(|b| b.ttl > 0.0));
        assert!(state.bubbles.len() <= 2);
    }
}
