//! Chaos scheduler
//!
//! A periodic trigger picks one of six perturbations from [`CHAOS_TABLE`] and
//! queues its revert as a [`ScheduledEffect`]. Reverts are polled by the frame
//! loop, so they stop with the run and vanish on reset.
//!
//! [`ScheduledEffect`]: super::state::ScheduledEffect

use glam::Vec2;

use super::draw::{CHAOS_TABLE, INSULT_BANNER};
use super::spawn::{spawn_bug, spawn_snippet};
use super::state::{ChaosKind, FakeUpdate, GameState, RevertAction, SpeechBubble};
use crate::consts::*;

/// Set the first trigger after a grace period
pub fn arm_first_trigger(state: &mut GameState) {
    let delay = state.roll_range(state.tuning.chaos_first_delay);
    state.chaos.last_trigger_at = state.time + delay;
    state.chaos.next_in = state.roll_range(state.tuning.chaos_interval);
}

/// Fire a chaos event if the trigger timer has elapsed
pub fn update_trigger(state: &mut GameState) -> Option<ChaosKind> {
    if state.time - state.chaos.last_trigger_at > state.chaos.next_in {
        state.chaos.last_trigger_at = state.time;
        state.chaos.next_in = state.roll_range(state.tuning.chaos_interval);
        return Some(trigger_random_chaos(state));
    }
    None
}

/// Draw once and dispatch the matching event
pub fn trigger_random_chaos(state: &mut GameState) -> ChaosKind {
    let r = state.unit();
    let kind = CHAOS_TABLE.pick(r);
    start_chaos(state, kind);
    kind
}

/// Apply a chaos event's effect and schedule its revert
pub fn start_chaos(state: &mut GameState, kind: ChaosKind) {
    state.chaos.active = Some(kind);
    log::debug!("Chaos at {:.1}s: {}", state.time, kind.label());

    let duration = match kind {
        ChaosKind::FakeUpdate => {
            let duration = state.roll(1.1, 2.1);
            state.chaos.fake_update = Some(FakeUpdate {
                started_at: state.time,
                duration,
            });
            state.log_event("Fake \"Windows Update\" started - the demo is paused.");
            duration
        }
        ChaosKind::InvertControls => {
            state.chaos.controls_inverted = true;
            state.log_event("Controls inverted! Jump will crouch for a short while.");
            state.roll(3.2, 5.0)
        }
        ChaosKind::PhysicsChaos => {
            let multiplier = state.roll_range(state.tuning.gravity_chaos);
            state.chaos.gravity_multiplier = multiplier;
            state.log_event(format!("Physics chaos: gravity x{multiplier:.2}."));
            state.roll(3.6, 6.0)
        }
        ChaosKind::BugStorm => {
            state.log_event("Bug storm: many insects inbound!");
            for _ in 0..state.tuning.storm_size {
                spawn_bug(state, true);
            }
            state.roll(3.0, 4.2)
        }
        ChaosKind::InsultBanner => {
            let penalty = state.roll_range(state.tuning.insult_penalty);
            state.score = (state.score - penalty).max(0.0);
            state.log_event("Score insult: score randomly decreased and an insult shows.");
            state.bubbles.push(SpeechBubble {
                text: INSULT_BANNER.to_string(),
                pos: Vec2::new(state.viewport.width / 2.0, state.viewport.height / 2.0 - 40.0),
                ttl: 2.4,
            });
            2.2
        }
        ChaosKind::RandomGlitch => {
            spawn_snippet(state);
            spawn_bug(state, false);
            state.log_event("A random glitch spawned stuff.");
            1.6
        }
    };

    state.schedule(duration, RevertAction::EndChaos(kind));
}

/// Apply every revert whose time has come
pub fn apply_due_effects(state: &mut GameState) {
    for effect in state.take_due_effects() {
        apply_revert(state, effect.action);
    }
}

/// Undo one deferred effect
pub fn apply_revert(state: &mut GameState, action: RevertAction) {
    match action {
        RevertAction::EndChaos(kind) => end_chaos(state, kind),
        RevertAction::StandUp => state.player.set_height(PLAYER_H),
        RevertAction::EndScreenInvert => state.chaos.screen_inverted = false,
        RevertAction::EndRoast => {
            if state.roast.take().is_some() {
                state.log_event("Duck roast ended.");
            }
        }
    }
}

fn end_chaos(state: &mut GameState, kind: ChaosKind) {
    match kind {
        ChaosKind::FakeUpdate => {
            state.chaos.fake_update = None;
            state.log_event("Windows Update finished. Resume.");
        }
        ChaosKind::InvertControls => {
            state.chaos.controls_inverted = false;
            state.log_event("Controls returned to normal.");
        }
        ChaosKind::PhysicsChaos => {
            state.chaos.gravity_multiplier = 1.0;
            state.log_event("Physics normalized.");
        }
        ChaosKind::BugStorm => state.log_event("Bug storm subsided."),
        ChaosKind::InsultBanner | ChaosKind::RandomGlitch => {}
    }

    // A newer event may own the indicator by now
    if state.chaos.active == Some(kind) {
        state.chaos.active = None;
    }
    log::debug!("Chaos reverted at {:.1}s: {}", state.time, kind.label());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;

    fn running() -> GameState {
        let mut state = GameState::new(5, Viewport::default(), Tuning::default());
        state.reset();
        state
    }

    fn revert_at(state: &GameState, kind: ChaosKind) -> f32 {
        state
            .scheduled
            .iter()
            .find(|e| e.action == RevertAction::EndChaos(kind))
            .map(|e| e.at)
            .expect("revert scheduled")
    }

    #[test]
    fn test_trigger_waits_for_timer() {
        let mut state = running();
        state.chaos.last_trigger_at = 0.0;
        state.chaos.next_in = 6.0;
        state.time = 6.0;
        assert_eq!(update_trigger(&mut state), None);
        state.time = 6.01;
        assert!(update_trigger(&mut state).is_some());
        assert_eq!(state.chaos.last_trigger_at, 6.01);
        assert!(state.chaos.next_in >= 6.0 && state.chaos.next_in < 14.0);
        assert!(state.chaos.active.is_some());
    }

    #[test]
    fn test_physics_chaos_sets_and_restores_gravity() {
        let mut state = running();
        start_chaos(&mut state, ChaosKind::PhysicsChaos);
        let g = state.chaos.gravity_multiplier;
        assert!((0.35..2.4).contains(&g));
        let at = revert_at(&state, ChaosKind::PhysicsChaos);
        assert!((3.6..6.0).contains(&at));

        state.time = at;
        apply_due_effects(&mut state);
        assert_eq!(state.chaos.gravity_multiplier, 1.0);
        assert_eq!(state.chaos.active, None);
    }

    #[test]
    fn test_invert_controls_round_trip() {
        let mut state = running();
        start_chaos(&mut state, ChaosKind::InvertControls);
        assert!(state.chaos.controls_inverted);
        state.time = revert_at(&state, ChaosKind::InvertControls);
        apply_due_effects(&mut state);
        assert!(!state.chaos.controls_inverted);
    }

    #[test]
    fn test_bug_storm_spawns_storm_size() {
        let mut state = running();
        start_chaos(&mut state, ChaosKind::BugStorm);
        assert_eq!(state.bugs.len(), 8);
        assert!(state.bugs.iter().all(|b| b.speech == "BUG STORM!"));
    }

    #[test]
    fn test_insult_banner_never_goes_negative() {
        let mut state = running();
        state.score = 5.0;
        start_chaos(&mut state, ChaosKind::InsultBanner);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.bubbles.len(), 1);
        assert_eq!(revert_at(&state, ChaosKind::InsultBanner), 2.2);
    }

    #[test]
    fn test_random_glitch_spawns_pair() {
        let mut state = running();
        start_chaos(&mut state, ChaosKind::RandomGlitch);
        assert_eq!(state.bugs.len(), 1);
        assert_eq!(state.snippets.len(), 1);
    }

    #[test]
    fn test_fake_update_progress_and_clear() {
        let mut state = running();
        start_chaos(&mut state, ChaosKind::FakeUpdate);
        let fu = state.chaos.fake_update.expect("overlay shown");
        assert!((1.1..2.1).contains(&fu.duration));
        state.time = revert_at(&state, ChaosKind::FakeUpdate);
        apply_due_effects(&mut state);
        assert!(state.chaos.fake_update.is_none());
    }

    #[test]
    fn test_stale_revert_keeps_newer_indicator() {
        let mut state = running();
        start_chaos(&mut state, ChaosKind::RandomGlitch);
        start_chaos(&mut state, ChaosKind::InvertControls);
        state.time = 1.6;
        apply_due_effects(&mut state);
        assert_eq!(state.chaos.active, Some(ChaosKind::InvertControls));
        assert!(state.chaos.controls_inverted);
    }
}
