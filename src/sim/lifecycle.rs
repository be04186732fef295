//! Session lifecycle: Idle → Running → GameOver → Running
//!
//! Reset, game over, and the jump action (the only player input that touches
//! the simulation).

use serde::{Deserialize, Serialize};

use super::chaos;
use super::draw::{
    CURSED_DUCK_MESSAGE, DEATH_COMMENTS, DEATH_ERRORS, ERROR_TIPS, TIP_CHANCE, pick_uniform,
};
use super::state::{ChaosState, EventLog, GameOverInfo, GamePhase, GameState, Player, RevertAction};
use crate::consts::*;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// Ran into a bug without invincibility
    BugHit,
    /// Picked up a cursed duck
    CursedDuck,
}

impl GameOverCause {
    /// Extra line shown before the error message
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            GameOverCause::BugHit => None,
            GameOverCause::CursedDuck => Some(CURSED_DUCK_MESSAGE),
        }
    }
}

impl GameState {
    /// Start a fresh run
    ///
    /// Clears every entity, timer and pending revert. The chaos log and the
    /// best score survive across runs.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Running;
        self.time = 0.0;
        self.speed = self.tuning.base_speed;
        self.score = 0.0;
        self.spawn_bug_timer = 0.0;
        self.spawn_snippet_timer = 0.0;
        self.spawn_duck_timer = 0.0;
        self.bugs.clear();
        self.snippets.clear();
        self.ducks.clear();
        self.bubbles.clear();
        self.roast = None;
        self.player = Player::new(self.ground_y());
        self.chaos = ChaosState::default();
        self.scheduled.clear();
        self.game_over = None;
        chaos::arm_first_trigger(self);
        log::info!("Run started (seed {})", self.seed);
    }

    /// Stop the run and build the death overlay
    pub fn end_game(&mut self, cause: GameOverCause) {
        self.phase = GamePhase::GameOver;
        // Squash points earned this frame still count toward the best
        self.high.observe(self.score);

        let r = self.unit();
        let err = *pick_uniform(DEATH_ERRORS, r);
        let message = match cause.prefix() {
            Some(prefix) => format!("{prefix} - {err}"),
            None => err.to_string(),
        };
        let tip = if self.chance(TIP_CHANCE) {
            let r = self.unit();
            Some(pick_uniform(ERROR_TIPS, r).1.to_string())
        } else {
            None
        };
        let r = self.unit();
        let comment = pick_uniform(DEATH_COMMENTS, r).to_string();

        self.game_over = Some(GameOverInfo {
            title: "Debugging Failed!".to_string(),
            message,
            tip,
            comment,
            score: self.score.max(0.0).floor() as u64,
            high: self.high.best,
        });
        self.log_event("Game ended. Showed death overlay.");
        log::info!(
            "Game over ({:?}) at {:.1}s, score {}",
            cause,
            self.time,
            self.score.floor()
        );
    }

    /// Jump, or crouch while controls are inverted
    pub fn jump(&mut self) {
        if !self.is_running() {
            return;
        }

        if self.chaos.controls_inverted {
            self.player.set_height(PLAYER_CROUCH_H);
            self.schedule(CROUCH_DURATION, RevertAction::StandUp);
            self.log_event("Controls inverted - you crouched instead of jumping.");
            return;
        }

        if self.player.grounded {
            let jitter = if self.chance(self.tuning.jump_jitter_chance) {
                self.roll_range(self.tuning.jump_jitter)
            } else {
                1.0
            };
            self.player.vy = self.tuning.jump_velocity * jitter;
            self.player.grounded = false;
            if jitter > 1.3 {
                self.log_event("JUMP JITTER: You launched unpredictably!");
            }
        }
    }

    /// Read-only view of the chaos log
    pub fn events(&self) -> &EventLog {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{ChaosKind, Viewport};
    use crate::tuning::Tuning;

    fn running() -> GameState {
        let mut state = GameState::new(3, Viewport::default(), Tuning::default());
        state.reset();
        state
    }

    #[test]
    fn test_reset_starts_running_and_arms_chaos() {
        let state = running();
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.chaos.last_trigger_at >= 4.0 && state.chaos.last_trigger_at < 8.0);
        assert!(state.chaos.next_in >= 6.0 && state.chaos.next_in < 14.0);
    }

    #[test]
    fn test_reset_drops_pending_reverts() {
        let mut state = running();
        state.chaos.gravity_multiplier = 2.0;
        state.schedule(1.0, RevertAction::EndChaos(ChaosKind::PhysicsChaos));
        state.end_game(GameOverCause::BugHit);
        state.reset();
        assert!(state.scheduled.is_empty());
        assert_eq!(state.chaos.gravity_multiplier, 1.0);
        assert!(state.game_over.is_none());
    }

    #[test]
    fn test_game_over_info() {
        let mut state = running();
        state.score = 41.7;
        state.high.best = 99;
        state.end_game(GameOverCause::BugHit);
        let info = state.game_over.clone().unwrap();
        assert_eq!(info.title, "Debugging Failed!");
        assert!(DEATH_ERRORS.contains(&info.message.as_str()));
        assert!(DEATH_COMMENTS.contains(&info.comment.as_str()));
        assert_eq!(info.score, 41);
        assert_eq!(info.high, 99);
        assert_eq!(
            state.events().latest().map(|e| e.text.as_str()),
            Some("Game ended. Showed death overlay.")
        );
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut state = running();
        state.tuning.jump_jitter_chance = 0.0;
        state.jump();
        assert_eq!(state.player.vy, JUMP_VELOCITY);
        assert!(!state.player.grounded);

        state.player.vy = 10.0;
        state.jump();
        assert_eq!(state.player.vy, 10.0);
    }

    #[test]
    fn test_jump_jitter_scales_launch() {
        let mut state = running();
        state.tuning.jump_jitter_chance = 1.0;
        state.tuning.jump_jitter = crate::tuning::Range::new(1.5, 1.5);
        state.jump();
        assert!((state.player.vy - JUMP_VELOCITY * 1.5).abs() < 1e-3);
        assert_eq!(
            state.events().latest().map(|e| e.text.as_str()),
            Some("JUMP JITTER: You launched unpredictably!")
        );
    }

    #[test]
    fn test_inverted_jump_crouches() {
        let mut state = running();
        state.chaos.controls_inverted = true;
        let bottom = state.player.bottom();
        state.jump();
        assert_eq!(state.player.size.y, PLAYER_CROUCH_H);
        assert_eq!(state.player.bottom(), bottom);
        assert_eq!(state.player.vy, 0.0);
        assert!(
            state
                .scheduled
                .iter()
                .any(|e| e.action == RevertAction::StandUp)
        );
    }

    #[test]
    fn test_jump_ignored_after_game_over() {
        let mut state = running();
        state.end_game(GameOverCause::BugHit);
        state.jump();
        assert!(state.player.grounded);
        assert_eq!(state.player.vy, 0.0);
    }
}
