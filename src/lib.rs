//! Code Runner - an endless runner where the bugs bite back
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, chaos, lifecycle)
//! - `renderer`: Scene building and Canvas 2D painting
//! - `platform`: Browser/native platform abstraction (storage)
//! - `highscore`: Persisted best score
//! - `tuning`: Data-driven game balance

pub mod highscore;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use highscore::HighScore;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Largest step a single frame may advance (tab-stall protection)
    pub const MAX_FRAME_DT: f32 = 0.08;

    /// Logical viewport used when the platform does not provide one
    pub const DEFAULT_WIDTH: f32 = 960.0;
    pub const DEFAULT_HEIGHT: f32 = 540.0;

    /// Height of the ground strip at the bottom of the screen
    pub const GROUND_H: f32 = 50.0;

    /// Player defaults - fixed column, only moves vertically
    pub const PLAYER_X: f32 = 80.0;
    pub const PLAYER_W: f32 = 28.0;
    pub const PLAYER_H: f32 = 36.0;
    pub const PLAYER_CROUCH_H: f32 = 18.0;
    /// How long an inverted-controls crouch lasts (seconds)
    pub const CROUCH_DURATION: f32 = 0.42;

    /// Base gravity (pixels/s²)
    pub const GRAVITY: f32 = 1600.0;
    /// Initial jump velocity (negative is up)
    pub const JUMP_VELOCITY: f32 = -520.0;

    /// Starting ground scroll speed (pixels/s)
    pub const BASE_SPEED: f32 = 240.0;
    /// Difficulty ramp, pixels/s gained per second of play
    pub const SPEED_RAMP: f32 = 0.015 * 100.0;

    /// Spawn intervals in seconds (shrink as speed grows)
    pub const SPAWN_BUG_INTERVAL: f32 = 1.25;
    pub const SPAWN_SNIPPET_INTERVAL: f32 = 1.8;
    pub const SPAWN_DUCK_INTERVAL: f32 = 8.0;

    /// Entities are culled once their right edge passes this x
    pub const OFFSCREEN_X: f32 = -20.0;

    /// Score awards
    pub const BUG_SQUASH_SCORE: f32 = 6.0;
    pub const SNIPPET_SCORE: f32 = 10.0;
    /// Distance scoring divisor: score/s = speed / DISTANCE_SCORE_DIV
    pub const DISTANCE_SCORE_DIV: f32 = 40.0;

    /// Rubber duck effects
    pub const INVINCIBILITY_DURATION: f32 = 5.0;
    pub const ROAST_DURATION: f32 = 8.0;

    /// Maximum retained chaos log lines
    pub const EVENT_LOG_CAPACITY: usize = 30;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
