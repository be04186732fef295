//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (owned by `GameState`)
//! - Deferred effects are data, polled by the frame tick
//! - No rendering or platform dependencies

pub mod chaos;
pub mod collision;
pub mod draw;
pub mod lifecycle;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, apply_duck_draw, resolve_collisions};
pub use draw::{CHAOS_TABLE, DUCK_TABLE, DrawTable, DuckOutcome};
pub use lifecycle::GameOverCause;
pub use state::{
    Bug, ChaosKind, ChaosState, Duck, EventLog, GameOverInfo, GamePhase, GameState, LogEntry,
    Player, RevertAction, ScheduledEffect, Snapshot, Snippet, SpeechBubble, Viewport,
};
pub use tick::{TickInput, autopilot_wants_jump, tick};
