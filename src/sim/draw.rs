//! Weighted draw tables and message pools
//!
//! Randomized branching is data: a table of cumulative upper bounds consumed by
//! a single draw. Callers pass the draw in, so tests can force any row.

use serde::{Deserialize, Serialize};

use super::state::ChaosKind;

/// Ordered rows of `(cumulative upper bound, value)`
///
/// A draw `r` selects the first row whose bound is strictly greater than `r`.
/// Draws at or past the last bound select the last row.
#[derive(Debug, Clone, Copy)]
pub struct DrawTable<T: 'static> {
    rows: &'static [(f32, T)],
}

impl<T: Copy> DrawTable<T> {
    pub const fn new(rows: &'static [(f32, T)]) -> Self {
        Self { rows }
    }

    pub fn pick(&self, r: f32) -> T {
        self.rows
            .iter()
            .find(|(bound, _)| r < *bound)
            .or_else(|| self.rows.last())
            .map(|(_, v)| *v)
            .expect("draw table must not be empty")
    }

    pub fn rows(&self) -> &'static [(f32, T)] {
        self.rows
    }
}

/// Pick from a uniform pool with a unit draw `r` in [0, 1)
pub fn pick_uniform<T>(pool: &[T], r: f32) -> &T {
    let idx = ((r.clamp(0.0, 1.0) * pool.len() as f32) as usize).min(pool.len() - 1);
    &pool[idx]
}

/// Chaos dispatch weights (cumulative)
pub const CHAOS_TABLE: DrawTable<ChaosKind> = DrawTable::new(&[
    (0.16, ChaosKind::FakeUpdate),
    (0.34, ChaosKind::InvertControls),
    (0.54, ChaosKind::PhysicsChaos),
    (0.72, ChaosKind::BugStorm),
    (0.88, ChaosKind::InsultBanner),
    (1.0, ChaosKind::RandomGlitch),
]);

/// What happens when the player grabs a rubber duck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuckOutcome {
    /// Timed invincibility
    Invincible,
    /// A judgemental duck follows the player around
    Roast,
    /// The duck was cursed; the run ends
    Cursed,
}

pub const DUCK_TABLE: DrawTable<DuckOutcome> = DrawTable::new(&[
    (0.60, DuckOutcome::Invincible),
    (0.90, DuckOutcome::Roast),
    (1.0, DuckOutcome::Cursed),
]);

/// Death screen error lines
pub const DEATH_ERRORS: &[&str] = &[
    "Segmentation fault: core dumped 🪦",
    "UnhandledPromiseRejection: caffeine missing ☕",
    "404: Debugging skills not found",
    "NullPointer: brain == null",
    "SyntaxError: life unexpected token",
    "RangeError: patience exceeded",
    "TypeError: coffee is not a function",
];

/// Chance the death screen carries a real tip
pub const TIP_CHANCE: f32 = 0.46;

/// Small genuinely useful descriptions shown on death
pub const ERROR_TIPS: &[(&str, &str)] = &[
    (
        "NullPointer",
        "Accessing a null reference. Check your object initialization.",
    ),
    (
        "SyntaxError",
        "Look for missing brackets, commas or unmatched quotes.",
    ),
    (
        "UnhandledPromiseRejection",
        "You forgot to catch a rejected promise; use try/catch or .catch()",
    ),
    (
        "Segmentation fault",
        "Memory access violation, usually in native languages.",
    ),
];

pub const DEATH_COMMENTS: &[&str] = &[
    "Skill issue. Try again.",
    "You write code like a sleeping bot.",
    "Score archived in the void.",
    "Touch grass 🌱",
    "Refactor your life, maybe.",
];

pub const DUCK_ROASTS: &[&str] = &[
    "Did you forget semicolons or your life choices?",
    "I watched your commit history... it's tragic.",
    "Have you tried turning it off and on again?",
    "This code needs prayer and a migration.",
];

pub const BUG_SPEECH: &[&str] = &[
    "Unexpected token: ;",
    "ReferenceError: x is not defined",
    "Stack overflow (not the website)",
    "I ate your for-loop 🐛",
    "404: variable not found",
];

pub const STORM_SPEECH: &str = "BUG STORM!";
pub const CURSED_DUCK_MESSAGE: &str = "The rubber duck betrayed you.";
pub const INSULT_BANNER: &str = "Skill issue. Score down.";
