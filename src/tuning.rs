//! Data-driven game balance
//!
//! Every number that shapes difficulty lives here so it can be tweaked without
//! touching simulation code. Persisted overrides are read from LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::platform::storage;

/// Largest bug storm a stored override may ask for
const MAX_STORM_SIZE: u32 = 64;
/// An explosion may slow the world down but never stop or reverse it
const MIN_EXPLOSION_FACTOR: f32 = -0.9;

/// Inclusive-exclusive range used for random rolls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Map a unit draw `t` in [0, 1) into the range
    #[inline]
    pub fn at(&self, t: f32) -> f32 {
        crate::lerp(self.min, self.max, t)
    }

    fn clamped(self, lo: f32, hi: f32) -> Self {
        Self::new(self.min.clamp(lo, hi), self.max.clamp(lo, hi))
    }

    fn sanitized(self, fallback: Range) -> Self {
        if !self.min.is_finite() || !self.max.is_finite() {
            return fallback;
        }
        if self.min > self.max {
            Self::new(self.max, self.min)
        } else {
            self
        }
    }
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub gravity: f32,
    pub jump_velocity: f32,
    /// Chance a jump gets a random multiplier
    pub jump_jitter_chance: f32,
    pub jump_jitter: Range,

    // === World ===
    pub base_speed: f32,
    pub speed_ramp: f32,
    pub bug_interval: f32,
    pub bug_interval_min: f32,
    pub snippet_interval: f32,
    pub snippet_interval_min: f32,
    pub duck_interval: f32,
    pub duck_interval_min: f32,

    // === Entity behavior ===
    pub homing_chance: f32,
    pub glitchy_chance: f32,
    pub explosive_chance: f32,
    /// Chance an explosive snippet actually goes off
    pub explosion_chance: f32,
    /// Multiplicative scroll speed change when a snippet explodes
    pub explosion_speed_factor: Range,

    // === Chaos ===
    /// Delay between chaos triggers
    pub chaos_interval: Range,
    /// Extra grace before the first chaos of a run
    pub chaos_first_delay: Range,
    pub storm_size: u32,
    pub gravity_chaos: Range,
    pub insult_penalty: Range,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            jump_jitter_chance: 0.22,
            jump_jitter: Range::new(0.6, 1.6),

            base_speed: BASE_SPEED,
            speed_ramp: SPEED_RAMP,
            bug_interval: SPAWN_BUG_INTERVAL,
            bug_interval_min: 0.6,
            snippet_interval: SPAWN_SNIPPET_INTERVAL,
            snippet_interval_min: 0.9,
            duck_interval: SPAWN_DUCK_INTERVAL,
            duck_interval_min: 6.0,

            homing_chance: 0.12,
            glitchy_chance: 0.18,
            explosive_chance: 0.18,
            explosion_chance: 0.86,
            explosion_speed_factor: Range::new(-0.12, 0.22),

            chaos_interval: Range::new(6.0, 14.0),
            chaos_first_delay: Range::new(4.0, 8.0),
            storm_size: 8,
            gravity_chaos: Range::new(0.35, 2.4),
            insult_penalty: Range::new(10.0, 60.0),
        }
    }
}

impl Tuning {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "cr_tuning";

    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::sanitized)
    }

    /// Bug spawn interval at the given scroll speed
    pub fn bug_interval_at(&self, speed: f32) -> f32 {
        (self.bug_interval - (speed - self.base_speed) / 600.0).max(self.bug_interval_min)
    }

    /// Snippet spawn interval at the given scroll speed
    pub fn snippet_interval_at(&self, speed: f32) -> f32 {
        (self.snippet_interval - (speed - self.base_speed) / 800.0).max(self.snippet_interval_min)
    }

    /// Range the duck spawn threshold is rolled from at the given speed
    pub fn duck_window_at(&self, speed: f32) -> Range {
        let upper = (self.duck_interval - (speed - self.base_speed) / 300.0)
            .max(self.duck_interval_min);
        Range::new(self.duck_interval_min, upper)
    }

    /// Repair values that would break the simulation
    pub fn sanitized(self) -> Self {
        let d = Tuning::default();
        let finite_or = |v: f32, f: f32| if v.is_finite() { v } else { f };
        let chance = |v: f32, f: f32| finite_or(v, f).clamp(0.0, 1.0);
        Self {
            gravity: finite_or(self.gravity, d.gravity),
            jump_velocity: finite_or(self.jump_velocity, d.jump_velocity),
            jump_jitter_chance: chance(self.jump_jitter_chance, d.jump_jitter_chance),
            jump_jitter: self.jump_jitter.sanitized(d.jump_jitter),
            base_speed: finite_or(self.base_speed, d.base_speed).max(1.0),
            speed_ramp: finite_or(self.speed_ramp, d.speed_ramp).max(0.0),
            bug_interval: finite_or(self.bug_interval, d.bug_interval),
            bug_interval_min: finite_or(self.bug_interval_min, d.bug_interval_min).max(0.05),
            snippet_interval: finite_or(self.snippet_interval, d.snippet_interval),
            snippet_interval_min: finite_or(self.snippet_interval_min, d.snippet_interval_min)
                .max(0.05),
            duck_interval: finite_or(self.duck_interval, d.duck_interval),
            duck_interval_min: finite_or(self.duck_interval_min, d.duck_interval_min).max(0.05),
            homing_chance: chance(self.homing_chance, d.homing_chance),
            glitchy_chance: chance(self.glitchy_chance, d.glitchy_chance),
            explosive_chance: chance(self.explosive_chance, d.explosive_chance),
            explosion_chance: chance(self.explosion_chance, d.explosion_chance),
            explosion_speed_factor: self
                .explosion_speed_factor
                .sanitized(d.explosion_speed_factor)
                .clamped(MIN_EXPLOSION_FACTOR, f32::MAX),
            chaos_interval: self.chaos_interval.sanitized(d.chaos_interval),
            chaos_first_delay: self.chaos_first_delay.sanitized(d.chaos_first_delay),
            storm_size: self.storm_size.min(MAX_STORM_SIZE),
            gravity_chaos: self.gravity_chaos.sanitized(d.gravity_chaos),
            insult_penalty: self.insult_penalty.sanitized(d.insult_penalty),
        }
    }

    /// Load tuning overrides from storage, falling back to defaults
    pub fn load() -> Self {
        match storage::get_item(Self::STORAGE_KEY) {
            Some(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overrides");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring malformed tuning ({e}), using defaults");
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    /// Persist tuning overrides
    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            storage::set_item(Self::STORAGE_KEY, &json);
            log::info!("Tuning saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 900.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 900.0);
        assert_eq!(tuning.base_speed, BASE_SPEED);
        assert_eq!(tuning.storm_size, 8);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Tuning::from_json("{ gravity: nope").is_err());
    }

    #[test]
    fn test_sanitize_swaps_inverted_range_and_clamps_chance() {
        let tuning = Tuning::from_json(
            r#"{ "chaos_interval": { "min": 14.0, "max": 6.0 }, "homing_chance": 3.0 }"#,
        )
        .unwrap();
        assert_eq!(tuning.chaos_interval, Range::new(6.0, 14.0));
        assert_eq!(tuning.homing_chance, 1.0);
    }

    #[test]
    fn test_sanitize_caps_storm_size() {
        let tuning = Tuning::from_json(r#"{ "storm_size": 4000000000 }"#).unwrap();
        assert_eq!(tuning.storm_size, MAX_STORM_SIZE);
        let tuning = Tuning::from_json(r#"{ "storm_size": 12 }"#).unwrap();
        assert_eq!(tuning.storm_size, 12);
    }

    #[test]
    fn test_sanitize_rejects_negative_ramp() {
        let tuning = Tuning::from_json(r#"{ "speed_ramp": -400.0 }"#).unwrap();
        assert_eq!(tuning.speed_ramp, 0.0);
    }

    #[test]
    fn test_sanitize_keeps_explosion_from_reversing_speed() {
        let tuning =
            Tuning::from_json(r#"{ "explosion_speed_factor": { "min": -5.0, "max": -1.0 } }"#)
                .unwrap();
        let factor = tuning.explosion_speed_factor;
        assert_eq!(factor.min, MIN_EXPLOSION_FACTOR);
        assert_eq!(factor.max, MIN_EXPLOSION_FACTOR);
        assert!(1.0 + factor.at(0.0) > 0.0);
    }

    #[test]
    fn test_intervals_shrink_with_speed_but_respect_floor() {
        let tuning = Tuning::default();
        assert!((tuning.bug_interval_at(BASE_SPEED) - 1.25).abs() < 1e-6);
        assert!(tuning.bug_interval_at(BASE_SPEED + 300.0) < 1.25);
        assert_eq!(tuning.bug_interval_at(10_000.0), 0.6);
        assert_eq!(tuning.snippet_interval_at(10_000.0), 0.9);

        let window = tuning.duck_window_at(10_000.0);
        assert_eq!(window.min, 6.0);
        assert_eq!(window.max, 6.0);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let mut tuning = Tuning::default();
        tuning.storm_size = 3;
        tuning.save();
        assert_eq!(Tuning::load().storm_size, 3);
    }
}
