//! Best score persistence
//!
//! A single integer persisted to LocalStorage. The simulation only tracks the
//! value; the platform loop saves it whenever it changes.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// The best score ever observed on this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "cr_high";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Fold a live score into the best. Returns true if the best changed.
    ///
    /// A score only counts once it beats the stored integer, and the stored
    /// value is the floor of that score.
    pub fn observe(&mut self, score: f32) -> bool {
        if score > self.best as f32 {
            let floored = score.floor().max(0.0) as u64;
            if floored != self.best {
                self.best = floored;
                return true;
            }
        }
        false
    }

    /// Load the best score, treating missing or garbled values as zero
    pub fn load() -> Self {
        match storage::get_item(Self::STORAGE_KEY) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(best) => {
                    log::info!("Loaded high score {best}");
                    Self { best }
                }
                Err(_) => {
                    log::warn!("Stored high score '{raw}' is not a number, starting fresh");
                    Self::default()
                }
            },
            None => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
        }
    }

    /// Persist the best score
    pub fn save(&self) {
        storage::set_item(Self::STORAGE_KEY, &self.best.to_string());
        log::debug!("High score saved ({})", self.best);
    }
}
