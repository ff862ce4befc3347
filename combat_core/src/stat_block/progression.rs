//! Experience and level-up growth

use super::StatBlock;
use crate::rules::{EXPERIENCE_BASE, EXPERIENCE_GROWTH, LEVEL_UP_PROFICIENCY_BASE};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("Failed to level up, need {needed} more experience (have {current}, next level at {threshold})")]
    PrematureLevelUp {
        current: u32,
        threshold: u32,
        needed: u32,
    },
}

/// Experience needed to advance from `level`: `floor(100 × 1.2^level)`
pub fn experience_for_level(level: u32) -> u32 {
    let exponent = i32::try_from(level).unwrap_or(i32::MAX);
    (EXPERIENCE_BASE * EXPERIENCE_GROWTH.powi(exponent)).floor() as u32
}

impl StatBlock {
    /// Experience needed to leave the current level
    pub fn experience_to_next_level(&self) -> u32 {
        experience_for_level(self.level)
    }

    /// Add experience, leveling up as many times as it covers
    ///
    /// Returns the number of levels gained.
    pub fn add_experience(&mut self, amount: u32) -> u32 {
        self.experience = self.experience.saturating_add(amount);
        let mut gained = 0;
        while self.experience >= self.experience_to_next_level() {
            self.apply_level_up();
            gained += 1;
        }
        gained
    }

    /// Advance exactly one level
    ///
    /// Fails when the current experience does not reach the threshold.
    pub fn level_up(&mut self) -> Result<u32, ProgressionError> {
        let threshold = self.experience_to_next_level();
        if self.experience < threshold {
            return Err(ProgressionError::PrematureLevelUp {
                current: self.experience,
                threshold,
                needed: threshold - self.experience,
            });
        }
        self.apply_level_up();
        Ok(self.level)
    }

    fn apply_level_up(&mut self) {
        let threshold = self.experience_to_next_level();
        self.experience -= threshold;
        self.level += 1;

        // Zero threshold would only come from a degenerate curve
        let divisor = f64::from(threshold.max(1));
        for (proficiency, used) in std::mem::take(&mut self.usage) {
            let current = self
                .proficiencies
                .get(&proficiency)
                .copied()
                .unwrap_or(LEVEL_UP_PROFICIENCY_BASE);
            self.proficiencies
                .insert(proficiency, current + used / divisor);
        }

        self.restore();
        debug!(level = self.level, leftover = self.experience, "level up");
    }
}
