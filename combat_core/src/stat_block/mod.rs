//! StatBlock - Resources, attributes and proficiencies of one entity
//!
//! Health and mana are always clamped into `[0, max]`. Health reaching 0
//! kills the entity and death is permanent for the rest of the battle:
//! later writes to health are ignored.

mod progression;

pub use progression::{experience_for_level, ProgressionError};

use crate::rules::DEFAULT_PROFICIENCY;
use crate::types::{Proficiency, Stance};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    max_health: f64,
    health: f64,
    max_mana: f64,
    mana: f64,
    pub magic: f64,
    pub strength: f64,
    pub defense: f64,
    level: u32,
    experience: u32,
    proficiencies: BTreeMap<Proficiency, f64>,
    /// Usage accumulated since the last level-up, consumed when leveling
    usage: BTreeMap<Proficiency, f64>,
    alive: bool,
    /// Whether the entity's stats have been revealed (by a scan)
    pub visible: bool,
    stance: Stance,
}

impl Default for StatBlock {
    fn default() -> Self {
        StatBlock::new(100.0, 0.0, 0.0, 0.0, 0.0)
    }
}

impl StatBlock {
    /// Create a stat block at full health and mana, level 1
    pub fn new(max_health: f64, max_mana: f64, magic: f64, strength: f64, defense: f64) -> Self {
        let max_health = max_health.max(0.0);
        let max_mana = max_mana.max(0.0);
        StatBlock {
            max_health,
            health: max_health,
            max_mana,
            mana: max_mana,
            magic,
            strength,
            defense,
            level: 1,
            experience: 0,
            proficiencies: BTreeMap::new(),
            usage: BTreeMap::new(),
            alive: max_health > 0.0,
            visible: false,
            stance: Stance::Ready,
        }
    }

    // === Resources ===

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn max_health(&self) -> f64 {
        self.max_health
    }

    pub fn missing_health(&self) -> f64 {
        self.max_health - self.health
    }

    /// Set health, clamped to `[0, max_health]`; returns the stored value
    ///
    /// Reaching 0 marks the block dead. A dead block ignores the write.
    pub fn set_health(&mut self, value: f64) -> f64 {
        if !self.alive {
            warn!(value, "ignoring health change on a dead entity");
            return self.health;
        }
        self.health = value.clamp(0.0, self.max_health);
        if self.health <= 0.0 {
            self.health = 0.0;
            self.alive = false;
        }
        self.health
    }

    /// Change max health, keeping current health in range
    pub fn set_max_health(&mut self, value: f64) {
        self.max_health = value.max(0.0);
        self.health = self.health.min(self.max_health);
    }

    pub fn mana(&self) -> f64 {
        self.mana
    }

    pub fn max_mana(&self) -> f64 {
        self.max_mana
    }

    /// Set mana, clamped to `[0, max_mana]`; returns the stored value
    pub fn set_mana(&mut self, value: f64) -> f64 {
        self.mana = value.clamp(0.0, self.max_mana);
        self.mana
    }

    pub fn set_max_mana(&mut self, value: f64) {
        self.max_mana = value.max(0.0);
        self.mana = self.mana.min(self.max_mana);
    }

    /// Refill health (if alive) and mana
    pub fn restore(&mut self) {
        if self.alive {
            self.health = self.max_health;
        }
        self.mana = self.max_mana;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    // === Progression state ===

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    /// Set the level directly, clearing experience
    pub fn set_level(&mut self, level: u32) {
        self.level = level;
        self.experience = 0;
    }

    pub fn set_experience(&mut self, experience: u32) {
        self.experience = experience;
    }

    // === Proficiencies ===

    /// Proficiency multiplier for a category (0.5 when untrained)
    pub fn proficiency(&self, proficiency: Proficiency) -> f64 {
        self.proficiencies
            .get(&proficiency)
            .copied()
            .unwrap_or(DEFAULT_PROFICIENCY)
    }

    pub fn has_proficiency(&self, proficiency: Proficiency) -> bool {
        self.proficiencies.contains_key(&proficiency)
    }

    pub fn set_proficiency(&mut self, proficiency: Proficiency, value: f64) {
        self.proficiencies.insert(proficiency, value);
    }

    pub fn proficiencies(&self) -> &BTreeMap<Proficiency, f64> {
        &self.proficiencies
    }

    /// Record one use of a proficiency
    pub fn record_usage(&mut self, proficiency: Proficiency, increment: f64) {
        *self.usage.entry(proficiency).or_insert(0.0) += increment;
    }

    /// Usage accumulated since the last level-up
    pub fn usage(&self, proficiency: Proficiency) -> f64 {
        self.usage.get(&proficiency).copied().unwrap_or(0.0)
    }

    // === Stance ===

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn set_stance(&mut self, stance: Stance) {
        self.stance = stance;
    }

    pub fn is_defending(&self) -> bool {
        self.stance == Stance::Defending
    }

    /// Format proficiencies as `name: value` pairs
    pub fn proficiencies_summary(&self) -> String {
        self.proficiencies
            .iter()
            .map(|(name, value)| format!("{name}: {value:.2}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_block_is_full() {
        let stats = StatBlock::new(100.0, 50.0, 8.0, 8.0, 8.0);
        assert_eq!(stats.health(), 100.0);
        assert_eq!(stats.mana(), 50.0);
        assert_eq!(stats.level(), 1);
        assert!(stats.is_alive());
    }

    #[test]
    fn test_health_clamps_and_kills() {
        let mut stats = StatBlock::new(100.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(stats.set_health(250.0), 100.0);
        assert_eq!(stats.set_health(-5.0), 0.0);
        assert!(!stats.is_alive());
    }

    #[test]
    fn test_death_is_permanent() {
        let mut stats = StatBlock::new(100.0, 0.0, 0.0, 0.0, 0.0);
        stats.set_health(0.0);
        assert_eq!(stats.set_health(50.0), 0.0);
        stats.restore();
        assert_eq!(stats.health(), 0.0);
        assert!(!stats.is_alive());
    }

    #[test]
    fn test_default_proficiency() {
        let mut stats = StatBlock::default();
        assert_eq!(stats.proficiency(Proficiency::Slashing), 0.5);
        stats.set_proficiency(Proficiency::Slashing, 1.5);
        assert_eq!(stats.proficiency(Proficiency::Slashing), 1.5);
        assert!(!stats.has_proficiency(Proficiency::Bow));
    }

    #[test]
    fn test_usage_accumulates() {
        let mut stats = StatBlock::default();
        stats.record_usage(Proficiency::Stealth, 5.0);
        stats.record_usage(Proficiency::Stealth, 5.0);
        assert_eq!(stats.usage(Proficiency::Stealth), 10.0);
        assert_eq!(stats.usage(Proficiency::Bow), 0.0);
    }

    #[test]
    fn test_summary_format() {
        let mut stats = StatBlock::default();
        stats.set_proficiency(Proficiency::Bow, 1.0);
        stats.set_proficiency(Proficiency::HandToHand, 0.75);
        assert_eq!(stats.proficiencies_summary(), "hand-to-hand: 0.75, bow: 1.00");
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_range(max in 1.0f64..1000.0, value in -2000.0f64..2000.0) {
            let mut stats = StatBlock::new(max, 0.0, 0.0, 0.0, 0.0);
            let stored = stats.set_health(value);
            prop_assert!((0.0..=max).contains(&stored));
            prop_assert_eq!(stats.is_alive(), stored > 0.0);
        }

        #[test]
        fn prop_mana_stays_in_range(max in 0.0f64..500.0, value in -1000.0f64..1000.0) {
            let mut stats = StatBlock::new(10.0, max, 0.0, 0.0, 0.0);
            let stored = stats.set_mana(value);
            prop_assert!((0.0..=max).contains(&stored));
        }
    }
}
