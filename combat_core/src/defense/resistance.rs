//! Resistance - Per damage type mitigation
//!
//! Formula: `damage_taken = amount × (1 - resistance)`
//!
//! Resistance is not clamped. 0 is neutral, 1 is immunity, values above 1
//! turn the hit into healing and negative values amplify it. Undead
//! monsters rely on this: healing resistance 1.75 makes healing spells hurt.

use crate::types::DamageType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Calculate the amount left after resistance
pub fn apply_resistance(amount: f64, resistance: f64) -> f64 {
    amount * (1.0 - resistance)
}

/// Resistances keyed by damage type; absent types are neutral
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResistanceTable {
    values: BTreeMap<DamageType, f64>,
}

impl ResistanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resistance against a damage type (0 when unset)
    pub fn get(&self, damage_type: DamageType) -> f64 {
        self.values.get(&damage_type).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, damage_type: DamageType, value: f64) {
        self.values.insert(damage_type, value);
    }

    /// Replace every entry at once
    pub fn fix(&mut self, values: impl IntoIterator<Item = (DamageType, f64)>) {
        self.values = values.into_iter().collect();
    }

    /// Mitigate an amount of the given type
    pub fn mitigate(&self, amount: f64, damage_type: DamageType) -> f64 {
        apply_resistance(amount, self.get(damage_type))
    }

    pub fn iter(&self) -> impl Iterator<Item = (DamageType, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(DamageType, f64)> for ResistanceTable {
    fn from_iter<I: IntoIterator<Item = (DamageType, f64)>>(iter: I) -> Self {
        ResistanceTable {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_resistance_is_neutral() {
        let table = ResistanceTable::new();
        assert_eq!(table.get(DamageType::Fire), 0.0);
        assert!((table.mitigate(30.0, DamageType::Fire) - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_resistance() {
        let table: ResistanceTable = [(DamageType::Ice, 0.5)].into_iter().collect();
        assert!((table.mitigate(20.0, DamageType::Ice) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_full_immunity() {
        let table: ResistanceTable = [(DamageType::Poison, 1.0)].into_iter().collect();
        assert_eq!(table.mitigate(9.0, DamageType::Poison), 0.0);
    }

    #[test]
    fn test_undead_invert_healing() {
        // Healing arrives as a negative amount; 1.75 flips it into damage
        let table: ResistanceTable = [(DamageType::Healing, 1.75)].into_iter().collect();
        let result = table.mitigate(-10.0, DamageType::Healing);
        assert!((result - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_from_toml_table() {
        #[derive(Deserialize)]
        struct Wrapper {
            resistances: ResistanceTable,
        }
        let parsed: Wrapper = toml::from_str("[resistances]\nice = 0.5\nnecrotic = 2\n").unwrap();
        assert!((parsed.resistances.get(DamageType::Necrotic) - 2.0).abs() < f64::EPSILON);
        assert!((parsed.resistances.get(DamageType::Ice) - 0.5).abs() < f64::EPSILON);
    }
}
