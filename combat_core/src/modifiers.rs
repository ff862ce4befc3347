//! MultiplierTable - Named, stacking multipliers for armor and strength
//!
//! Final value is the product of every entry, 1.0 when empty. Entries are
//! keyed by their source (`"defending"`, `"shield"`, an item name) so each
//! source can be taken off again without touching the others.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MultiplierTable {
    entries: BTreeMap<String, f64>,
}

impl MultiplierTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Product of all entries
    pub fn combined(&self) -> f64 {
        self.entries.values().product()
    }

    /// Add a factor under `name`, multiplying into an existing entry
    pub fn add(&mut self, name: impl Into<String>, factor: f64) {
        self.entries
            .entry(name.into())
            .and_modify(|existing| *existing *= factor)
            .or_insert(factor);
    }

    /// Remove the entry for `name`
    ///
    /// Returns false (with a warning) when no such entry exists.
    pub fn remove(&mut self, name: &str) -> bool {
        if self.entries.remove(name).is_some() {
            true
        } else {
            warn!(name, "tried to remove a multiplier that is not present");
            false
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
