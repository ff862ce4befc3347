//! ContinuousEffect - One scheduled damage or heal over time

use crate::combat::{damage_effect, heal, Exchange, StatLabel};
use crate::entity::Roster;
use crate::types::{DamageType, EffectId, EntityId};
use serde::{Deserialize, Serialize};

/// What a continuous effect does each time it fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReducedEffect {
    /// Resistance-adjusted damage, no reflection
    Damage { amount: f64, damage_type: DamageType },
    /// Healing, capped at max health
    Heal { amount: f64 },
}

impl ReducedEffect {
    pub fn apply(&self, roster: &mut Roster, target: EntityId) -> (Exchange, StatLabel) {
        match *self {
            ReducedEffect::Damage {
                amount,
                damage_type,
            } => (
                damage_effect(roster, target, amount, damage_type),
                StatLabel::Health,
            ),
            ReducedEffect::Heal { amount } => {
                let result = heal(roster, target, amount);
                (result.target, result.stat)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousEffect {
    pub id: EffectId,
    pub name: String,
    pub target: EntityId,
    pub source: EntityId,
    pub reduced: ReducedEffect,
    /// Turns between firings
    pub interval: u32,
    /// Round the effect lasts until
    pub duration: u32,
    pub ticks_since_fire: u32,
}

impl ContinuousEffect {
    /// Count a turn; true when the effect is due to fire
    pub(crate) fn tick(&mut self) -> bool {
        self.ticks_since_fire += 1;
        if self.ticks_since_fire >= self.interval {
            self.ticks_since_fire = 0;
            true
        } else {
            false
        }
    }

    pub fn is_expired(&self, round: u32) -> bool {
        self.duration <= round
    }
}
