//! EffectResult - Outcome of one resolved action
//!
//! Every action reports what was offered to and applied on the target, the
//! same pair for the acting entity (thorns, reflect, backlash, self-damage),
//! and labels for the damage type and the stat that moved.
//!
//! Sign convention: a positive `applied` is a loss, a negative one a gain.

use crate::types::DamageType;
use serde::{Deserialize, Serialize};

/// Offered amount and the change actually applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub offered: f64,
    pub applied: f64,
}

impl Exchange {
    pub fn new(offered: f64, applied: f64) -> Self {
        Exchange { offered, applied }
    }

    pub fn is_zero(&self) -> bool {
        self.offered == 0.0 && self.applied == 0.0
    }
}

/// Kind label of a result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTag {
    Damage(DamageType),
    Steal,
    /// Scan ("libra")
    Scan,
    Defend,
    #[default]
    None,
}

impl EffectTag {
    pub fn label(&self) -> &str {
        match self {
            EffectTag::Damage(damage_type) => damage_type.as_ref(),
            EffectTag::Steal => "steal",
            EffectTag::Scan => "libra",
            EffectTag::Defend => "defend",
            EffectTag::None => "",
        }
    }

    pub fn damage_type(&self) -> Option<DamageType> {
        match self {
            EffectTag::Damage(damage_type) => Some(*damage_type),
            _ => None,
        }
    }
}

/// Which stat a result moved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatLabel {
    #[default]
    Health,
    Mana,
    Steal,
    Scan,
    None,
}

impl StatLabel {
    pub fn label(&self) -> &'static str {
        match self {
            StatLabel::Health => "health",
            StatLabel::Mana => "mana",
            StatLabel::Steal => "steal",
            StatLabel::Scan => "libra",
            StatLabel::None => "",
        }
    }
}

/// `[[offered, applied], [self_offered, self_applied], [tag, stat]]`
pub type RawEffectResult = ([f64; 2], [f64; 2], [String; 2]);

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectResult {
    pub target: Exchange,
    pub source: Exchange,
    pub tag: EffectTag,
    pub stat: StatLabel,
}

impl EffectResult {
    /// Health change on the target
    pub fn damage(damage_type: DamageType, target: Exchange) -> Self {
        EffectResult {
            target,
            source: Exchange::default(),
            tag: EffectTag::Damage(damage_type),
            stat: StatLabel::Health,
        }
    }

    /// Result where nothing happened
    pub fn none(tag: EffectTag, stat: StatLabel) -> Self {
        EffectResult {
            target: Exchange::default(),
            source: Exchange::default(),
            tag,
            stat,
        }
    }

    pub fn defend() -> Self {
        Self::none(EffectTag::Defend, StatLabel::None)
    }

    pub fn with_source(mut self, source: Exchange) -> Self {
        self.source = source;
        self
    }

    /// Net damage dealt to the target (negative when it was healed)
    pub fn dealt(&self) -> f64 {
        self.target.applied
    }

    pub fn as_tuple(&self) -> RawEffectResult {
        (
            [self.target.offered, self.target.applied],
            [self.source.offered, self.source.applied],
            [self.tag.label().to_string(), self.stat.label().to_string()],
        )
    }
}
