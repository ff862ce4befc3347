//! Combat - Damage, healing and mana resolution against a roster

mod log;
mod resolution;
mod result;

pub use log::{ActionKind, BattleEntry, BattleLog};
pub use resolution::{
    damage_effect, expend_mana, gain_mana, heal, physical_attack, take_damage, take_magic_damage,
    Resolution, UsageEvent,
};
pub use result::{EffectResult, EffectTag, Exchange, RawEffectResult, StatLabel};
