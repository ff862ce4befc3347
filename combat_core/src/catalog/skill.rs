//! Skills - Learnable, mana-costed effects

use super::effect::Effect;
use crate::stat_block::StatBlock;
use crate::types::{DamageType, IdAllocator, Proficiency, SkillId};
use serde::{Deserialize, Serialize};

/// Extra condition for learning a skill (e.g. by scanning an enemy)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LearnRequirement {
    #[default]
    Always,
    Never,
    Proficiency {
        proficiency: Proficiency,
        at_least: f64,
    },
}

/// Skill definition as it appears in the content catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDef {
    pub name: String,
    pub proficiency: Proficiency,
    /// `None` for skills without an element (steal)
    #[serde(default)]
    pub element: Option<DamageType>,
    #[serde(default)]
    pub mana_cost: f64,
    pub effect: Effect,
    #[serde(default = "default_required_level")]
    pub required_level: u32,
    #[serde(default)]
    pub learn: LearnRequirement,
}

fn default_required_level() -> u32 {
    1
}

impl SkillDef {
    pub fn instantiate(&self, key: &str, ids: &mut IdAllocator) -> Skill {
        Skill {
            id: ids.skill(),
            key: key.to_string(),
            name: self.name.clone(),
            proficiency: self.proficiency,
            element: self.element,
            mana_cost: self.mana_cost,
            effect: self.effect.clone(),
            required_level: self.required_level,
            learn: self.learn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub key: String,
    pub name: String,
    pub proficiency: Proficiency,
    pub element: Option<DamageType>,
    pub mana_cost: f64,
    pub effect: Effect,
    pub required_level: u32,
    pub learn: LearnRequirement,
}

impl Skill {
    /// Whether an entity with these stats may learn the skill
    pub fn can_learn(&self, stats: &StatBlock) -> bool {
        if stats.level() < self.required_level {
            return false;
        }
        match self.learn {
            LearnRequirement::Always => true,
            LearnRequirement::Never => false,
            LearnRequirement::Proficiency {
                proficiency,
                at_least,
            } => stats.proficiency(proficiency) >= at_least,
        }
    }

    pub fn duplicate(&self, ids: &mut IdAllocator) -> Skill {
        let mut copy = self.clone();
        copy.id = ids.skill();
        copy
    }
}
