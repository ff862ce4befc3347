//! Content catalog - Item and skill definitions keyed by name

mod effect;
mod item;
mod skill;

pub use effect::{resolve_action, ActionContext, Backlash, Effect};
pub use item::{EquipModifier, EquipSpec, Item, ItemBehavior, ItemDef, ItemKind};
pub use skill::{LearnRequirement, Skill, SkillDef};

use crate::config::ConfigError;
use crate::types::IdAllocator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub items: BTreeMap<String, ItemDef>,
    #[serde(default)]
    pub skills: BTreeMap<String, SkillDef>,
}

impl Catalog {
    pub fn item(&self, key: &str) -> Option<&ItemDef> {
        self.items.get(key)
    }

    pub fn skill(&self, key: &str) -> Option<&SkillDef> {
        self.skills.get(key)
    }

    /// Instantiate an item by key
    pub fn create_item(&self, key: &str, ids: &mut IdAllocator) -> Result<Item, ConfigError> {
        self.item(key)
            .map(|def| def.instantiate(key, ids))
            .ok_or_else(|| ConfigError::ValidationError(format!("unknown item '{key}'")))
    }

    /// Instantiate a skill by key
    pub fn create_skill(&self, key: &str, ids: &mut IdAllocator) -> Result<Skill, ConfigError> {
        self.skill(key)
            .map(|def| def.instantiate(key, ids))
            .ok_or_else(|| ConfigError::ValidationError(format!("unknown skill '{key}'")))
    }

    /// Check definitions for contradictions
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, def) in &self.items {
            if def.effect.is_some() && def.equip.is_some() {
                return Err(ConfigError::ValidationError(format!(
                    "item '{key}' cannot be both useable and equippable"
                )));
            }
            if let Some(equip) = &def.equip {
                if equip.modifier.factor <= 0.0 {
                    return Err(ConfigError::ValidationError(format!(
                        "item '{key}' has a non-positive equip factor"
                    )));
                }
            }
        }
        for (key, def) in &self.skills {
            if def.mana_cost < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "skill '{key}' has a negative mana cost"
                )));
            }
        }
        Ok(())
    }
}
