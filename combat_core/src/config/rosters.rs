//! Entity templates, encounters and parties

use super::ConfigError;
use crate::catalog::Catalog;
use crate::entity::{Entity, EntityBuilder};
use crate::types::{DamageType, EntityKind, IdAllocator, Proficiency, StatusFlag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Base numbers of a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseStats {
    pub max_health: f64,
    #[serde(default)]
    pub max_mana: f64,
    #[serde(default)]
    pub magic: f64,
    #[serde(default)]
    pub strength: f64,
    #[serde(default)]
    pub defense: f64,
    #[serde(default = "default_level")]
    pub level: u32,
    /// For monsters, the experience awarded when defeated
    #[serde(default)]
    pub experience: u32,
}

fn default_level() -> u32 {
    1
}

/// A named blueprint that spawns entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTemplate {
    pub name: String,
    #[serde(default)]
    pub kind: EntityKind,
    pub stats: BaseStats,
    #[serde(default)]
    pub proficiencies: BTreeMap<Proficiency, f64>,
    #[serde(default)]
    pub resistances: BTreeMap<DamageType, f64>,
    #[serde(default)]
    pub speed: u32,
    #[serde(default)]
    pub element: DamageType,
    #[serde(default)]
    pub gold: u32,
    /// Catalog item keys, one instance per entry
    #[serde(default)]
    pub items: Vec<String>,
    /// Item keys (from `items`) worn from the start
    #[serde(default)]
    pub equipped: Vec<String>,
    /// Catalog skill keys
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub statuses: Vec<StatusFlag>,
    #[serde(default)]
    pub visible: bool,
}

impl EntityTemplate {
    /// Spawn a fresh entity, instantiating gear and skills from the catalog
    pub fn build(&self, catalog: &Catalog, ids: &mut IdAllocator) -> Result<Entity, ConfigError> {
        let base = &self.stats;
        let mut builder = EntityBuilder::new(&self.name, self.kind)
            .stats(
                base.max_health,
                base.max_mana,
                base.magic,
                base.strength,
                base.defense,
            )
            .level(base.level)
            .experience(base.experience)
            .proficiencies(self.proficiencies.iter().map(|(p, v)| (*p, *v)))
            .resistances(self.resistances.iter().map(|(t, v)| (*t, *v)))
            .speed(self.speed)
            .element(self.element)
            .gold(self.gold)
            .visible(self.visible);

        for key in &self.items {
            builder = builder.item(catalog.create_item(key, ids)?);
        }
        for key in &self.skills {
            builder = builder.skill(catalog.create_skill(key, ids)?);
        }
        for flag in &self.statuses {
            builder = builder.status(*flag);
        }

        let mut entity = builder.build(ids);
        for key in &self.equipped {
            let target = entity
                .inventory
                .items()
                .iter()
                .find(|item| item.key == *key && item.is_equippable() && !item.is_equipped())
                .map(|item| item.id);
            match target {
                Some(item_id) => {
                    entity.equip(item_id);
                }
                None => {
                    return Err(ConfigError::ValidationError(format!(
                        "'{}' cannot equip '{key}': not carried or not equippable",
                        self.name
                    )))
                }
            }
        }
        Ok(entity)
    }
}

/// Templates plus the named groups built from them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub templates: BTreeMap<String, EntityTemplate>,
    #[serde(default)]
    pub encounters: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub parties: BTreeMap<String, Vec<String>>,
}

impl RosterConfig {
    pub fn template(&self, key: &str) -> Option<&EntityTemplate> {
        self.templates.get(key)
    }

    /// Spawn one entity from a template key
    pub fn spawn(
        &self,
        key: &str,
        catalog: &Catalog,
        ids: &mut IdAllocator,
    ) -> Result<Entity, ConfigError> {
        let template = self
            .template(key)
            .ok_or_else(|| ConfigError::ValidationError(format!("unknown template '{key}'")))?;
        template.build(catalog, ids)
    }

    /// Spawn every member of an encounter
    pub fn encounter(
        &self,
        name: &str,
        catalog: &Catalog,
        ids: &mut IdAllocator,
    ) -> Result<Vec<Entity>, ConfigError> {
        let keys = self
            .encounters
            .get(name)
            .ok_or_else(|| ConfigError::ValidationError(format!("unknown encounter '{name}'")))?;
        debug!(encounter = name, size = keys.len(), "spawning encounter");
        self.spawn_all(keys, catalog, ids)
    }

    /// Spawn every member of a party
    pub fn party(
        &self,
        name: &str,
        catalog: &Catalog,
        ids: &mut IdAllocator,
    ) -> Result<Vec<Entity>, ConfigError> {
        let keys = self
            .parties
            .get(name)
            .ok_or_else(|| ConfigError::ValidationError(format!("unknown party '{name}'")))?;
        self.spawn_all(keys, catalog, ids)
    }

    fn spawn_all(
        &self,
        keys: &[String],
        catalog: &Catalog,
        ids: &mut IdAllocator,
    ) -> Result<Vec<Entity>, ConfigError> {
        keys.iter()
            .map(|key| self.spawn(key, catalog, ids))
            .collect()
    }

    /// Check every group and template reference against the catalog
    pub fn validate(&self, catalog: &Catalog) -> Result<(), ConfigError> {
        for (group, keys) in self.encounters.iter().chain(self.parties.iter()) {
            if keys.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "group '{group}' has no members"
                )));
            }
            if let Some(missing) = keys.iter().find(|key| !self.templates.contains_key(*key)) {
                return Err(ConfigError::ValidationError(format!(
                    "group '{group}' references unknown template '{missing}'"
                )));
            }
        }
        for (key, template) in &self.templates {
            if template.stats.max_health <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "template '{key}' needs positive max_health"
                )));
            }
            if let Some(item) = template.items.iter().find(|item| catalog.item(item).is_none()) {
                return Err(ConfigError::ValidationError(format!(
                    "template '{key}' carries unknown item '{item}'"
                )));
            }
            if let Some(skill) = template.skills.iter().find(|skill| catalog.skill(skill).is_none()) {
                return Err(ConfigError::ValidationError(format!(
                    "template '{key}' knows unknown skill '{skill}'"
                )));
            }
        }
        Ok(())
    }
}

/// Load rosters from a TOML file, validated against a catalog
pub fn load_rosters(path: &Path, catalog: &Catalog) -> Result<RosterConfig, ConfigError> {
    let rosters: RosterConfig = super::load_toml(path)?;
    rosters.validate(catalog)?;
    Ok(rosters)
}

/// Load rosters from a TOML string, validated against a catalog
pub fn parse_rosters(content: &str, catalog: &Catalog) -> Result<RosterConfig, ConfigError> {
    let rosters: RosterConfig = super::parse_toml(content)?;
    rosters.validate(catalog)?;
    Ok(rosters)
}

/// Get the built-in rosters
pub fn default_rosters(catalog: &Catalog) -> RosterConfig {
    let toml = include_str!("../../config/rosters.toml");
    parse_rosters(toml, catalog).unwrap_or_else(|err| {
        warn!(%err, "built-in rosters failed to load");
        RosterConfig::default()
    })
}
