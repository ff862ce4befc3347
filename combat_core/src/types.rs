//! Core enums and identifiers shared across the engine

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Damage (and healing) types looked up against a resistance table.
///
/// Weapon categories double as damage types, so a longsword deals
/// `Slashing` damage while a fireball deals `Fire`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    Display, AsRefStr, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DamageType {
    #[default]
    Physical,
    Slashing,
    Bludgeoning,
    Piercing,
    Healing,
    Holy,
    Light,
    Dark,
    Fire,
    Ice,
    Lightning,
    Wind,
    Earth,
    Necrotic,
    Water,
    Poison,
}

/// Skill categories that scale output and grow with use
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    Display, AsRefStr, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Proficiency {
    #[serde(rename = "hand-to-hand")]
    #[strum(serialize = "hand-to-hand")]
    HandToHand,
    Slashing,
    Bludgeoning,
    Piercing,
    Spellstrike,
    Potions,
    Bow,
    Healing,
    Stealth,
    Nobility,
}

/// Combat stance of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stance {
    #[default]
    Ready,
    Defending,
}

/// Inert status flags checked during damage resolution
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusFlag {
    /// Reflects half of incoming physical damage onto the attacker
    Thorns,
    /// Reflects half of incoming magic damage onto the caster
    Reflect,
}

/// Broad category of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    #[default]
    Player,
    Monster,
    Npc,
}

/// Which multiplier table a modifier targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierTarget {
    Armor,
    Strength,
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of an entity within a session
    EntityId,
    "ent"
);
id_type!(
    /// Identifier of a single item instance
    ItemId,
    "item"
);
id_type!(
    /// Identifier of a learned skill
    SkillId,
    "skill"
);
id_type!(
    /// Identifier of a scheduled continuous effect
    EffectId,
    "effect"
);

/// Session-scoped id source, injected wherever new ids are minted
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start allocating from a given value
    pub fn starting_at(next: u64) -> Self {
        IdAllocator { next }
    }

    fn bump(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn entity(&mut self) -> EntityId {
        EntityId(self.bump())
    }

    pub fn item(&mut self) -> ItemId {
        ItemId(self.bump())
    }

    pub fn skill(&mut self) -> SkillId {
        SkillId(self.bump())
    }

    pub fn effect(&mut self) -> EffectId {
        EffectId(self.bump())
    }
}
