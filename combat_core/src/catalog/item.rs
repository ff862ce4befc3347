//! Items - Definitions from the catalog and the instances entities carry

use super::effect::Effect;
use crate::types::{IdAllocator, ItemId, ModifierTarget};
use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ItemKind {
    Weapon,
    Armor,
    Artifact,
    #[default]
    Item,
}

/// Multiplier an equippable item adds while worn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquipModifier {
    pub target: ModifierTarget,
    pub factor: f64,
}

/// Equip section of an item definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipSpec {
    #[serde(default)]
    pub slot_category: u32,
    #[serde(flatten)]
    pub modifier: EquipModifier,
}

/// What an item does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemBehavior {
    /// Carried only (loot, quest items)
    Inert,
    /// Used on a target in battle
    Useable(Effect),
    /// Worn for a passive multiplier
    Equippable {
        slot_category: u32,
        equipped: bool,
        modifier: EquipModifier,
    },
}

/// Item definition as it appears in the content catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    #[serde(default)]
    pub kind: ItemKind,
    /// Subtype label ("sword", "potion", "ring")
    pub call: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value: u32,
    #[serde(default)]
    pub consumable: bool,
    #[serde(default)]
    pub effect: Option<Effect>,
    #[serde(default)]
    pub equip: Option<EquipSpec>,
}

impl ItemDef {
    /// Create a fresh instance with a newly allocated id
    pub fn instantiate(&self, key: &str, ids: &mut IdAllocator) -> Item {
        let behavior = match (&self.effect, &self.equip) {
            (Some(effect), _) => ItemBehavior::Useable(effect.clone()),
            (None, Some(equip)) => ItemBehavior::Equippable {
                slot_category: equip.slot_category,
                equipped: false,
                modifier: equip.modifier,
            },
            (None, None) => ItemBehavior::Inert,
        };

        Item {
            id: ids.item(),
            key: key.to_string(),
            kind: self.kind,
            call: self.call.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            value: self.value,
            consumable: self.consumable,
            behavior,
        }
    }
}

/// An item instance in an inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Catalog key this item was created from
    pub key: String,
    pub kind: ItemKind,
    pub call: String,
    pub name: String,
    pub description: String,
    pub value: u32,
    pub consumable: bool,
    pub behavior: ItemBehavior,
}

impl Item {
    /// Effect applied when the item is used, if any
    pub fn effect(&self) -> Option<&Effect> {
        match &self.behavior {
            ItemBehavior::Useable(effect) => Some(effect),
            _ => None,
        }
    }

    pub fn is_weapon(&self) -> bool {
        self.kind == ItemKind::Weapon
    }

    pub fn is_equippable(&self) -> bool {
        matches!(self.behavior, ItemBehavior::Equippable { .. })
    }

    pub fn is_equipped(&self) -> bool {
        matches!(self.behavior, ItemBehavior::Equippable { equipped: true, .. })
    }

    /// Copy with a new id (and unequipped)
    pub fn duplicate(&self, ids: &mut IdAllocator) -> Item {
        let mut copy = self.clone();
        copy.id = ids.item();
        if let ItemBehavior::Equippable { equipped, .. } = &mut copy.behavior {
            *equipped = false;
        }
        copy
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} - Value: {})", self.name, self.description, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DamageType, Proficiency};

    fn sword_def() -> ItemDef {
        ItemDef {
            kind: ItemKind::Weapon,
            call: "sword".to_string(),
            name: "Longsword".to_string(),
            description: "A sharp longsword that deals 15 damage.".to_string(),
            value: 50,
            consumable: false,
            effect: Some(Effect::Weapon {
                base: 15.0,
                proficiency: Proficiency::Slashing,
                damage_type: DamageType::Slashing,
                backlash: None,
            }),
            equip: None,
        }
    }

    #[test]
    fn test_instantiate_useable() {
        let mut ids = IdAllocator::new();
        let sword = sword_def().instantiate("longsword", &mut ids);
        assert_eq!(sword.id, ItemId(0));
        assert!(sword.is_weapon());
        assert!(sword.effect().is_some());
        assert_eq!(
            sword.to_string(),
            "Longsword (A sharp longsword that deals 15 damage. - Value: 50)"
        );
    }

    #[test]
    fn test_instantiate_equippable() {
        let mut ids = IdAllocator::new();
        let def = ItemDef {
            kind: ItemKind::Armor,
            call: "shield".to_string(),
            name: "Shield".to_string(),
            description: String::new(),
            value: 40,
            consumable: false,
            effect: None,
            equip: Some(EquipSpec {
                slot_category: 2,
                modifier: EquipModifier {
                    target: ModifierTarget::Armor,
                    factor: 2.0,
                },
            }),
        };
        let shield = def.instantiate("shield", &mut ids);
        assert!(shield.is_equippable());
        assert!(!shield.is_equipped());
        assert!(shield.effect().is_none());
    }

    #[test]
    fn test_duplicate_gets_new_id() {
        let mut ids = IdAllocator::new();
        let sword = sword_def().instantiate("longsword", &mut ids);
        let copy = sword.duplicate(&mut ids);
        assert_ne!(copy.id, sword.id);
        assert_eq!(copy.name, sword.name);
    }
}
