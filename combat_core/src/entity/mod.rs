//! Entity - A combatant composed of stats, defenses, gear and skills

mod builder;
mod inventory;
mod roster;
mod skill_book;

pub use builder::EntityBuilder;
pub use inventory::Inventory;
pub use roster::{is_party_member, Roster};
pub use skill_book::SkillBook;

use crate::ai::AiPolicy;
use crate::catalog::{Item, ItemBehavior};
use crate::defense::ResistanceTable;
use crate::modifiers::MultiplierTable;
use crate::rules::DEFENDING_KEY;
use crate::stat_block::StatBlock;
use crate::types::{
    DamageType, EntityId, EntityKind, IdAllocator, ItemId, ModifierTarget, Stance, StatusFlag,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Status flags currently on an entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusSet(BTreeSet<StatusFlag>);

impl StatusSet {
    pub fn has(&self, flag: StatusFlag) -> bool {
        self.0.contains(&flag)
    }

    pub fn add(&mut self, flag: StatusFlag) -> bool {
        self.0.insert(flag)
    }

    pub fn remove(&mut self, flag: StatusFlag) -> bool {
        self.0.remove(&flag)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    pub stats: StatBlock,
    pub resistances: ResistanceTable,
    /// Divides incoming physical damage
    pub armor: MultiplierTable,
    /// Scales outgoing unarmed damage
    pub strength_mods: MultiplierTable,
    pub status: StatusSet,
    pub inventory: Inventory,
    pub skills: SkillBook,
    pub speed: u32,
    /// Damage type of unarmed attacks
    pub element: DamageType,
    /// Set for entities that pick their own actions
    pub ai: Option<AiPolicy>,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, kind: EntityKind) -> Self {
        Entity {
            id,
            name: name.into(),
            kind,
            stats: StatBlock::default(),
            resistances: ResistanceTable::new(),
            armor: MultiplierTable::new(),
            strength_mods: MultiplierTable::new(),
            status: StatusSet::default(),
            inventory: Inventory::new(),
            skills: SkillBook::new(),
            speed: 0,
            element: DamageType::Physical,
            ai: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    pub fn armor_multiplier(&self) -> f64 {
        self.armor.combined()
    }

    pub fn strength_multiplier(&self) -> f64 {
        self.strength_mods.combined()
    }

    /// Apply a health loss (negative heals); returns the real change
    pub(crate) fn absorb(&mut self, amount: f64) -> f64 {
        let before = self.stats.health();
        let after = self.stats.set_health(before - amount);
        before - after
    }

    /// Apply a mana loss (negative restores); returns the real change
    pub(crate) fn drain_mana(&mut self, amount: f64) -> f64 {
        let before = self.stats.mana();
        let after = self.stats.set_mana(before - amount);
        before - after
    }

    /// Copy this entity under a new id, re-allocating item and skill ids
    ///
    /// Gear worn by the original is worn by the copy too.
    pub fn duplicate(&self, ids: &mut IdAllocator) -> Entity {
        let mut copy = Entity {
            id: ids.entity(),
            inventory: self.inventory.duplicate(ids),
            skills: self.skills.duplicate(ids),
            ..self.clone()
        };
        let worn: Vec<(String, ModifierTarget, ItemId)> = self
            .inventory
            .items()
            .iter()
            .zip(copy.inventory.items())
            .filter_map(|(old, new)| match old.behavior {
                ItemBehavior::Equippable {
                    equipped: true,
                    modifier,
                    ..
                } => Some((equip_key(old), modifier.target, new.id)),
                _ => None,
            })
            .collect();
        for (key, target, item_id) in worn {
            match target {
                ModifierTarget::Armor => copy.armor.remove(&key),
                ModifierTarget::Strength => copy.strength_mods.remove(&key),
            };
            copy.equip(item_id);
        }
        copy
    }

    // === Stance ===

    /// Enter the defensive stance; false if already defending
    pub fn enter_defense(&mut self, factor: f64) -> bool {
        if self.stats.is_defending() {
            return false;
        }
        self.stats.set_stance(Stance::Defending);
        self.armor.add(DEFENDING_KEY, factor);
        debug!(entity = %self.id, "entered defensive stance");
        true
    }

    /// Leave the defensive stance; false if not defending
    pub fn leave_defense(&mut self) -> bool {
        if !self.stats.is_defending() {
            return false;
        }
        self.stats.set_stance(Stance::Ready);
        self.armor.remove(DEFENDING_KEY);
        true
    }

    // === Equipment ===

    /// Equip an item from the inventory, adding its multiplier
    pub fn equip(&mut self, item_id: ItemId) -> bool {
        let Some(item) = self.inventory.get_mut(item_id) else {
            warn!(entity = %self.id, item = %item_id, "cannot equip an item that is not carried");
            return false;
        };
        let ItemBehavior::Equippable {
            equipped, modifier, ..
        } = &mut item.behavior
        else {
            warn!(entity = %self.id, item = %item.name, "item is not equippable");
            return false;
        };
        if *equipped {
            return false;
        }
        *equipped = true;
        let modifier = *modifier;
        let key = equip_key(item);

        match modifier.target {
            ModifierTarget::Armor => self.armor.add(key, modifier.factor),
            ModifierTarget::Strength => self.strength_mods.add(key, modifier.factor),
        }
        true
    }

    /// Unequip an item, removing the multiplier it added
    pub fn unequip(&mut self, item_id: ItemId) -> bool {
        let Some(item) = self.inventory.get_mut(item_id) else {
            warn!(entity = %self.id, item = %item_id, "cannot unequip an item that is not carried");
            return false;
        };
        let ItemBehavior::Equippable {
            equipped, modifier, ..
        } = &mut item.behavior
        else {
            return false;
        };
        if !*equipped {
            return false;
        }
        *equipped = false;
        let target = modifier.target;
        let key = equip_key(item);

        match target {
            ModifierTarget::Armor => self.armor.remove(&key),
            ModifierTarget::Strength => self.strength_mods.remove(&key),
        }
    }

    /// Take an item out of the inventory, unequipping it first
    pub fn give_up_item(&mut self, item_id: ItemId) -> Option<Item> {
        if self.inventory.get(item_id).is_some_and(Item::is_equipped) {
            self.unequip(item_id);
        }
        self.inventory.remove(item_id)
    }
}

/// Multiplier entry for a piece of gear; copies of one item get their own
fn equip_key(item: &Item) -> String {
    format!("{}#{}", item.name.to_lowercase(), item.id)
}
