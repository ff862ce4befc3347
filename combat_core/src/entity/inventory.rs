//! Inventory - Gold and an ordered list of items

use crate::catalog::Item;
use crate::types::{IdAllocator, ItemId};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
    gold: u32,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gold(gold: u32) -> Self {
        Inventory {
            items: Vec::new(),
            gold,
        }
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn set_gold(&mut self, gold: u32) {
        self.gold = gold;
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Remove up to `amount` gold, returning how much was taken
    pub fn take_gold(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.gold);
        self.gold -= taken;
        taken
    }

    pub fn add_item(&mut self, item: Item) -> &mut Self {
        self.items.push(item);
        self
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn get_by_index(&self, index: usize) -> Option<&Item> {
        let item = self.items.get(index);
        if item.is_none() {
            warn!(index, len = self.items.len(), "inventory index out of bounds");
        }
        item
    }

    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn remove_by_index(&mut self, index: usize) -> Option<Item> {
        if index >= self.items.len() {
            warn!(index, len = self.items.len(), "inventory index out of bounds");
            return None;
        }
        Some(self.items.remove(index))
    }

    /// Remove the first item with this display name
    pub fn remove_by_name(&mut self, name: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| item.name == name)?;
        Some(self.items.remove(index))
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name == name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Deep copy with fresh item ids
    pub fn duplicate(&self, ids: &mut IdAllocator) -> Inventory {
        Inventory {
            items: self.items.iter().map(|item| item.duplicate(ids)).collect(),
            gold: self.gold,
        }
    }
}

impl std::fmt::Display for Inventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.items.iter().map(|item| item.to_string()).collect();
        write!(f, "Gold: {}, Items: [{}]", self.gold, names.join(", "))
    }
}
