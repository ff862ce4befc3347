//! EntityBuilder - Fix stats, defenses, gear and skills before a battle

use super::Entity;
use crate::ai::AiPolicy;
use crate::catalog::{Item, Skill};
use crate::stat_block::StatBlock;
use crate::types::{DamageType, EntityKind, IdAllocator, Proficiency, StatusFlag};

#[derive(Debug, Clone)]
pub struct EntityBuilder {
    name: String,
    kind: EntityKind,
    stats: StatBlock,
    resistances: Vec<(DamageType, f64)>,
    speed: u32,
    element: DamageType,
    gold: u32,
    items: Vec<Item>,
    skills: Vec<Skill>,
    statuses: Vec<StatusFlag>,
    ai: Option<AiPolicy>,
}

impl EntityBuilder {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        EntityBuilder {
            name: name.into(),
            kind,
            stats: StatBlock::default(),
            resistances: Vec::new(),
            speed: 0,
            element: DamageType::Physical,
            gold: 0,
            items: Vec::new(),
            skills: Vec::new(),
            statuses: Vec::new(),
            ai: None,
        }
    }

    /// Replace the base stats, keeping proficiencies set so far
    pub fn stats(
        mut self,
        max_health: f64,
        max_mana: f64,
        magic: f64,
        strength: f64,
        defense: f64,
    ) -> Self {
        let mut stats = StatBlock::new(max_health, max_mana, magic, strength, defense);
        for (proficiency, value) in self.stats.proficiencies() {
            stats.set_proficiency(*proficiency, *value);
        }
        stats.set_level(self.stats.level());
        stats.set_experience(self.stats.experience());
        stats.visible = self.stats.visible;
        self.stats = stats;
        self
    }

    pub fn level(mut self, level: u32) -> Self {
        let experience = self.stats.experience();
        self.stats.set_level(level);
        self.stats.set_experience(experience);
        self
    }

    /// Experience held (for monsters, the reward for defeating them)
    pub fn experience(mut self, experience: u32) -> Self {
        self.stats.set_experience(experience);
        self
    }

    pub fn proficiency(mut self, proficiency: Proficiency, value: f64) -> Self {
        self.stats.set_proficiency(proficiency, value);
        self
    }

    pub fn proficiencies(mut self, values: impl IntoIterator<Item = (Proficiency, f64)>) -> Self {
        for (proficiency, value) in values {
            self.stats.set_proficiency(proficiency, value);
        }
        self
    }

    pub fn resistance(mut self, damage_type: DamageType, value: f64) -> Self {
        self.resistances.push((damage_type, value));
        self
    }

    pub fn resistances(mut self, values: impl IntoIterator<Item = (DamageType, f64)>) -> Self {
        self.resistances.extend(values);
        self
    }

    pub fn speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    pub fn element(mut self, element: DamageType) -> Self {
        self.element = element;
        self
    }

    pub fn gold(mut self, gold: u32) -> Self {
        self.gold = gold;
        self
    }

    pub fn item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn status(mut self, flag: StatusFlag) -> Self {
        self.statuses.push(flag);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.stats.visible = visible;
        self
    }

    pub fn ai(mut self, ai: AiPolicy) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn build(self, ids: &mut IdAllocator) -> Entity {
        let mut entity = Entity::new(ids.entity(), self.name, self.kind);
        entity.stats = self.stats;
        entity.resistances.fix(self.resistances);
        entity.speed = self.speed;
        entity.element = self.element;
        entity.inventory.set_gold(self.gold);
        for item in self.items {
            entity.inventory.add_item(item);
        }
        for skill in self.skills {
            entity.skills.add(skill);
        }
        for flag in self.statuses {
            entity.status.add(flag);
        }
        entity.ai = self.ai;
        entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_skeleton() {
        let mut ids = IdAllocator::new();
        let skeleton = EntityBuilder::new("Skeleton Warrior", EntityKind::Monster)
            .proficiency(Proficiency::Slashing, 1.1)
            .stats(25.0, 0.0, 0.0, 40.0, 50.0)
            .experience(100)
            .resistance(DamageType::Healing, 1.75)
            .speed(16)
            .gold(7)
            .build(&mut ids);

        assert_eq!(skeleton.stats.max_health(), 25.0);
        assert_eq!(skeleton.stats.proficiency(Proficiency::Slashing), 1.1);
        assert_eq!(skeleton.stats.experience(), 100);
        assert_eq!(skeleton.resistances.get(DamageType::Healing), 1.75);
        assert_eq!(skeleton.inventory.gold(), 7);
        assert_eq!(skeleton.speed, 16);
    }

    #[test]
    fn test_level_keeps_experience() {
        let mut ids = IdAllocator::new();
        let slime = EntityBuilder::new("Slime", EntityKind::Monster)
            .experience(5)
            .level(3)
            .build(&mut ids);
        assert_eq!(slime.stats.level(), 3);
        assert_eq!(slime.stats.experience(), 5);
    }
}
