//! SkillBook - Ordered list of learned skills

use crate::catalog::Skill;
use crate::types::{IdAllocator, SkillId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillBook {
    skills: Vec<Skill>,
}

impl SkillBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, skill: Skill) -> &mut Self {
        self.skills.push(skill);
        self
    }

    pub fn get(&self, id: SkillId) -> Option<&Skill> {
        self.skills.iter().find(|skill| skill.id == id)
    }

    pub fn get_by_index(&self, index: usize) -> Option<&Skill> {
        self.skills.get(index)
    }

    /// Whether a skill from the same catalog entry is already known
    pub fn knows(&self, key: &str) -> bool {
        self.skills.iter().any(|skill| skill.key == key)
    }

    pub fn remove(&mut self, id: SkillId) -> Option<Skill> {
        let index = self.skills.iter().position(|skill| skill.id == id)?;
        Some(self.skills.remove(index))
    }

    pub fn all(&self) -> &[Skill] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn duplicate(&self, ids: &mut IdAllocator) -> SkillBook {
        SkillBook {
            skills: self.skills.iter().map(|skill| skill.duplicate(ids)).collect(),
        }
    }
}
