//! AI - Action policy for computer-controlled entities
//!
//! Defend when badly hurt, otherwise punch the weakest opponent still
//! standing. The only memory is the entity's own stance.

use crate::combat::{physical_attack, Resolution};
use crate::config::GameConstants;
use crate::entity::Roster;
use crate::narration;
use crate::rules::{AI_DEFEND_HEALTH_FLOOR, AI_DEFEND_HEALTH_FRACTION, DEFEND_ARMOR_FACTOR};
use crate::stat_block::StatBlock;
use crate::types::EntityId;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiPolicy {
    /// Defend below this share of max health
    pub defend_health_fraction: f64,
    /// Defend below this absolute health
    pub defend_health_floor: f64,
    /// Armor multiplier applied while defending
    pub defend_armor_factor: f64,
}

impl Default for AiPolicy {
    fn default() -> Self {
        AiPolicy {
            defend_health_fraction: AI_DEFEND_HEALTH_FRACTION,
            defend_health_floor: AI_DEFEND_HEALTH_FLOOR,
            defend_armor_factor: DEFEND_ARMOR_FACTOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiDecision {
    Defend,
    Attack,
}

/// What the AI did on its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiAction {
    Attack(EntityId),
    Defend,
    Idle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiTurn {
    pub action: AiAction,
    pub lines: Vec<String>,
    /// Present when an attack was resolved
    pub resolution: Option<Resolution>,
}

impl AiPolicy {
    pub fn from_constants(constants: &GameConstants) -> Self {
        AiPolicy {
            defend_health_fraction: constants.ai.defend_health_fraction,
            defend_health_floor: constants.ai.defend_health_floor,
            defend_armor_factor: constants.combat.defend_armor_factor,
        }
    }

    pub fn decide(&self, stats: &StatBlock) -> AiDecision {
        let health = stats.health();
        if health < stats.max_health() * self.defend_health_fraction
            || health < self.defend_health_floor
        {
            AiDecision::Defend
        } else {
            AiDecision::Attack
        }
    }

    /// Alive opponent with the lowest health; ties go to the earliest
    pub fn choose_target(roster: &Roster, opponents: &[EntityId]) -> Option<EntityId> {
        let mut best: Option<(EntityId, f64)> = None;
        for &id in opponents {
            let Some(entity) = roster.get(id).filter(|entity| entity.is_alive()) else {
                continue;
            };
            let health = entity.stats.health();
            if best.map_or(true, |(_, lowest)| health < lowest) {
                best = Some((id, health));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Decide and carry out one turn for `actor`
    pub fn take_turn(&self, actor: EntityId, roster: &mut Roster, opponents: &[EntityId]) -> AiTurn {
        let Some(entity) = roster.get_mut(actor) else {
            warn!(%actor, "AI turn for an unknown entity");
            return AiTurn {
                action: AiAction::Idle,
                lines: Vec::new(),
                resolution: None,
            };
        };
        let name = entity.name.clone();
        let mut lines = Vec::new();

        if self.decide(&entity.stats) == AiDecision::Defend {
            let line = if entity.enter_defense(self.defend_armor_factor) {
                narration::ai_defend_text(&name)
            } else {
                narration::ai_continue_defend_text(&name)
            };
            debug!(%actor, "AI defends");
            return AiTurn {
                action: AiAction::Defend,
                lines: vec![line],
                resolution: None,
            };
        }

        if entity.leave_defense() {
            lines.push(narration::ai_leave_defense_text(&name));
        }

        let Some(target) = Self::choose_target(roster, opponents) else {
            lines.push(narration::idle_text(&name));
            return AiTurn {
                action: AiAction::Idle,
                lines,
                resolution: None,
            };
        };

        let resolution = physical_attack(roster, actor, target);
        let target_name = roster.name(target);
        lines.push(narration::ai_attack_text(
            &name,
            &target_name,
            resolution.result.target.applied,
            resolution.result.tag.label(),
        ));
        if !roster.is_alive(target) {
            lines.push(narration::knocked_out_text(&target_name));
        }
        debug!(%actor, %target, dealt = resolution.result.target.applied, "AI attacks");

        AiTurn {
            action: AiAction::Attack(target),
            lines,
            resolution: Some(resolution),
        }
    }
}
