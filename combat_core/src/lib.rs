//! combat_core - Turn-based combat engine
//!
//! This library provides:
//! - StatBlock: Health, mana, proficiencies and level progression
//! - Entity / Roster: Combatants addressed by id
//! - Combat resolution: Damage, healing and mana against resistances and armor
//! - Catalog: Data-driven items and skills evaluated through tagged effects
//! - ContinuousEffectScheduler: Damage and healing over time
//! - Turn order, AI policy, narration and the Battle orchestrator

pub mod ai;
pub mod battle;
pub mod catalog;
pub mod combat;
pub mod config;
pub mod continuous;
pub mod defense;
pub mod entity;
pub mod modifiers;
pub mod narration;
pub mod prelude;
pub mod rules;
pub mod stat_block;
pub mod turn_order;
pub mod types;

// Re-export core types for convenience
pub use ai::{AiAction, AiDecision, AiPolicy, AiTurn};
pub use battle::{Action, ActionError, Battle, Outcome, StepResult, TurnReport};
pub use catalog::{resolve_action, ActionContext, Catalog, Effect, Item, ItemDef, Skill, SkillDef};
pub use combat::{BattleLog, EffectResult, EffectTag, Exchange, Resolution, StatLabel};
pub use config::{default_catalog, default_rosters, ConfigError, GameConstants, RosterConfig};
pub use continuous::{ContinuousEffect, ContinuousEffectScheduler, ReducedEffect};
pub use defense::ResistanceTable;
pub use entity::{is_party_member, Entity, EntityBuilder, Roster};
pub use modifiers::MultiplierTable;
pub use stat_block::{ProgressionError, StatBlock};
pub use turn_order::build_turn_order;
pub use types::{DamageType, EntityId, EntityKind, IdAllocator, ItemId, Proficiency, SkillId};
