//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Core types
pub use crate::stat_block::StatBlock;
pub use crate::types::{DamageType, EntityId, EntityKind, IdAllocator, Proficiency, StatusFlag};

// Entities
pub use crate::entity::{Entity, EntityBuilder, Roster};

// Combat
pub use crate::combat::{EffectResult, Exchange, Resolution};
pub use crate::catalog::{Catalog, Effect};

// Battle flow
pub use crate::battle::{Action, Battle, Outcome, StepResult};

// Config
pub use crate::config::{default_catalog, default_rosters, GameConstants};
