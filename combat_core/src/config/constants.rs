//! Game constants configuration

use super::ConfigError;
use crate::rules;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable game constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConstants {
    #[serde(default)]
    pub combat: CombatConstants,
    #[serde(default)]
    pub proficiency: ProficiencyConstants,
    #[serde(default)]
    pub turns: TurnConstants,
    #[serde(default)]
    pub continuous: ContinuousConstants,
    #[serde(default)]
    pub ai: AiConstants,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatConstants {
    /// Armor multiplier applied while defending (divides incoming physical damage)
    #[serde(default = "default_defend_armor_factor")]
    pub defend_armor_factor: f64,
}

impl Default for CombatConstants {
    fn default() -> Self {
        CombatConstants {
            defend_armor_factor: rules::DEFEND_ARMOR_FACTOR,
        }
    }
}

fn default_defend_armor_factor() -> f64 {
    rules::DEFEND_ARMOR_FACTOR
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProficiencyConstants {
    /// Usage units recorded each time a proficiency is exercised
    #[serde(default = "default_usage_increment")]
    pub usage_increment: f64,
}

impl Default for ProficiencyConstants {
    fn default() -> Self {
        ProficiencyConstants {
            usage_increment: rules::USAGE_INCREMENT,
        }
    }
}

fn default_usage_increment() -> f64 {
    rules::USAGE_INCREMENT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnConstants {
    /// Speed needed per extra turn in a cycle
    #[serde(default = "default_speed_per_turn")]
    pub speed_per_extra_turn: u32,
}

impl Default for TurnConstants {
    fn default() -> Self {
        TurnConstants {
            speed_per_extra_turn: rules::SPEED_PER_EXTRA_TURN,
        }
    }
}

fn default_speed_per_turn() -> u32 {
    rules::SPEED_PER_EXTRA_TURN
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinuousConstants {
    /// Sub-ticks a single participant contributes to one round
    #[serde(default = "default_ticks_per_round")]
    pub ticks_per_round: f64,
}

impl Default for ContinuousConstants {
    fn default() -> Self {
        ContinuousConstants {
            ticks_per_round: rules::TICKS_PER_ROUND,
        }
    }
}

fn default_ticks_per_round() -> f64 {
    rules::TICKS_PER_ROUND
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConstants {
    /// Defend when health drops below this fraction of max health
    #[serde(default = "default_defend_fraction")]
    pub defend_health_fraction: f64,
    /// Defend when health drops below this absolute value
    #[serde(default = "default_defend_floor")]
    pub defend_health_floor: f64,
}

impl Default for AiConstants {
    fn default() -> Self {
        AiConstants {
            defend_health_fraction: rules::AI_DEFEND_HEALTH_FRACTION,
            defend_health_floor: rules::AI_DEFEND_HEALTH_FLOOR,
        }
    }
}

fn default_defend_fraction() -> f64 {
    rules::AI_DEFEND_HEALTH_FRACTION
}
fn default_defend_floor() -> f64 {
    rules::AI_DEFEND_HEALTH_FLOOR
}

/// Load game constants from a TOML file
pub fn load_constants(path: &Path) -> Result<GameConstants, ConfigError> {
    let constants: GameConstants = super::load_toml(path)?;
    constants.validate()?;
    Ok(constants)
}

/// Load game constants from a TOML string
pub fn parse_constants(content: &str) -> Result<GameConstants, ConfigError> {
    let constants: GameConstants = super::parse_toml(content)?;
    constants.validate()?;
    Ok(constants)
}

impl GameConstants {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.combat.defend_armor_factor <= 0.0 {
            return Err(ConfigError::ValidationError(
                "combat.defend_armor_factor must be positive".to_string(),
            ));
        }
        if self.continuous.ticks_per_round <= 0.0 {
            return Err(ConfigError::ValidationError(
                "continuous.ticks_per_round must be positive".to_string(),
            ));
        }
        if self.turns.speed_per_extra_turn == 0 {
            return Err(ConfigError::ValidationError(
                "turns.speed_per_extra_turn must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
