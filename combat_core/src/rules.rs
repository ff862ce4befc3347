//! Rule constants shared by the combat formulas
//!
//! Values that are meant to be tuned per game live in
//! [`GameConstants`](crate::config::GameConstants), which defaults to these.

/// Proficiency value read for a category the entity has never trained
pub const DEFAULT_PROFICIENCY: f64 = 0.5;

/// Base proficiency a category starts from when it first grows at level-up
pub const LEVEL_UP_PROFICIENCY_BASE: f64 = 1.0;

/// Usage units recorded per proficiency-consuming action
pub const USAGE_INCREMENT: f64 = 5.0;

/// Experience curve: `floor(BASE × GROWTH^level)`
pub const EXPERIENCE_BASE: f64 = 100.0;
pub const EXPERIENCE_GROWTH: f64 = 1.2;

/// Share of the pre-mitigation amount bounced back by thorns or reflect
pub const REFLECT_RATIO: f64 = 0.5;

/// Armor multiplier key used while an entity is defending
pub const DEFENDING_KEY: &str = "defending";

/// Armor multiplier applied while defending
pub const DEFEND_ARMOR_FACTOR: f64 = 2.0;

/// Speed needed to earn one extra turn per cycle
pub const SPEED_PER_EXTRA_TURN: u32 = 20;

/// Continuous effect cadence: a factor of 1.0 fires once per this many
/// participant turns (scaled by entity count)
pub const TICKS_PER_ROUND: f64 = 6.0;

/// AI defends below this share of max health
pub const AI_DEFEND_HEALTH_FRACTION: f64 = 0.15;

/// AI defends below this absolute health
pub const AI_DEFEND_HEALTH_FLOOR: f64 = 10.0;
