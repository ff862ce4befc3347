//! Resolution - Apply attacks, damage, healing and mana changes
//!
//! All operations work on a [`Roster`] and address entities by id, so the
//! acting entity and its target can be the same. Gameplay edge cases
//! (dead actors, dead or unknown targets) resolve to a zero result and a
//! warning instead of an error.

use super::result::{EffectResult, EffectTag, Exchange, StatLabel};
use crate::defense::apply_armor;
use crate::entity::Roster;
use crate::rules::REFLECT_RATIO;
use crate::types::{DamageType, EntityId, Proficiency, StatusFlag};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One exercise of a proficiency by an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub entity: EntityId,
    pub proficiency: Proficiency,
}

/// An effect result together with the proficiency usage it produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub result: EffectResult,
    pub usage: Vec<UsageEvent>,
}

impl Resolution {
    pub fn new(result: EffectResult) -> Self {
        Resolution {
            result,
            usage: Vec::new(),
        }
    }

    pub fn used(mut self, entity: EntityId, proficiency: Proficiency) -> Self {
        self.usage.push(UsageEvent {
            entity,
            proficiency,
        });
        self
    }

    /// Record the usage events on the entities' stat blocks
    pub fn record_usage(&self, roster: &mut Roster, increment: f64) {
        for event in &self.usage {
            if let Some(entity) = roster.get_mut(event.entity) {
                entity.stats.record_usage(event.proficiency, increment);
            }
        }
    }
}

/// Unarmed strike: `strength × strength multiplier × hand-to-hand`
pub fn physical_attack(roster: &mut Roster, source: EntityId, target: EntityId) -> Resolution {
    let Some(attacker) = roster.get(source) else {
        warn!(%source, "unknown entity cannot attack");
        return Resolution::new(EffectResult::damage(DamageType::Physical, Exchange::default()));
    };
    let damage_type = attacker.element;
    if !attacker.is_alive() {
        warn!(%source, "entity is not alive and cannot attack");
        return Resolution::new(EffectResult::damage(damage_type, Exchange::default()));
    }

    let damage = attacker.stats.strength
        * attacker.strength_multiplier()
        * attacker.stats.proficiency(Proficiency::HandToHand);

    if !roster.is_alive(target) {
        warn!(%target, "entity is already dead and cannot be attacked");
        return Resolution::new(EffectResult::damage(damage_type, Exchange::new(damage, 0.0)));
    }

    Resolution::new(take_damage(roster, target, damage, damage_type, source))
        .used(source, Proficiency::HandToHand)
}

/// Physical hit: armor, then resistance; thorns bounce half back
pub fn take_damage(
    roster: &mut Roster,
    target: EntityId,
    amount: f64,
    damage_type: DamageType,
    source: EntityId,
) -> EffectResult {
    let Some(defender) = roster.get_mut(target) else {
        warn!(%target, "unknown entity cannot take damage");
        return EffectResult::damage(damage_type, Exchange::new(amount, 0.0));
    };
    if !defender.is_alive() {
        warn!(%target, "entity is already dead and cannot take damage");
        return EffectResult::damage(damage_type, Exchange::new(amount, 0.0));
    }

    let after_armor = apply_armor(amount, defender.armor_multiplier());
    let mitigated = defender.resistances.mitigate(after_armor, damage_type);
    let applied = defender.absorb(mitigated);
    let thorns = defender.is_alive() && defender.status.has(StatusFlag::Thorns);
    debug!(%target, amount, after_armor, applied, "physical damage");

    let mut result = EffectResult::damage(damage_type, Exchange::new(amount, applied));
    if thorns {
        result.source = damage_effect(roster, source, amount * REFLECT_RATIO, damage_type);
    }
    result
}

/// Magic hit: resistance only; reflect bounces half back
pub fn take_magic_damage(
    roster: &mut Roster,
    target: EntityId,
    amount: f64,
    damage_type: DamageType,
    source: EntityId,
) -> EffectResult {
    let Some(defender) = roster.get_mut(target) else {
        warn!(%target, "unknown entity cannot take magic damage");
        return EffectResult::damage(damage_type, Exchange::new(amount, 0.0));
    };
    if !defender.is_alive() {
        warn!(%target, "entity is already dead and cannot take magic damage");
        return EffectResult::damage(damage_type, Exchange::new(amount, 0.0));
    }

    let mitigated = defender.resistances.mitigate(amount, damage_type);
    let applied = defender.absorb(mitigated);
    let reflect = defender.is_alive() && defender.status.has(StatusFlag::Reflect);
    debug!(%target, amount, applied, "magic damage");

    let mut result = EffectResult::damage(damage_type, Exchange::new(amount, applied));
    if reflect {
        result.source = damage_effect(roster, source, amount * REFLECT_RATIO, damage_type);
    }
    result
}

/// Bare damage with resistance only and no reflection
///
/// Used for thorns, reflect, backlash and continuous effect ticks.
pub fn damage_effect(
    roster: &mut Roster,
    target: EntityId,
    amount: f64,
    damage_type: DamageType,
) -> Exchange {
    let Some(entity) = roster.get_mut(target) else {
        warn!(%target, "unknown entity cannot take damage");
        return Exchange::new(amount, 0.0);
    };
    if !entity.is_alive() {
        warn!(%target, "entity is already dead and cannot take damage");
        return Exchange::new(amount, 0.0);
    }
    let mitigated = entity.resistances.mitigate(amount, damage_type);
    Exchange::new(amount, entity.absorb(mitigated))
}

/// Restore health, scaled by healing resistance and capped at max
pub fn heal(roster: &mut Roster, target: EntityId, amount: f64) -> EffectResult {
    let mut result = EffectResult::none(EffectTag::None, StatLabel::Health);
    result.target.offered = amount;

    let Some(entity) = roster.get_mut(target) else {
        warn!(%target, "unknown entity cannot be healed");
        return result;
    };
    if !entity.is_alive() {
        warn!(%target, "entity is not alive and cannot be healed");
        return result;
    }

    let healing = entity.resistances.mitigate(amount, DamageType::Healing);
    let capped = healing.min(entity.stats.missing_health());
    result.target.applied = entity.absorb(-capped);
    result
}

/// Spend mana (negative restores), clamped to the mana range
///
/// No availability check: callers refuse costed actions up front.
pub fn expend_mana(roster: &mut Roster, target: EntityId, amount: f64) -> EffectResult {
    let mut result = EffectResult::none(EffectTag::None, StatLabel::Mana);
    result.target.offered = amount;

    let Some(entity) = roster.get_mut(target) else {
        warn!(%target, "unknown entity cannot expend mana");
        return result;
    };
    if !entity.is_alive() {
        warn!(%target, "entity is not alive and cannot expend mana");
        return result;
    }
    result.target.applied = entity.drain_mana(amount);
    result
}

/// Restore mana, clamped to max
pub fn gain_mana(roster: &mut Roster, target: EntityId, amount: f64) -> EffectResult {
    expend_mana(roster, target, -amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityBuilder;
    use crate::types::{EntityKind, IdAllocator};

    fn duel(target_health: f64, strength: f64) -> (Roster, EntityId, EntityId) {
        let mut ids = IdAllocator::new();
        let mut roster = Roster::new();
        let attacker = roster.insert(
            EntityBuilder::new("Brute", EntityKind::Monster)
                .stats(100.0, 20.0, 0.0, strength, 0.0)
                .proficiency(Proficiency::HandToHand, 1.0)
                .build(&mut ids),
        );
        let defender = roster.insert(
            EntityBuilder::new("Defaulto", EntityKind::Player)
                .stats(target_health, 50.0, 0.0, 10.0, 0.0)
                .build(&mut ids),
        );
        (roster, attacker, defender)
    }

    #[test]
    fn test_three_attacks_clamp_to_remaining_health() {
        let (mut roster, attacker, defender) = duel(100.0, 40.0);

        let first = physical_attack(&mut roster, attacker, defender);
        assert_eq!(first.result.target, Exchange::new(40.0, 40.0));
        assert_eq!(roster.get(defender).unwrap().stats.health(), 60.0);

        physical_attack(&mut roster, attacker, defender);
        assert_eq!(roster.get(defender).unwrap().stats.health(), 20.0);

        let third = physical_attack(&mut roster, attacker, defender);
        assert_eq!(third.result.target, Exchange::new(40.0, 20.0));
        assert!(!roster.is_alive(defender));
    }

    #[test]
    fn test_attack_records_hand_to_hand_usage() {
        let (mut roster, attacker, defender) = duel(100.0, 10.0);
        let resolution = physical_attack(&mut roster, attacker, defender);
        assert_eq!(
            resolution.usage,
            vec![UsageEvent {
                entity: attacker,
                proficiency: Proficiency::HandToHand
            }]
        );

        resolution.record_usage(&mut roster, 5.0);
        let stats = &roster.get(attacker).unwrap().stats;
        assert_eq!(stats.usage(Proficiency::HandToHand), 5.0);
    }

    #[test]
    fn test_dead_attacker_does_nothing() {
        let (mut roster, attacker, defender) = duel(100.0, 40.0);
        roster.get_mut(attacker).unwrap().stats.set_health(0.0);

        let resolution = physical_attack(&mut roster, attacker, defender);
        assert!(resolution.result.target.is_zero());
        assert!(resolution.usage.is_empty());
        assert_eq!(roster.get(defender).unwrap().stats.health(), 100.0);
    }

    #[test]
    fn test_attacking_the_dead_reports_offered_only() {
        let (mut roster, attacker, defender) = duel(100.0, 40.0);
        roster.get_mut(defender).unwrap().stats.set_health(0.0);

        let resolution = physical_attack(&mut roster, attacker, defender);
        assert_eq!(resolution.result.target, Exchange::new(40.0, 0.0));
    }

    #[test]
    fn test_defending_halves_physical_damage() {
        let (mut roster, attacker, defender) = duel(100.0, 40.0);
        roster.get_mut(defender).unwrap().enter_defense(2.0);

        let resolution = physical_attack(&mut roster, attacker, defender);
        assert_eq!(resolution.result.target, Exchange::new(40.0, 20.0));
    }

    #[test]
    fn test_magic_ignores_armor() {
        let (mut roster, attacker, defender) = duel(100.0, 40.0);
        roster.get_mut(defender).unwrap().enter_defense(2.0);

        let result = take_magic_damage(&mut roster, defender, 30.0, DamageType::Fire, attacker);
        assert_eq!(result.target, Exchange::new(30.0, 30.0));
    }

    #[test]
    fn test_thorns_reflect_half_onto_attacker() {
        let (mut roster, attacker, defender) = duel(100.0, 40.0);
        roster
            .get_mut(defender)
            .unwrap()
            .status
            .add(StatusFlag::Thorns);

        let resolution = physical_attack(&mut roster, attacker, defender);
        assert_eq!(resolution.result.source, Exchange::new(20.0, 20.0));
        assert_eq!(roster.get(attacker).unwrap().stats.health(), 80.0);
    }

    #[test]
    fn test_no_thorns_from_a_killed_target() {
        let (mut roster, attacker, defender) = duel(30.0, 40.0);
        roster
            .get_mut(defender)
            .unwrap()
            .status
            .add(StatusFlag::Thorns);

        let resolution = physical_attack(&mut roster, attacker, defender);
        assert!(resolution.result.source.is_zero());
    }

    #[test]
    fn test_reflect_mirrors_magic() {
        let (mut roster, attacker, defender) = duel(100.0, 40.0);
        roster
            .get_mut(defender)
            .unwrap()
            .status
            .add(StatusFlag::Reflect);

        let result = take_magic_damage(&mut roster, defender, 20.0, DamageType::Ice, attacker);
        assert_eq!(result.source, Exchange::new(10.0, 10.0));
    }

    #[test]
    fn test_self_targeted_magic() {
        let (mut roster, attacker, _) = duel(100.0, 40.0);
        let result = take_magic_damage(&mut roster, attacker, 25.0, DamageType::Holy, attacker);
        assert_eq!(result.target.applied, 25.0);
        assert_eq!(roster.get(attacker).unwrap().stats.health(), 75.0);
    }

    #[test]
    fn test_heal_is_capped_and_negative() {
        let (mut roster, _, defender) = duel(100.0, 40.0);
        roster.get_mut(defender).unwrap().stats.set_health(70.0);

        let result = heal(&mut roster, defender, 50.0);
        assert_eq!(result.target, Exchange::new(50.0, -30.0));
        assert_eq!(roster.get(defender).unwrap().stats.health(), 100.0);
    }

    #[test]
    fn test_heal_on_dead_is_noop() {
        let (mut roster, _, defender) = duel(100.0, 40.0);
        roster.get_mut(defender).unwrap().stats.set_health(0.0);

        let result = heal(&mut roster, defender, 50.0);
        assert_eq!(result.target.applied, 0.0);
        assert!(!roster.is_alive(defender));
    }

    #[test]
    fn test_magic_cannot_revive() {
        let (mut roster, attacker, defender) = duel(100.0, 40.0);
        roster.get_mut(defender).unwrap().stats.set_health(0.0);

        let result =
            take_magic_damage(&mut roster, defender, -50.0, DamageType::Healing, attacker);
        assert_eq!(result.target.applied, 0.0);
        assert_eq!(roster.get(defender).unwrap().stats.health(), 0.0);
    }

    #[test]
    fn test_undead_are_hurt_by_healing() {
        let (mut roster, attacker, defender) = duel(100.0, 40.0);
        roster
            .get_mut(defender)
            .unwrap()
            .resistances
            .set(DamageType::Healing, 1.75);

        let result =
            take_magic_damage(&mut roster, defender, -10.0, DamageType::Healing, attacker);
        assert!((result.target.applied - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_mana_clamps_both_ways() {
        let (mut roster, attacker, _) = duel(100.0, 40.0);

        let spent = expend_mana(&mut roster, attacker, 50.0);
        assert_eq!(spent.target, Exchange::new(50.0, 20.0));
        assert_eq!(roster.get(attacker).unwrap().stats.mana(), 0.0);

        let gained = gain_mana(&mut roster, attacker, 30.0);
        assert_eq!(gained.target.applied, -20.0);
        assert_eq!(gained.stat, StatLabel::Mana);
    }
}
