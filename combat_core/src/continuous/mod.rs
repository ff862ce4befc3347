//! Continuous effects - Damage and healing over time
//!
//! Cadence is measured in participant turns. A "round" is one pass through
//! `entity_count` turns, however many extra turns fast entities get, so an
//! effect keeps the same share of a round whatever the party size.

mod active;

pub use active::{ContinuousEffect, ReducedEffect};

use crate::entity::Roster;
use crate::narration::effect_text;
use crate::rules::TICKS_PER_ROUND;
use crate::types::{EffectId, EntityId, IdAllocator};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ContinuousEffectScheduler {
    entity_count: usize,
    round: u32,
    turn: usize,
    effects: Vec<ContinuousEffect>,
    ids: IdAllocator,
    ticks_per_round: f64,
}

impl ContinuousEffectScheduler {
    pub fn new(entity_count: usize, ids: IdAllocator) -> Self {
        ContinuousEffectScheduler {
            entity_count: entity_count.max(1),
            round: 0,
            turn: 0,
            effects: Vec::new(),
            ids,
            ticks_per_round: TICKS_PER_ROUND,
        }
    }

    /// Override the cadence constant
    pub fn with_ticks_per_round(mut self, ticks_per_round: f64) -> Self {
        self.ticks_per_round = ticks_per_round;
        self
    }

    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    pub fn set_entity_count(&mut self, entity_count: usize) {
        self.entity_count = entity_count.max(1);
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn effects(&self) -> &[ContinuousEffect] {
        &self.effects
    }

    /// Schedule an effect
    ///
    /// `interval_factor` is the share of a round between firings and
    /// `duration_rounds` is measured in sub-ticks of a round.
    pub fn add_effect(
        &mut self,
        name: impl Into<String>,
        target: EntityId,
        source: EntityId,
        reduced: ReducedEffect,
        interval_factor: f64,
        duration_rounds: f64,
    ) -> EffectId {
        let interval =
            (self.ticks_per_round * interval_factor * self.entity_count as f64).floor() as u32;
        let duration = (duration_rounds / self.ticks_per_round).ceil() as u32 + self.round;
        let id = self.ids.effect();
        let name = name.into();
        debug!(%id, %name, %target, interval, duration, "continuous effect added");

        self.effects.push(ContinuousEffect {
            id,
            name,
            target,
            source,
            reduced,
            interval,
            duration,
            ticks_since_fire: 0,
        });
        id
    }

    pub fn remove_effect(&mut self, id: EffectId) -> Option<ContinuousEffect> {
        let index = self.effects.iter().position(|effect| effect.id == id)?;
        Some(self.effects.remove(index))
    }

    /// Advance one completed turn, firing due effects
    ///
    /// Effects on dead targets are dropped without firing. Returns one
    /// narration line per firing.
    pub fn process_effects(&mut self, roster: &mut Roster) -> Vec<String> {
        self.turn += 1;
        let round = self.round;
        let mut lines = Vec::new();

        self.effects.retain_mut(|effect| {
            if !roster.is_alive(effect.target) {
                debug!(id = %effect.id, "dropping effect on a dead target");
                return false;
            }
            if effect.tick() {
                let (exchange, stat) = effect.reduced.apply(roster, effect.target);
                let target_name = roster.name(effect.target);
                lines.push(effect_text(&target_name, exchange, stat, &effect.name));
            }
            !effect.is_expired(round) && roster.is_alive(effect.target)
        });

        if self.turn >= self.entity_count {
            self.turn = 0;
            self.round += 1;
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityBuilder;
    use crate::types::{DamageType, EntityKind};

    fn setup(health: f64) -> (Roster, EntityId, EntityId, ContinuousEffectScheduler) {
        let mut ids = IdAllocator::new();
        let mut roster = Roster::new();
        let caster = roster.insert(EntityBuilder::new("Defaulto", EntityKind::Player).build(&mut ids));
        let target = roster.insert(
            EntityBuilder::new("Slime", EntityKind::Monster)
                .stats(health, 0.0, 0.0, 5.0, 5.0)
                .build(&mut ids),
        );
        let scheduler = ContinuousEffectScheduler::new(2, IdAllocator::starting_at(1000));
        (roster, caster, target, scheduler)
    }

    fn poison() -> ReducedEffect {
        ReducedEffect::Damage {
            amount: 1.0,
            damage_type: DamageType::Poison,
        }
    }

    #[test]
    fn test_interval_and_duration() {
        let (_, caster, target, mut scheduler) = setup(100.0);
        scheduler.add_effect("Poison", target, caster, poison(), 0.125, 30.0);

        let effect = &scheduler.effects()[0];
        assert_eq!(effect.interval, 1);
        assert_eq!(effect.duration, 5);
        assert_eq!(effect.id, EffectId(1000));
    }

    #[test]
    fn test_fires_every_call_until_expired() {
        let (mut roster, caster, target, mut scheduler) = setup(100.0);
        scheduler.add_effect("Poison", target, caster, poison(), 0.125, 30.0);

        // Two turns per round, five rounds
        for call in 0..10 {
            let lines = scheduler.process_effects(&mut roster);
            assert_eq!(lines, vec!["Slime lost 1.0 health from Poison".to_string()], "call {call}");
        }
        assert_eq!(scheduler.round(), 5);

        // Last firing happens in the round the effect expires
        assert_eq!(scheduler.process_effects(&mut roster).len(), 1);
        assert!(scheduler.effects().is_empty());
        assert!(scheduler.process_effects(&mut roster).is_empty());
        assert_eq!(roster.get(target).unwrap().stats.health(), 89.0);
    }

    #[test]
    fn test_round_advances_per_entity_count() {
        let (mut roster, _, _, mut scheduler) = setup(100.0);
        scheduler.set_entity_count(3);
        scheduler.process_effects(&mut roster);
        scheduler.process_effects(&mut roster);
        assert_eq!(scheduler.round(), 0);
        scheduler.process_effects(&mut roster);
        assert_eq!(scheduler.round(), 1);
        assert_eq!(scheduler.turn(), 0);
    }

    #[test]
    fn test_dead_target_never_fires() {
        let (mut roster, caster, target, mut scheduler) = setup(100.0);
        scheduler.add_effect("Poison", target, caster, poison(), 0.125, 30.0);
        roster.get_mut(target).unwrap().stats.set_health(0.0);

        assert!(scheduler.process_effects(&mut roster).is_empty());
        assert!(scheduler.effects().is_empty());
    }

    #[test]
    fn test_killing_tick_removes_effect() {
        let (mut roster, caster, target, mut scheduler) = setup(1.0);
        scheduler.add_effect("Poison", target, caster, poison(), 0.125, 30.0);

        let lines = scheduler.process_effects(&mut roster);
        assert_eq!(lines.len(), 1);
        assert!(scheduler.effects().is_empty());
    }

    #[test]
    fn test_heal_over_time() {
        let (mut roster, caster, target, mut scheduler) = setup(100.0);
        roster.get_mut(target).unwrap().stats.set_health(50.0);
        scheduler.add_effect(
            "Regen",
            target,
            caster,
            ReducedEffect::Heal { amount: 10.0 },
            0.125,
            12.0,
        );

        let lines = scheduler.process_effects(&mut roster);
        assert_eq!(lines, vec!["Slime gained 10 health from Regen".to_string()]);
    }

    #[test]
    fn test_remove_effect() {
        let (_, caster, target, mut scheduler) = setup(100.0);
        let id = scheduler.add_effect("Poison", target, caster, poison(), 0.5, 6.0);
        assert!(scheduler.remove_effect(id).is_some());
        assert!(scheduler.remove_effect(id).is_none());
    }
}
