//! Turn order - Speed-weighted, interleaved turn queue

use crate::entity::Entity;
use crate::rules::SPEED_PER_EXTRA_TURN;
use crate::types::EntityId;

/// Turns an entity gets per cycle: `1 + floor(speed / step)`
pub fn turns_per_cycle(speed: u32, speed_per_extra_turn: u32) -> u32 {
    1 + speed / speed_per_extra_turn.max(1)
}

/// Build the turn queue for a battle
///
/// Entities are ordered by speed (fastest first, ties keep roster order),
/// then taken round-robin while they have turns left, so a fast entity's
/// extra turns are spread out instead of bunched together.
pub fn build_turn_order<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> Vec<EntityId> {
    build_turn_order_with(entities, SPEED_PER_EXTRA_TURN)
}

pub fn build_turn_order_with<'a>(
    entities: impl IntoIterator<Item = &'a Entity>,
    speed_per_extra_turn: u32,
) -> Vec<EntityId> {
    let mut credits: Vec<(EntityId, u32)> = entities
        .into_iter()
        .map(|entity| (entity.id, entity.speed))
        .collect();
    credits.sort_by(|a, b| b.1.cmp(&a.1));
    for (_, speed) in credits.iter_mut() {
        *speed = turns_per_cycle(*speed, speed_per_extra_turn);
    }

    let total: u32 = credits.iter().map(|(_, turns)| turns).sum();
    let mut order = Vec::with_capacity(total as usize);
    while order.len() < total as usize {
        for (id, turns) in credits.iter_mut() {
            if *turns > 0 {
                order.push(*id);
                *turns -= 1;
            }
        }
    }
    order
}
