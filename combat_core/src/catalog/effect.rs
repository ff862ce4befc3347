//! Effects - Tagged effect descriptions and the evaluator that runs them
//!
//! Items and skills carry an [`Effect`] value instead of a closure. The
//! evaluator resolves it against the roster and reports the proficiency
//! usage it produced as separate events.

use crate::combat::{
    damage_effect, gain_mana, heal, physical_attack, take_damage, take_magic_damage,
    EffectResult, EffectTag, Exchange, Resolution, StatLabel,
};
use crate::continuous::{ContinuousEffectScheduler, ReducedEffect};
use crate::entity::Roster;
use crate::types::{DamageType, EntityId, IdAllocator, Proficiency};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Chance of a weapon hurting its wielder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Backlash {
    pub chance: f64,
    pub amount: f64,
    pub damage_type: DamageType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Unarmed attack from strength
    Strike,
    /// Physical hit: `base × proficiency`, reduced by armor
    Weapon {
        base: f64,
        proficiency: Proficiency,
        damage_type: DamageType,
        #[serde(default)]
        backlash: Option<Backlash>,
    },
    /// Magic hit: `base × proficiency`, ignores armor. A negative base heals.
    Spell {
        base: f64,
        proficiency: Proficiency,
        damage_type: DamageType,
    },
    /// Direct healing, capped at max health
    Heal { base: f64, proficiency: Proficiency },
    RestoreMana { base: f64, proficiency: Proficiency },
    /// Immediate hit that also schedules a continuous effect of the same size
    Lingering {
        base: f64,
        proficiency: Proficiency,
        damage_type: DamageType,
        /// Share of a round between ticks
        interval: f64,
        /// Lifetime in sub-ticks of a round
        duration: f64,
    },
    /// Take gold and possibly an item
    Steal { proficiency: Proficiency },
    /// Hurt both sides; the lower the caster's health the harder it hits
    Sacrifice {
        proficiency: Proficiency,
        damage_type: DamageType,
    },
    /// Reveal the target's stats and maybe learn one of its skills
    Scan { proficiency: Proficiency },
}

impl Effect {
    pub fn tag(&self) -> EffectTag {
        match self {
            Effect::Strike => EffectTag::Damage(DamageType::Physical),
            Effect::Weapon { damage_type, .. }
            | Effect::Spell { damage_type, .. }
            | Effect::Lingering { damage_type, .. }
            | Effect::Sacrifice { damage_type, .. } => EffectTag::Damage(*damage_type),
            Effect::Heal { .. } | Effect::RestoreMana { .. } => EffectTag::None,
            Effect::Steal { .. } => EffectTag::Steal,
            Effect::Scan { .. } => EffectTag::Scan,
        }
    }

    pub fn stat(&self) -> StatLabel {
        match self {
            Effect::RestoreMana { .. } => StatLabel::Mana,
            Effect::Steal { .. } => StatLabel::Steal,
            Effect::Scan { .. } => StatLabel::Scan,
            _ => StatLabel::Health,
        }
    }

    /// Proficiency exercised by this effect
    pub fn proficiency(&self) -> Proficiency {
        match self {
            Effect::Strike => Proficiency::HandToHand,
            Effect::Weapon { proficiency, .. }
            | Effect::Spell { proficiency, .. }
            | Effect::Heal { proficiency, .. }
            | Effect::RestoreMana { proficiency, .. }
            | Effect::Lingering { proficiency, .. }
            | Effect::Steal { proficiency }
            | Effect::Sacrifice { proficiency, .. }
            | Effect::Scan { proficiency } => *proficiency,
        }
    }

    /// Whether the effect is meant for allies
    pub fn is_supportive(&self) -> bool {
        match self {
            Effect::Heal { .. } | Effect::RestoreMana { .. } => true,
            Effect::Spell { base, .. } => *base < 0.0,
            _ => false,
        }
    }
}

/// Mutable battle state an effect resolves against
pub struct ActionContext<'a, R: Rng + ?Sized> {
    pub roster: &'a mut Roster,
    pub scheduler: &'a mut ContinuousEffectScheduler,
    /// Mints ids for skills learned mid-battle
    pub ids: &'a mut IdAllocator,
    pub rng: &'a mut R,
}

/// Resolve an effect from `source` onto `target`
///
/// `name` labels any continuous effect the action schedules.
pub fn resolve_action<R: Rng + ?Sized>(
    effect: &Effect,
    name: &str,
    target: EntityId,
    source: EntityId,
    ctx: &mut ActionContext<'_, R>,
) -> Resolution {
    if !ctx.roster.is_alive(source) {
        warn!(%source, effect = name, "entity is not alive and cannot act");
        return Resolution::new(EffectResult::none(effect.tag(), effect.stat()));
    }
    if !ctx.roster.is_alive(target) {
        warn!(%target, effect = name, "target is not alive");
        return Resolution::new(EffectResult::none(effect.tag(), effect.stat()));
    }

    let proficiency = effect.proficiency();
    let skill = ctx
        .roster
        .get(source)
        .map(|entity| entity.stats.proficiency(proficiency))
        .unwrap_or_default();

    let result = match *effect {
        Effect::Strike => return physical_attack(ctx.roster, source, target),
        Effect::Weapon {
            base,
            damage_type,
            backlash,
            ..
        } => {
            let mut result = take_damage(ctx.roster, target, base * skill, damage_type, source);
            if let Some(backlash) = backlash {
                if ctx.rng.gen::<f64>() < backlash.chance {
                    debug!(%source, effect = name, "weapon backlash");
                    result.source =
                        damage_effect(ctx.roster, source, backlash.amount, backlash.damage_type);
                }
            }
            result
        }
        Effect::Spell {
            base, damage_type, ..
        } => take_magic_damage(ctx.roster, target, base * skill, damage_type, source),
        Effect::Heal { base, .. } => heal(ctx.roster, target, base * skill),
        Effect::RestoreMana { base, .. } => gain_mana(ctx.roster, target, base * skill),
        Effect::Lingering {
            base,
            damage_type,
            interval,
            duration,
            ..
        } => {
            let amount = base * skill;
            let exchange = damage_effect(ctx.roster, target, amount, damage_type);
            ctx.scheduler.add_effect(
                name,
                target,
                source,
                ReducedEffect::Damage {
                    amount,
                    damage_type,
                },
                interval,
                duration,
            );
            EffectResult::damage(damage_type, exchange)
        }
        Effect::Steal { .. } => steal(ctx, target, source, skill),
        Effect::Sacrifice { damage_type, .. } => {
            sacrifice(ctx.roster, target, source, skill, damage_type)
        }
        Effect::Scan { .. } => scan(ctx, target, source, skill),
    };

    Resolution::new(result).used(source, proficiency)
}

/// Uniform index into a non-empty collection
fn pick_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> usize {
    ((rng.gen::<f64>() * len as f64) as usize).min(len.saturating_sub(1))
}

/// Item outcome codes reported in the applied slot of a steal
const STEAL_NO_ITEM: f64 = 0.0;
const STEAL_GOT_ITEM: f64 = 1.0;
const STEAL_EMPTY_HANDED: f64 = 2.0;

fn steal<R: Rng + ?Sized>(
    ctx: &mut ActionContext<'_, R>,
    target: EntityId,
    source: EntityId,
    skill: f64,
) -> EffectResult {
    let mut gold = 0;
    if ctx.rng.gen::<f64>() < 0.5 * skill {
        let roll = (ctx.rng.gen::<f64>() * 10.0 * skill).floor() as u32;
        gold = ctx
            .roster
            .get_mut(target)
            .map(|victim| victim.inventory.take_gold(roll))
            .unwrap_or(0);
    }

    let mut item_outcome = STEAL_NO_ITEM;
    let mut stolen = None;
    if ctx.rng.gen::<f64>() < 0.1 * skill {
        if let Some(victim) = ctx.roster.get_mut(target) {
            if victim.inventory.is_empty() {
                item_outcome = STEAL_EMPTY_HANDED;
            } else {
                let index = pick_index(&mut *ctx.rng, victim.inventory.len());
                // Gear comes off before it changes hands
                stolen = victim
                    .inventory
                    .get_by_index(index)
                    .map(|item| item.id)
                    .and_then(|id| victim.give_up_item(id));
                item_outcome = STEAL_GOT_ITEM;
            }
        }
    }

    if let Some(thief) = ctx.roster.get_mut(source) {
        thief.inventory.add_gold(gold);
        if let Some(item) = stolen {
            thief.inventory.add_item(item);
        }
    }

    EffectResult {
        target: Exchange::new(f64::from(gold), item_outcome),
        ..EffectResult::none(EffectTag::Steal, StatLabel::Steal)
    }
}

fn sacrifice(
    roster: &mut Roster,
    target: EntityId,
    source: EntityId,
    skill: f64,
    damage_type: DamageType,
) -> EffectResult {
    let Some(caster) = roster.get(source) else {
        return EffectResult::damage(damage_type, Exchange::default());
    };
    let max = caster.stats.max_health();
    let current = caster.stats.health().max(f64::EPSILON);
    let damage = max * (max / current) * skill;

    let own = take_magic_damage(roster, source, damage, damage_type, target);
    let mut result = take_magic_damage(roster, target, damage, damage_type, source);
    result.source = own.target;
    result
}

fn scan<R: Rng + ?Sized>(
    ctx: &mut ActionContext<'_, R>,
    target: EntityId,
    source: EntityId,
    skill: f64,
) -> EffectResult {
    let learned = match (ctx.roster.get(target), ctx.roster.get(source)) {
        (Some(scanned), Some(scanner)) if scanned.stats.visible && !scanned.skills.is_empty() => {
            let index = pick_index(&mut *ctx.rng, scanned.skills.len());
            let roll = ctx.rng.gen::<f64>() * skill;
            scanned
                .skills
                .get_by_index(index)
                .filter(|candidate| {
                    candidate.can_learn(&scanner.stats)
                        && roll > 0.7
                        && !scanner.skills.knows(&candidate.key)
                })
                .cloned()
        }
        _ => None,
    };

    if let Some(lesson) = learned {
        let copy = lesson.duplicate(ctx.ids);
        if let Some(scanner) = ctx.roster.get_mut(source) {
            debug!(%source, skill = %copy.name, "learned skill by scanning");
            scanner.skills.add(copy);
        }
    }
    if let Some(scanned) = ctx.roster.get_mut(target) {
        scanned.stats.visible = true;
    }

    EffectResult::none(EffectTag::Scan, StatLabel::Scan)
}
