//! Battle - Owns the combatants, the turn queue and the effect scheduler
//!
//! A battle walks a fixed turn queue with a wrapping cursor. Dead actors
//! are skipped, AI actors act on [`Battle::step`], and player-controlled
//! actors wait for [`Battle::perform`]. Continuous effects tick after every
//! completed turn.

use crate::ai::{AiAction, AiPolicy};
use crate::catalog::{resolve_action, ActionContext, Effect};
use crate::combat::{expend_mana, ActionKind, BattleEntry, BattleLog, EffectResult, Resolution};
use crate::config::GameConstants;
use crate::continuous::ContinuousEffectScheduler;
use crate::entity::{is_party_member, Roster};
use crate::narration::{self, ActionReport, StanceChange};
use crate::turn_order::build_turn_order_with;
use crate::types::{EntityId, IdAllocator, ItemId, SkillId};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

/// A choice made for a player-controlled entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Unarmed attack
    Strike,
    UseItem(ItemId),
    UseSkill(SkillId),
    Defend,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("the battle is already over")]
    BattleOver,
    #[error("nobody is in the turn order")]
    NoActor,
    #[error("it is not {0}'s turn")]
    NotActorsTurn(EntityId),
    #[error("{0} is controlled by the AI")]
    AiControlled(EntityId),
    #[error("{0} is not controlled by the AI")]
    NotAiControlled(EntityId),
    #[error("{0} is unconscious")]
    ActorDown(EntityId),
    #[error("{actor} does not carry item {item}")]
    UnknownItem { actor: EntityId, item: ItemId },
    #[error("{actor} does not know skill {skill}")]
    UnknownSkill { actor: EntityId, skill: SkillId },
    #[error("'{0}' cannot be used")]
    NotUseable(String),
    #[error("not enough mana: needs {needed}, has {available}")]
    InsufficientMana { needed: f64, available: f64 },
    #[error("the action needs a valid target")]
    MissingTarget,
    #[error("{0} is already down")]
    TargetDown(EntityId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Victory,
    Defeat,
}

/// Lines produced by one completed turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub actor: EntityId,
    pub lines: Vec<String>,
}

/// Result of [`Battle::step`]
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    /// The actor was down and lost the turn
    Skipped(TurnReport),
    /// An AI actor took its turn
    Acted(TurnReport),
    /// A player-controlled actor must `perform` next
    AwaitingPlayer(EntityId),
    Finished(Outcome),
}

/// Resolved choice, ready to run
struct Prepared {
    effect: Effect,
    name: String,
    description: String,
    kind: ActionKind,
    mana_cost: f64,
    consumed: Option<ItemId>,
}

pub struct Battle<R: Rng> {
    roster: Roster,
    party: Vec<EntityId>,
    enemies: Vec<EntityId>,
    turn_order: Vec<EntityId>,
    cursor: usize,
    scheduler: ContinuousEffectScheduler,
    log: BattleLog,
    constants: GameConstants,
    ids: IdAllocator,
    rng: R,
    rewarded: bool,
}

impl<R: Rng> Battle<R> {
    pub fn new(roster: Roster, party: Vec<EntityId>, enemies: Vec<EntityId>, rng: R) -> Self {
        Self::with_constants(roster, party, enemies, rng, GameConstants::default())
    }

    pub fn with_constants(
        mut roster: Roster,
        party: Vec<EntityId>,
        enemies: Vec<EntityId>,
        rng: R,
        constants: GameConstants,
    ) -> Self {
        let policy = AiPolicy::from_constants(&constants);
        for id in &enemies {
            if let Some(enemy) = roster.get_mut(*id) {
                enemy.ai.get_or_insert(policy);
            }
        }

        let participants = party.iter().chain(enemies.iter()).filter_map(|id| roster.get(*id));
        let turn_order = build_turn_order_with(participants, constants.turns.speed_per_extra_turn);

        let combatants = party.len() + enemies.len();
        let scheduler = ContinuousEffectScheduler::new(combatants, IdAllocator::new())
            .with_ticks_per_round(constants.continuous.ticks_per_round);
        let ids = IdAllocator::starting_at(next_free_id(&roster));

        info!(
            party = party.len(),
            enemies = enemies.len(),
            turns = turn_order.len(),
            "battle started"
        );

        Battle {
            roster,
            party,
            enemies,
            turn_order,
            cursor: 0,
            scheduler,
            log: BattleLog::new(),
            constants,
            ids,
            rng,
            rewarded: false,
        }
    }

    // === Queries ===

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Hand the combatants back once the battle is done
    pub fn into_roster(self) -> Roster {
        self.roster
    }

    pub fn party(&self) -> &[EntityId] {
        &self.party
    }

    pub fn enemies(&self) -> &[EntityId] {
        &self.enemies
    }

    pub fn turn_order(&self) -> &[EntityId] {
        &self.turn_order
    }

    pub fn scheduler(&self) -> &ContinuousEffectScheduler {
        &self.scheduler
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn current_actor(&self) -> Option<EntityId> {
        self.turn_order.get(self.cursor).copied()
    }

    pub fn outcome(&self) -> Outcome {
        let all_down = |ids: &[EntityId]| ids.iter().all(|id| !self.roster.is_alive(*id));
        if all_down(&self.party) {
            Outcome::Defeat
        } else if all_down(&self.enemies) {
            Outcome::Victory
        } else {
            Outcome::Ongoing
        }
    }

    /// Experience held by defeated enemies
    pub fn experience_reward(&self) -> u32 {
        self.enemies
            .iter()
            .filter_map(|id| self.roster.get(*id))
            .filter(|enemy| !enemy.is_alive())
            .map(|enemy| enemy.stats.experience())
            .sum()
    }

    /// Give the reward to every surviving party member, once
    ///
    /// Returns the levels each member gained.
    pub fn award_experience(&mut self) -> Vec<(EntityId, u32)> {
        if self.rewarded {
            return Vec::new();
        }
        self.rewarded = true;

        let reward = self.experience_reward();
        let mut gained = Vec::new();
        for id in &self.party {
            let Some(member) = self.roster.get_mut(*id) else {
                continue;
            };
            if !member.is_alive() {
                continue;
            }
            let levels = member.stats.add_experience(reward);
            info!(member = %member.name, reward, levels, "experience awarded");
            gained.push((*id, levels));
        }
        gained
    }

    // === Turn flow ===

    /// Run the current turn if nobody needs to choose
    pub fn step(&mut self) -> StepResult {
        let outcome = self.outcome();
        if outcome != Outcome::Ongoing {
            return StepResult::Finished(outcome);
        }
        let Some(actor) = self.current_actor() else {
            return StepResult::Finished(outcome);
        };

        if !self.roster.is_alive(actor) {
            let line = narration::unconscious_turn_text(&self.roster.name(actor));
            self.log
                .add_entry(BattleEntry::new(line.clone(), ActionKind::Idle).between(actor, None));
            let mut lines = vec![line];
            lines.extend(self.advance());
            return StepResult::Skipped(TurnReport { actor, lines });
        }

        if self.is_ai(actor) {
            match self.take_ai_turn() {
                Ok(report) => StepResult::Acted(report),
                // Only reachable when the battle just ended
                Err(_) => StepResult::Finished(self.outcome()),
            }
        } else {
            StepResult::AwaitingPlayer(actor)
        }
    }

    /// Run the AI for the current actor and end the turn
    pub fn take_ai_turn(&mut self) -> Result<TurnReport, ActionError> {
        let actor = self.ready_actor()?;
        let Some(policy) = self.roster.get(actor).and_then(|entity| entity.ai) else {
            return Err(ActionError::NotAiControlled(actor));
        };

        let opponents = if is_party_member(&self.party, actor) {
            self.enemies.clone()
        } else {
            self.party.clone()
        };
        let turn = policy.take_turn(actor, &mut self.roster, &opponents);

        let target = match turn.action {
            AiAction::Attack(target) => Some(target),
            _ => None,
        };
        // The attack line is last, or second to last when it knocked someone out
        let fatal = target.is_some_and(|target| !self.roster.is_alive(target));
        let attack_line = turn.lines.len().checked_sub(1 + usize::from(fatal));

        for (index, line) in turn.lines.iter().enumerate() {
            let mut entry = BattleEntry::new(line.clone(), ActionKind::Ai).between(actor, target);
            if let (Some(resolution), true) = (&turn.resolution, Some(index) == attack_line) {
                entry = with_damage(entry, resolution, fatal);
            }
            self.log.add_entry(entry);
        }
        if let Some(resolution) = &turn.resolution {
            resolution.record_usage(&mut self.roster, self.constants.proficiency.usage_increment);
        }

        let mut lines = turn.lines;
        lines.extend(self.advance());
        Ok(TurnReport { actor, lines })
    }

    /// Carry out a player's choice for `actor` and end the turn
    pub fn perform(
        &mut self,
        actor: EntityId,
        action: Action,
        target: Option<EntityId>,
    ) -> Result<TurnReport, ActionError> {
        let current = self.ready_actor()?;
        if actor != current {
            return Err(ActionError::NotActorsTurn(actor));
        }
        if self.is_ai(actor) {
            return Err(ActionError::AiControlled(actor));
        }

        let source_name = self.roster.name(actor);
        if action == Action::Defend {
            return Ok(self.defend(actor, source_name));
        }

        let target = target
            .filter(|target| self.roster.contains(*target))
            .ok_or(ActionError::MissingTarget)?;
        if !self.roster.is_alive(target) {
            warn!(%actor, %target, "target is not alive");
            return Err(ActionError::TargetDown(target));
        }
        let target_name = self.roster.name(target);
        let prepared = self.prepare(actor, action, &target_name)?;

        let stance = match self.roster.get_mut(actor).map(|entity| entity.leave_defense()) {
            Some(true) => StanceChange::Left,
            _ => StanceChange::Unchanged,
        };
        if prepared.mana_cost > 0.0 {
            expend_mana(&mut self.roster, actor, prepared.mana_cost);
        }

        let was_alive = self.roster.is_alive(target);
        let resolution = {
            let mut ctx = ActionContext {
                roster: &mut self.roster,
                scheduler: &mut self.scheduler,
                ids: &mut self.ids,
                rng: &mut self.rng,
            };
            resolve_action(&prepared.effect, &prepared.name, target, actor, &mut ctx)
        };
        resolution.record_usage(&mut self.roster, self.constants.proficiency.usage_increment);

        if let Some(item) = prepared.consumed {
            if let Some(entity) = self.roster.get_mut(actor) {
                entity.inventory.remove(item);
            }
        }

        let text = narration::action_text(&ActionReport {
            source: source_name,
            target: target_name.clone(),
            description: prepared.description,
            result: resolution.result,
            stance,
        });
        let fatal = was_alive && !self.roster.is_alive(target);
        debug!(%actor, %target, action = %prepared.kind, fatal, "player action resolved");

        let entry = BattleEntry::new(text.clone(), prepared.kind).between(actor, Some(target));
        let entry = with_damage(entry, &resolution, fatal);
        self.log.add_entry(entry);

        let mut lines = vec![text];
        if fatal {
            let line = narration::knocked_out_text(&target_name);
            self.log.add_entry(
                BattleEntry::new(line.clone(), prepared.kind).between(actor, Some(target)),
            );
            lines.push(line);
        }
        lines.extend(self.advance());
        Ok(TurnReport { actor, lines })
    }

    /// End the current turn: tick continuous effects and move the cursor
    pub fn advance(&mut self) -> Vec<String> {
        let lines = self.scheduler.process_effects(&mut self.roster);
        for line in &lines {
            self.log
                .add_entry(BattleEntry::new(line.clone(), ActionKind::Effect));
        }
        if !self.turn_order.is_empty() {
            self.cursor = (self.cursor + 1) % self.turn_order.len();
        }
        lines
    }

    // === Helpers ===

    fn is_ai(&self, id: EntityId) -> bool {
        self.roster.get(id).is_some_and(|entity| entity.ai.is_some())
    }

    /// Current actor, if the battle can still take a turn
    fn ready_actor(&self) -> Result<EntityId, ActionError> {
        if self.outcome() != Outcome::Ongoing {
            return Err(ActionError::BattleOver);
        }
        let actor = self.current_actor().ok_or(ActionError::NoActor)?;
        if !self.roster.is_alive(actor) {
            return Err(ActionError::ActorDown(actor));
        }
        Ok(actor)
    }

    fn defend(&mut self, actor: EntityId, name: String) -> TurnReport {
        let factor = self.constants.combat.defend_armor_factor;
        let stance = match self.roster.get_mut(actor).map(|entity| entity.enter_defense(factor)) {
            Some(true) => StanceChange::Entered,
            _ => StanceChange::Continued,
        };
        let text = narration::action_text(&ActionReport {
            source: name.clone(),
            target: name,
            description: String::new(),
            result: EffectResult::defend(),
            stance,
        });
        self.log.add_entry(
            BattleEntry::new(text.clone(), ActionKind::Defend).between(actor, Some(actor)),
        );

        let mut lines = vec![text];
        lines.extend(self.advance());
        TurnReport { actor, lines }
    }

    /// Look up the effect behind an action and check it can be paid for
    fn prepare(
        &self,
        actor: EntityId,
        action: Action,
        target_name: &str,
    ) -> Result<Prepared, ActionError> {
        let entity = self.roster.get(actor).ok_or(ActionError::NoActor)?;

        match action {
            Action::Strike | Action::Defend => Ok(Prepared {
                effect: Effect::Strike,
                name: "attack".to_string(),
                description: format!(" attacks {target_name}"),
                kind: ActionKind::Attack,
                mana_cost: 0.0,
                consumed: None,
            }),
            Action::UseItem(item_id) => {
                let item = entity
                    .inventory
                    .get(item_id)
                    .ok_or(ActionError::UnknownItem {
                        actor,
                        item: item_id,
                    })?;
                let effect = item
                    .effect()
                    .cloned()
                    .ok_or_else(|| ActionError::NotUseable(item.name.clone()))?;
                let (description, kind) = if item.is_weapon() {
                    (
                        format!(" attacks {target_name} with {}", item.name),
                        ActionKind::Attack,
                    )
                } else {
                    (
                        format!(" uses {} on {target_name}", item.name),
                        ActionKind::Item,
                    )
                };
                Ok(Prepared {
                    effect,
                    name: item.name.clone(),
                    description,
                    kind,
                    mana_cost: 0.0,
                    consumed: item.consumable.then_some(item_id),
                })
            }
            Action::UseSkill(skill_id) => {
                let skill = entity
                    .skills
                    .get(skill_id)
                    .ok_or(ActionError::UnknownSkill {
                        actor,
                        skill: skill_id,
                    })?;
                let available = entity.stats.mana();
                if available < skill.mana_cost {
                    return Err(ActionError::InsufficientMana {
                        needed: skill.mana_cost,
                        available,
                    });
                }
                Ok(Prepared {
                    effect: skill.effect.clone(),
                    name: skill.name.clone(),
                    description: format!(" uses {} on {target_name}", skill.name),
                    kind: ActionKind::Skill,
                    mana_cost: skill.mana_cost,
                    consumed: None,
                })
            }
        }
    }
}

fn with_damage(entry: BattleEntry, resolution: &Resolution, fatal: bool) -> BattleEntry {
    let result = &resolution.result;
    entry
        .damage(
            result.tag.damage_type(),
            result.target.offered,
            result.target.applied,
        )
        .fatal(fatal)
}

/// First id not used by any entity, item or skill in the roster
fn next_free_id(roster: &Roster) -> u64 {
    roster
        .iter()
        .flat_map(|entity| {
            std::iter::once(entity.id.0)
                .chain(entity.inventory.items().iter().map(|item| item.id.0))
                .chain(entity.skills.all().iter().map(|skill| skill.id.0))
        })
        .max()
        .map_or(0, |id| id + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ItemDef, ItemKind, SkillDef};
    use crate::entity::EntityBuilder;
    use crate::types::{DamageType, EntityKind, Proficiency};
    use rand::rngs::mock::StepRng;

    struct Setup {
        battle: Battle<StepRng>,
        hero: EntityId,
        slime: EntityId,
        potion: ItemId,
        fireball: SkillId,
    }

    fn setup(hero_speed: u32, slime_health: f64) -> Setup {
        let mut ids = IdAllocator::new();
        let potion = ItemDef {
            kind: ItemKind::Item,
            call: "potion".to_string(),
            name: "Health Potion".to_string(),
            description: "Restores 50 health.".to_string(),
            value: 10,
            consumable: true,
            effect: Some(Effect::Heal {
                base: 50.0,
                proficiency: Proficiency::Potions,
            }),
            equip: None,
        }
        .instantiate("health_potion", &mut ids);
        let fireball = SkillDef {
            name: "Fireball".to_string(),
            proficiency: Proficiency::Spellstrike,
            element: Some(DamageType::Fire),
            mana_cost: 7.0,
            effect: Effect::Spell {
                base: 20.0,
                proficiency: Proficiency::Spellstrike,
                damage_type: DamageType::Fire,
            },
            required_level: 1,
            learn: Default::default(),
        }
        .instantiate("fireball", &mut ids);
        let (potion_id, fireball_id) = (potion.id, fireball.id);

        let mut roster = Roster::new();
        let hero = roster.insert(
            EntityBuilder::new("Defaulto", EntityKind::Player)
                .stats(100.0, 10.0, 8.0, 10.0, 8.0)
                .speed(hero_speed)
                .item(potion)
                .skill(fireball)
                .build(&mut ids),
        );
        let slime = roster.insert(
            EntityBuilder::new("Slime", EntityKind::Monster)
                .stats(slime_health, 0.0, 0.0, 5.0, 5.0)
                .experience(5)
                .build(&mut ids),
        );

        Setup {
            battle: Battle::new(roster, vec![hero], vec![slime], StepRng::new(0, 0)),
            hero,
            slime,
            potion: potion_id,
            fireball: fireball_id,
        }
    }

    #[test]
    fn test_new_gives_enemies_ai() {
        let s = setup(0, 50.0);
        assert!(s.battle.roster().get(s.slime).unwrap().ai.is_some());
        assert!(s.battle.roster().get(s.hero).unwrap().ai.is_none());
        assert_eq!(s.battle.turn_order(), &[s.hero, s.slime]);
        assert_eq!(s.battle.scheduler().entity_count(), 2);
    }

    #[test]
    fn test_player_strike_then_ai_turn() {
        let mut s = setup(0, 50.0);
        assert_eq!(s.battle.step(), StepResult::AwaitingPlayer(s.hero));

        let report = s
            .battle
            .perform(s.hero, Action::Strike, Some(s.slime))
            .unwrap();
        // 10 strength × 0.5 hand-to-hand
        assert_eq!(report.lines[0], "Defaulto attacks Slime. Slime lost 5.0 health.");
        assert_eq!(s.battle.roster().get(s.slime).unwrap().stats.health(), 45.0);

        match s.battle.step() {
            StepResult::Acted(report) => {
                assert_eq!(report.actor, s.slime);
                assert!(report.lines[0].starts_with("Slime attacks Defaulto"));
            }
            other => panic!("unexpected step {other:?}"),
        }
        assert_eq!(s.battle.current_actor(), Some(s.hero));
    }

    #[test]
    fn test_perform_refusals() {
        let mut s = setup(0, 50.0);
        assert_eq!(
            s.battle.perform(s.slime, Action::Strike, Some(s.hero)),
            Err(ActionError::NotActorsTurn(s.slime))
        );
        assert_eq!(
            s.battle.perform(s.hero, Action::Strike, None),
            Err(ActionError::MissingTarget)
        );
        assert!(matches!(
            s.battle.perform(s.hero, Action::UseItem(ItemId(999)), Some(s.slime)),
            Err(ActionError::UnknownItem { .. })
        ));
        assert!(matches!(
            s.battle.perform(s.hero, Action::UseSkill(SkillId(999)), Some(s.slime)),
            Err(ActionError::UnknownSkill { .. })
        ));
        // Refusals do not use up the turn
        assert_eq!(s.battle.current_actor(), Some(s.hero));
    }

    #[test]
    fn test_insufficient_mana() {
        let mut s = setup(0, 50.0);
        let fireball = s.fireball;
        s.battle
            .perform(s.hero, Action::UseSkill(fireball), Some(s.slime))
            .unwrap();
        assert_eq!(s.battle.roster().get(s.hero).unwrap().stats.mana(), 3.0);

        s.battle.step();
        assert_eq!(
            s.battle
                .perform(s.hero, Action::UseSkill(fireball), Some(s.slime)),
            Err(ActionError::InsufficientMana {
                needed: 7.0,
                available: 3.0
            })
        );
    }

    #[test]
    fn test_dead_target_costs_nothing() {
        let s = setup(0, 50.0);
        let mut roster = s.battle.into_roster();
        let mut ids = IdAllocator::starting_at(100);
        let second = roster.insert(
            EntityBuilder::new("Slime", EntityKind::Monster)
                .stats(10.0, 0.0, 0.0, 5.0, 5.0)
                .build(&mut ids),
        );
        roster.get_mut(s.slime).unwrap().stats.set_health(0.0);
        let mut battle = Battle::new(
            roster,
            vec![s.hero],
            vec![s.slime, second],
            StepRng::new(0, 0),
        );
        battle.perform(s.hero, Action::Defend, None).unwrap();
        battle.step();
        battle.step();

        assert_eq!(
            battle.perform(s.hero, Action::UseSkill(s.fireball), Some(s.slime)),
            Err(ActionError::TargetDown(s.slime))
        );
        assert_eq!(
            battle.perform(s.hero, Action::UseItem(s.potion), Some(s.slime)),
            Err(ActionError::TargetDown(s.slime))
        );
        let hero = battle.roster().get(s.hero).unwrap();
        assert_eq!(hero.stats.mana(), 10.0);
        assert!(hero.stats.is_defending());
        assert!(hero.inventory.get(s.potion).is_some());
        assert_eq!(battle.current_actor(), Some(s.hero));
    }

    #[test]
    fn test_scheduler_counts_only_combatants() {
        let s = setup(0, 50.0);
        let mut roster = s.battle.into_roster();
        let mut ids = IdAllocator::starting_at(100);
        roster.insert(EntityBuilder::new("Bystander", EntityKind::Player).build(&mut ids));
        let battle = Battle::new(roster, vec![s.hero], vec![s.slime], StepRng::new(0, 0));
        assert_eq!(battle.scheduler().entity_count(), 2);
    }

    #[test]
    fn test_consumable_is_removed() {
        let mut s = setup(0, 50.0);
        s.battle
            .perform(s.hero, Action::UseItem(s.potion), Some(s.hero))
            .unwrap();
        let hero = s.battle.roster().get(s.hero).unwrap();
        assert!(hero.inventory.get(s.potion).is_none());
        assert_eq!(hero.stats.usage(Proficiency::Potions), 5.0);
    }

    #[test]
    fn test_defend_stance_cycle() {
        let mut s = setup(0, 50.0);
        let report = s.battle.perform(s.hero, Action::Defend, None).unwrap();
        assert_eq!(report.lines[0], "Defaulto enters a defensive stance!");
        s.battle.step();

        let report = s.battle.perform(s.hero, Action::Defend, None).unwrap();
        assert_eq!(report.lines[0], "Defaulto continues to defend.");
        s.battle.step();

        let report = s
            .battle
            .perform(s.hero, Action::Strike, Some(s.slime))
            .unwrap();
        assert!(report.lines[0].starts_with("Defaulto leaves their defensive stance and attacks"));
        assert_eq!(s.battle.roster().get(s.hero).unwrap().armor_multiplier(), 1.0);
    }

    #[test]
    fn test_victory_and_reward() {
        let mut s = setup(0, 4.0);
        let report = s
            .battle
            .perform(s.hero, Action::Strike, Some(s.slime))
            .unwrap();
        assert_eq!(report.lines[1], "Slime falls unconscious. Or perhaps they're dead.");
        assert_eq!(s.battle.outcome(), Outcome::Victory);
        assert_eq!(s.battle.step(), StepResult::Finished(Outcome::Victory));
        assert_eq!(
            s.battle.perform(s.hero, Action::Strike, Some(s.slime)),
            Err(ActionError::BattleOver)
        );

        assert_eq!(s.battle.experience_reward(), 5);
        assert_eq!(s.battle.award_experience(), vec![(s.hero, 0)]);
        assert!(s.battle.award_experience().is_empty());
        assert_eq!(s.battle.roster().get(s.hero).unwrap().stats.experience(), 5);
    }

    #[test]
    fn test_log_records_damage() {
        let mut s = setup(0, 50.0);
        s.battle
            .perform(s.hero, Action::Strike, Some(s.slime))
            .unwrap();
        let entry = &s.battle.log().entries()[0];
        assert_eq!(entry.source, Some(s.hero));
        assert_eq!(entry.received, 5.0);
        assert_eq!(s.battle.log().highest_damage_dealer(), Some(s.hero));
    }

    #[test]
    fn test_dead_actor_is_skipped() {
        let s = setup(0, 50.0);
        let mut roster = s.battle.into_roster();
        let mut ids = IdAllocator::starting_at(100);
        let second = roster.insert(
            EntityBuilder::new("Slime", EntityKind::Monster)
                .stats(10.0, 0.0, 0.0, 5.0, 5.0)
                .build(&mut ids),
        );
        roster.get_mut(s.slime).unwrap().stats.set_health(0.0);
        let mut battle = Battle::new(
            roster,
            vec![s.hero],
            vec![s.slime, second],
            StepRng::new(0, 0),
        );

        battle.perform(s.hero, Action::Defend, None).unwrap();
        match battle.step() {
            StepResult::Skipped(report) => {
                assert_eq!(report.actor, s.slime);
                assert_eq!(report.lines[0], "Slime is unconscious and cannot act.");
            }
            other => panic!("unexpected step {other:?}"),
        }
        assert_eq!(battle.current_actor(), Some(second));
        assert_eq!(battle.experience_reward(), 5);
    }

    #[test]
    fn test_party_wipe_is_defeat() {
        let s = setup(0, 50.0);
        let mut roster = s.battle.into_roster();
        roster.get_mut(s.hero).unwrap().stats.set_health(0.0);
        let battle = Battle::new(roster, vec![s.hero], vec![s.slime], StepRng::new(0, 0));
        assert_eq!(battle.outcome(), Outcome::Defeat);
    }

    #[test]
    fn test_next_free_id_skips_gear() {
        let s = setup(0, 50.0);
        // Potion 0, fireball 1, hero 2, slime 3
        assert_eq!(next_free_id(s.battle.roster()), 4);
    }
}
