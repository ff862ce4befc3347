//! battle_sim - Run a prefab encounter to completion and print the narration
//!
//! Party members follow a simple scripted strategy; monsters use the
//! engine's AI policy.

use clap::Parser;
use combat_core::ai::AiPolicy;
use combat_core::config::{load_catalog, load_constants, load_rosters, RosterConfig};
use combat_core::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "battle_sim", about = "Simulate a turn-based battle")]
struct Args {
    /// Encounter to fight
    #[arg(long, default_value = "first")]
    encounter: String,

    /// Party to fight with
    #[arg(long, default_value = "default")]
    party: String,

    /// Seed for the battle's random rolls
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Stop after this many turns
    #[arg(long, default_value_t = 500)]
    max_turns: u32,

    /// Directory with catalog.toml, rosters.toml and (optionally) constants.toml
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

/// Health share below which a party member drinks a potion
const PANIC_HEALTH: f64 = 0.3;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();
    let (catalog, rosters, constants) = load_content(args.config_dir.as_deref())?;

    let mut ids = IdAllocator::new();
    let party = rosters.party(&args.party, &catalog, &mut ids)?;
    let enemies = rosters.encounter(&args.encounter, &catalog, &mut ids)?;
    let party_ids: Vec<EntityId> = party.iter().map(|entity| entity.id).collect();
    let enemy_ids: Vec<EntityId> = enemies.iter().map(|entity| entity.id).collect();
    let roster: Roster = party.into_iter().chain(enemies).collect();

    info!(encounter = %args.encounter, party = %args.party, seed = args.seed, "starting battle");
    let rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut battle = Battle::with_constants(roster, party_ids, enemy_ids, rng, constants);

    let mut turns = 0;
    let outcome = loop {
        if turns >= args.max_turns {
            warn!(turns, "turn limit reached");
            break battle.outcome();
        }
        turns += 1;

        let report = match battle.step() {
            StepResult::Finished(outcome) => break outcome,
            StepResult::Skipped(report) | StepResult::Acted(report) => report,
            StepResult::AwaitingPlayer(actor) => {
                let (action, target) = choose_action(&battle, actor);
                match battle.perform(actor, action, target) {
                    Ok(report) => report,
                    Err(err) => {
                        // Fall back to a plain attack
                        warn!(%actor, %err, "scripted action refused");
                        let target = AiPolicy::choose_target(battle.roster(), battle.enemies());
                        battle.perform(actor, Action::Strike, target)?
                    }
                }
            }
        };
        for line in report.lines {
            println!("{line}");
        }
    };

    println!();
    match outcome {
        Outcome::Victory => {
            println!("Victory! The party earns {} experience.", battle.experience_reward());
            for (id, levels) in battle.award_experience() {
                if levels > 0 {
                    println!("{} gained {levels} level(s)!", battle.roster().name(id));
                }
            }
        }
        Outcome::Defeat => println!("The party has fallen."),
        Outcome::Ongoing => println!("The battle is still raging after {turns} turns."),
    }
    if let Some(id) = battle.log().highest_damage_dealer() {
        println!("Hardest hitter: {}", battle.roster().name(id));
    }
    Ok(())
}

fn load_content(
    config_dir: Option<&Path>,
) -> Result<(Catalog, RosterConfig, GameConstants), Box<dyn Error>> {
    let Some(dir) = config_dir else {
        let catalog = default_catalog();
        let rosters = default_rosters(&catalog);
        return Ok((catalog, rosters, GameConstants::default()));
    };

    let catalog = load_catalog(&dir.join("catalog.toml"))?;
    let rosters = load_rosters(&dir.join("rosters.toml"), &catalog)?;
    let constants_path = dir.join("constants.toml");
    let constants = if constants_path.exists() {
        load_constants(&constants_path)?
    } else {
        GameConstants::default()
    };
    Ok((catalog, rosters, constants))
}

/// Scripted choice for a party member
///
/// Heal when low, otherwise cast the first affordable attack spell, then
/// swing the strongest weapon, then punch.
fn choose_action(battle: &Battle<ChaCha8Rng>, actor: EntityId) -> (Action, Option<EntityId>) {
    let roster = battle.roster();
    let target = AiPolicy::choose_target(roster, battle.enemies());
    let Some(entity) = roster.get(actor) else {
        return (Action::Strike, target);
    };
    let stats = &entity.stats;

    if stats.health() < stats.max_health() * PANIC_HEALTH {
        let potion = entity
            .inventory
            .items()
            .iter()
            .find(|item| matches!(item.effect(), Some(Effect::Heal { .. })));
        if let Some(potion) = potion {
            return (Action::UseItem(potion.id), Some(actor));
        }
    }

    let spell = entity.skills.all().iter().find(|skill| {
        skill.mana_cost <= stats.mana()
            && matches!(
                skill.effect,
                Effect::Spell { base, .. } | Effect::Lingering { base, .. } if base > 0.0
            )
    });
    if let Some(spell) = spell {
        return (Action::UseSkill(spell.id), target);
    }

    let weapon = entity
        .inventory
        .items()
        .iter()
        .filter_map(|item| match item.effect() {
            Some(Effect::Weapon { base, .. }) => Some((item.id, *base)),
            _ => None,
        })
        .max_by(|a, b| a.1.total_cmp(&b.1));
    match weapon {
        Some((item, _)) => (Action::UseItem(item), target),
        None => (Action::Strike, target),
    }
}
