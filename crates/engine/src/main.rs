//! Vagabond rules engine - command-line runner.
//!
//! Reads host documents as JSON, runs one rules operation and prints the
//! structured result as JSON on stdout. Logs go to stderr.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vagabond_domain::{
    Actor, Character, ClassDefinition, CountdownEffect, FavorHinder, MoraleTrigger,
};
use vagabond_engine::infrastructure::config::EngineConfig;
use vagabond_engine::infrastructure::input::read_json;
use vagabond_engine::use_cases::CheckKind;
use vagabond_engine::App;

#[derive(Parser, Debug)]
#[command(name = "vagabond-engine")]
#[command(about = "Resolve Vagabond checks, damage, morale, countdowns and class progression")]
struct Cli {
    /// Engine settings file (TOML); VAGABOND_* environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed the dice for a reproducible run
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print a character's derived statistics
    Derive {
        /// Character JSON
        character: PathBuf,
        /// Print the flattened roll data instead
        #[arg(long)]
        roll_data: bool,
    },
    /// Roll a skill, attack or save check
    Check {
        /// Character JSON
        character: PathBuf,
        /// `skill:<id>`, `attack:<type>` or `save:<reflex|endure|will>`
        target: CheckKind,
        /// Modifier flags JSON (`{"favor.all": true}`)
        #[arg(long)]
        flags: Option<PathBuf>,
        /// Situational favor or hinder chosen at roll time
        #[arg(long, value_enum, default_value_t = Situational::None)]
        situational: Situational,
        /// Flat modifier added to the total
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        modifier: i32,
    },
    /// Roll damage
    Damage {
        /// Damage formula, e.g. `1d8+2` or `1d6+@might`
        #[arg(required_unless_present = "weapon")]
        formula: Option<String>,
        /// Roll a weapon the character carries instead of a formula
        #[arg(long, requires = "character", conflicts_with = "formula")]
        weapon: Option<String>,
        /// Critical hit: double every dice count
        #[arg(long)]
        crit: bool,
        /// Character JSON used to resolve `@key` references
        #[arg(long)]
        character: Option<PathBuf>,
        /// Armor rating of the target
        #[arg(long)]
        armor: Option<i32>,
    },
    /// Roll morale for one NPC
    Morale {
        /// Actor JSON (`{"type": "npc", ...}`)
        actor: PathBuf,
        #[arg(long, value_enum, default_value_t = Trigger::Manual)]
        trigger: Trigger,
        /// Only prompt; do not roll
        #[arg(long)]
        prompt: bool,
    },
    /// Roll morale once for a group of NPCs
    GroupMorale {
        /// JSON array of actors
        actors: PathBuf,
        #[arg(long, value_enum, default_value_t = Trigger::Manual)]
        trigger: Trigger,
    },
    /// Tick every countdown effect once
    Countdown {
        /// JSON array of `{"name": ..., "die": 6|4|0}`
        effects: PathBuf,
    },
    /// Feature diff and resource totals for a class level change
    Progression {
        /// Class definition JSON
        class: PathBuf,
        /// Current level (0 = class not held)
        from: u8,
        /// Target level (0 = remove the class)
        to: u8,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Situational {
    None,
    Favor,
    Hinder,
}

impl From<Situational> for FavorHinder {
    fn from(value: Situational) -> Self {
        match value {
            Situational::None => FavorHinder::None,
            Situational::Favor => FavorHinder::Favor,
            Situational::Hinder => FavorHinder::Hinder,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Trigger {
    FirstAllyDeath,
    HalfGroupDefeated,
    LeaderDefeated,
    SoloHalfHp,
    Manual,
}

impl From<Trigger> for MoraleTrigger {
    fn from(value: Trigger) -> Self {
        match value {
            Trigger::FirstAllyDeath => MoraleTrigger::FirstAllyDeath,
            Trigger::HalfGroupDefeated => MoraleTrigger::HalfGroupDefeated,
            Trigger::LeaderDefeated => MoraleTrigger::LeaderDefeated,
            Trigger::SoloHalfHp => MoraleTrigger::SoloHalfHp,
            Trigger::Manual => MoraleTrigger::Manual,
        }
    }
}

/// Actor state after a roll, so the host can persist it.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WithActors<T: Serialize> {
    result: T,
    actors: Vec<Actor>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = EngineConfig::load(cli.config.as_deref()).context("loading engine settings")?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let app = App::from_config(&config).context("building rules engine")?;
    tracing::debug!(rules_path = ?config.rules_path, "Rules loaded");

    match cli.cmd {
        Cmd::Derive {
            character,
            roll_data,
        } => {
            let character: Character = read_json(&character)?;
            if roll_data {
                print_json(&app.use_cases.stats.roll_data(&character))
            } else {
                print_json(&app.use_cases.stats.execute(&character))
            }
        }
        Cmd::Check {
            character,
            target,
            flags,
            situational,
            modifier,
        } => {
            let character: Character = read_json(&character)?;
            let flags: HashMap<String, bool> = match flags {
                Some(path) => read_json(&path)?,
                None => HashMap::new(),
            };
            let report = app.use_cases.check.execute(
                &character,
                &flags,
                &target,
                situational.into(),
                modifier,
            )?;
            print_json(&report)
        }
        Cmd::Damage {
            formula,
            weapon,
            crit,
            character,
            armor,
        } => {
            let character: Option<Character> = character.map(|path| read_json(&path)).transpose()?;
            let roll_data = character
                .as_ref()
                .map(|character| app.use_cases.stats.roll_data(character));
            let damage = &app.use_cases.damage;
            let report = match (weapon, formula, character.as_ref()) {
                (Some(weapon), _, Some(character)) => {
                    damage.execute_weapon(character, &weapon, crit, roll_data.as_ref(), armor)?
                }
                (_, Some(formula), _) => {
                    damage.execute(&formula, crit, roll_data.as_ref(), armor)?
                }
                _ => anyhow::bail!("Give a damage formula, or --weapon with --character"),
            };
            print_json(&report)
        }
        Cmd::Morale {
            actor,
            trigger,
            prompt,
        } => {
            let mut actor: Actor = read_json(&actor)?;
            if prompt {
                return print_json(&app.use_cases.morale.prompt(&actor, trigger.into()));
            }
            let check = app.use_cases.morale.roll(&mut actor, trigger.into())?;
            print_json(&WithActors {
                result: check,
                actors: vec![actor],
            })
        }
        Cmd::GroupMorale { actors, trigger } => {
            let mut actors: Vec<Actor> = read_json(&actors)?;
            let outcome = app.use_cases.morale.roll_group(&mut actors, trigger.into());
            print_json(&WithActors {
                result: outcome,
                actors,
            })
        }
        Cmd::Countdown { effects } => {
            let mut effects: Vec<CountdownEffect> = read_json(&effects)?;
            let tick = app.use_cases.countdown.execute(&mut effects);
            print_json(&serde_json::json!({ "tick": tick, "effects": effects }))
        }
        Cmd::Progression { class, from, to } => {
            let class: ClassDefinition = read_json(&class)?;
            print_json(&app.use_cases.progression.execute(&class, from, to))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("serializing result")?;
    println!("{}", text);
    Ok(())
}
