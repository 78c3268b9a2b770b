//! Seeded melee rounds between two combatants of a scenario.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use serde::Serialize;

use melee_core::{
    Arena, Battlefield, CombatEnv, CombatEvent, CombatLog, EntityId, GameError, MeleeResolver,
    PcgRng, RoundOptions, RoundOutcome, SpecialMode, compute_seed,
};

use crate::commands::OutputFormat;
use crate::utils::{Content, TermPrompter, lookup};

/// Fight seeded melee rounds between two combatants of a scenario
#[derive(Parser)]
pub struct Duel {
    /// Scenario file name without extension (e.g. duel, hydra_den)
    #[arg(value_name = "SCENARIO")]
    scenario: String,

    /// Name of the attacking combatant
    #[arg(short, long, default_value = "you")]
    attacker: String,

    /// Name of the defending combatant
    #[arg(short, long)]
    defender: String,

    /// Number of rounds to fight
    #[arg(short, long, default_value_t = 1)]
    rounds: u32,

    /// Let the defender strike back after every round
    #[arg(long)]
    exchange: bool,

    /// Game seed; the same seed replays the same fight
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Resolve numbers only (no blood, companions or kiting)
    #[arg(long)]
    simulated: bool,

    /// Special maneuver for the attacker (lunge, whirlwind, wall_jump)
    #[arg(long)]
    special: Option<SpecialMode>,

    /// Targets addressed by the special maneuver
    #[arg(long, default_value_t = 1, requires = "special")]
    targets: u8,

    /// Answer every confirmation prompt with yes
    #[arg(short = 'y', long)]
    yes: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct RoundRecord {
    round: u32,
    attacker: EntityId,
    defender: EntityId,
    outcome: RoundOutcome,
    events: Vec<CombatEvent>,
}

#[derive(Serialize)]
struct Standing {
    id: EntityId,
    name: String,
    hp: u32,
    max_hp: u32,
    alive: bool,
}

#[derive(Serialize)]
struct DuelReport {
    scenario: String,
    seed: u64,
    rounds: Vec<RoundRecord>,
    standings: Vec<Standing>,
}

impl Duel {
    pub fn execute(self, data_dir: &Path) -> Result<()> {
        let content = Content::load(data_dir)?;
        let mut scenario = content.scenario(data_dir, &self.scenario)?;
        let attacker = lookup(&scenario, &self.attacker)?;
        let defender = lookup(&scenario, &self.defender)?;
        let names: HashMap<EntityId, String> = scenario
            .field
            .iter()
            .map(|c| (c.id, c.name.clone()))
            .collect();

        let mut options = RoundOptions {
            simulated: self.simulated,
            ..RoundOptions::default()
        };
        if let Some(special) = self.special {
            options = options.with_special(special, self.targets);
        }

        let mut rng = PcgRng::new(compute_seed(self.seed, 0, attacker.0, defender.0));
        let mut log = CombatLog::new();
        let mut prompter = TermPrompter::new(self.yes);
        let env = CombatEnv::new(&scenario.map, &content.tables, &content.config);
        let arena = Arena::new(&mut scenario.field, env, &mut rng, &mut prompter, &mut log);
        let mut resolver = MeleeResolver::new(arena);

        let mut turns = vec![(attacker, defender, options)];
        if self.exchange {
            turns.push((defender, attacker, RoundOptions::default()));
        }

        let mut records = Vec::new();
        'rounds: for round in 1..=self.rounds {
            for &(from, to, options) in &turns {
                let field = &*resolver.arena().field;
                if !standing(field, from) || !standing(field, to) {
                    break 'rounds;
                }
                let outcome = resolver
                    .resolve_melee_round(from, to, options)
                    .inspect_err(|err| {
                        tracing::error!(
                            code = err.error_code(),
                            severity = err.severity().as_str(),
                            "{}",
                            err
                        );
                    })
                    .with_context(|| format!("round {} could not start", round))?;
                let events = resolver.arena_mut().log.drain().collect();
                records.push(RoundRecord {
                    round,
                    attacker: from,
                    defender: to,
                    outcome,
                    events,
                });
            }
        }

        let report = DuelReport {
            scenario: scenario.name.clone(),
            seed: self.seed,
            rounds: records,
            standings: [attacker, defender]
                .into_iter()
                .filter_map(|id| scenario.field.get(id))
                .map(|c| Standing {
                    id: c.id,
                    name: c.name.clone(),
                    hp: c.hp.current,
                    max_hp: c.hp.maximum,
                    alive: c.is_present(),
                })
                .collect(),
        };
        tracing::info!(
            scenario = %report.scenario,
            rounds = report.rounds.len(),
            "duel finished"
        );

        match self.format {
            OutputFormat::Summary => print_summary(&report, &names),
            OutputFormat::Json => print_json(&report)?,
        }
        Ok(())
    }
}

fn standing(field: &Battlefield, id: EntityId) -> bool {
    field.get(id).is_some_and(|c| c.is_present())
}

fn print_summary(report: &DuelReport, names: &HashMap<EntityId, String>) {
    let name = |id: EntityId| names.get(&id).cloned().unwrap_or_else(|| id.to_string());

    println!(
        "{}",
        style(format!("=== Duel: {} (seed {}) ===", report.scenario, report.seed))
            .bold()
            .green()
    );
    println!();

    for record in &report.rounds {
        println!(
            "{} {} -> {}",
            style(format!("Round {}:", record.round)).bold().yellow(),
            name(record.attacker),
            name(record.defender)
        );
        for event in &record.events {
            println!("  {}", event.describe(&name));
        }
        let outcome = &record.outcome;
        match outcome.aborted {
            Some(reason) if !outcome.consumed_turn => println!(
                "  {} ({})",
                style("no time spent").dim(),
                <&'static str>::from(reason)
            ),
            _ => println!(
                "  {}",
                style(format!(
                    "{} strikes, {} ticks{}",
                    outcome.strikes,
                    outcome.time_cost,
                    if outcome.did_hit { "" } else { ", nothing landed" }
                ))
                .dim()
            ),
        }
    }
    println!();

    println!("{}", style("Standing:").bold().yellow());
    for standing in &report.standings {
        let hp = format!("{}/{}", standing.hp, standing.max_hp);
        if standing.alive {
            println!("  {} {}", standing.name, style(hp).green());
        } else {
            println!("  {} {}", standing.name, style("down").red());
        }
    }
}

fn print_json(report: &DuelReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize duel report")?;
    println!("{}", json);
    Ok(())
}
