//! Stab classification inside a scenario.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use serde::Serialize;

use melee_core::combat::stab;
use melee_core::{EntityId, StabType};

use crate::commands::OutputFormat;
use crate::utils::{Content, lookup, name_of};

/// Classify a stab opportunity inside a scenario
#[derive(Parser)]
pub struct Stab {
    /// Scenario file name without extension (e.g. ambush)
    #[arg(value_name = "SCENARIO")]
    scenario: String,

    /// Name of the defender to classify
    #[arg(value_name = "DEFENDER")]
    defender: String,

    /// Name of the attacker; omit to classify with no attacker at all
    #[arg(short, long)]
    attacker: Option<String>,

    /// Classify as a committed attack (conduct restrictions apply)
    #[arg(long)]
    committing: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct StabReport {
    attacker: Option<EntityId>,
    defender: EntityId,
    stab: StabType,
    bonus_denominator: u32,
}

impl Stab {
    pub fn execute(self, data_dir: &Path) -> Result<()> {
        let content = Content::load(data_dir)?;
        let scenario = content.scenario(data_dir, &self.scenario)?;
        let defender_id = lookup(&scenario, &self.defender)?;
        let attacker_id = self
            .attacker
            .as_deref()
            .map(|name| lookup(&scenario, name))
            .transpose()?;

        let defender = scenario
            .field
            .get(defender_id)
            .context("defender vanished from the battlefield")?;
        let attacker = attacker_id.and_then(|id| scenario.field.get(id));
        let stab = stab::classify(attacker, defender, &scenario.map, self.committing);

        let report = StabReport {
            attacker: attacker_id,
            defender: defender_id,
            stab,
            bonus_denominator: stab.bonus_denominator(),
        };

        match self.format {
            OutputFormat::Summary => {
                let attacker = report
                    .attacker
                    .map_or_else(|| "nobody".to_owned(), |id| name_of(&scenario, id));
                println!(
                    "{} {} -> {}",
                    style("Pair:").bold().cyan(),
                    attacker,
                    name_of(&scenario, report.defender)
                );
                let label = <&'static str>::from(report.stab);
                if report.stab.is_stab() {
                    println!("{} {}", style("Stab:").bold().green(), label);
                    println!(
                        "{} damage / {}",
                        style("Bonus:").bold().cyan(),
                        report.bonus_denominator
                    );
                } else {
                    println!("{} {}", style("Stab:").bold().red(), label);
                }
            }
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize stab report")?;
                println!("{}", json);
            }
        }
        Ok(())
    }
}
