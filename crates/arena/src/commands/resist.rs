//! Resistance adjustment for a single damage roll.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use serde::Serialize;

use melee_core::{
    AttackKind, Combatant, CreatureTraits, DamageFlavour, EntityId, NaturalAttack, PcgRng,
    Position, ResistCharm, ResistVector, resist_adjust_damage,
};

use crate::commands::OutputFormat;
use crate::utils::Content;

/// Apply a resistance level to a damage roll
#[derive(Parser)]
pub struct Resist {
    /// Damage flavour (fire, cold, poison, negative, ...)
    #[arg(value_name = "FLAVOUR")]
    flavour: DamageFlavour,

    /// Raw damage before resistance
    #[arg(value_name = "RAW")]
    raw: i32,

    /// Resistance level of the defender (-3..=4)
    #[arg(short, long, default_value_t = 1, allow_hyphen_values = true)]
    level: i8,

    /// Resolve for a creature instead of the player
    #[arg(long)]
    creature: bool,

    /// Worn charm (warding_cloak, chaos_amulet); creatures only
    #[arg(long, requires = "creature")]
    charm: Option<ResistCharm>,

    /// Repeat the roll this many times and show the spread
    #[arg(long, default_value_t = 1)]
    samples: u32,

    /// Seed for charm rolls
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct ResistReport {
    flavour: DamageFlavour,
    raw: i32,
    level: i8,
    creature: bool,
    charm: Option<ResistCharm>,
    /// Adjusted damage -> how often it came up.
    outcomes: BTreeMap<i32, u32>,
}

impl Resist {
    pub fn execute(self, data_dir: &Path) -> Result<()> {
        let content = Content::load(data_dir)?;
        let profile = content.tables.flavour(self.flavour);
        let Some(kind) = profile.resist else {
            anyhow::bail!(
                "{} damage is not resistible",
                <&'static str>::from(self.flavour)
            );
        };
        if !(ResistVector::MIN_LEVEL..=ResistVector::MAX_LEVEL).contains(&self.level) {
            anyhow::bail!(
                "level must be within {}..={}",
                ResistVector::MIN_LEVEL,
                ResistVector::MAX_LEVEL
            );
        }

        let resists = ResistVector::none().with(kind, self.level);
        let defender = if self.creature {
            let mut traits = CreatureTraits::with_attacks([NaturalAttack::new(AttackKind::Hit, 1)]);
            traits.charm = self.charm;
            Combatant::creature(EntityId(1), "target", Position::ORIGIN, 1, traits)
        } else {
            Combatant::player("you", Position::ORIGIN, 1)
        };
        let defender = defender.with_resists(resists);

        let mut rng = PcgRng::new(self.seed);
        let mut outcomes = BTreeMap::new();
        for _ in 0..self.samples.max(1) {
            let adjusted =
                resist_adjust_damage(&defender, self.flavour, self.raw, &content.tables, &mut rng);
            *outcomes.entry(adjusted).or_insert(0) += 1;
        }

        let report = ResistReport {
            flavour: self.flavour,
            raw: self.raw,
            level: self.level,
            creature: self.creature,
            charm: self.charm,
            outcomes,
        };

        match self.format {
            OutputFormat::Summary => print_summary(&report),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize resist report")?;
                println!("{}", json);
            }
        }
        Ok(())
    }
}

fn print_summary(report: &ResistReport) {
    println!(
        "{} {} {} against {} level {}",
        style("Damage:").bold().cyan(),
        report.raw,
        <&'static str>::from(report.flavour),
        if report.creature { "creature" } else { "player" },
        report.level
    );
    if let Some(charm) = report.charm {
        println!(
            "{} {}",
            style("Charm:").bold().cyan(),
            <&'static str>::from(charm)
        );
    }

    if report.outcomes.len() == 1
        && let Some(adjusted) = report.outcomes.keys().next()
    {
        println!("{} {}", style("Adjusted:").bold().green(), adjusted);
        return;
    }
    let total: u32 = report.outcomes.values().sum();
    println!("{}", style("Adjusted:").bold().green());
    for (adjusted, count) in &report.outcomes {
        println!(
            "  {:>5}  {:>6.2}%",
            adjusted,
            f64::from(*count) * 100.0 / f64::from(total)
        );
    }
}
