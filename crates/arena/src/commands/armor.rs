//! Empirical armor mitigation.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use serde::Serialize;

use melee_core::PcgRng;
use melee_core::combat::armor;

use crate::commands::OutputFormat;

/// Measure how much damage an armor value blocks
#[derive(Parser)]
pub struct Armor {
    /// Armor class of the defender
    #[arg(long)]
    ac: i32,

    /// Damage points to roll against the armor
    #[arg(long, default_value_t = 100_000)]
    points: i32,

    /// Seed for the block rolls
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct ArmorReport {
    ac: i32,
    points: i32,
    blocked: i32,
    blocked_fraction: f64,
    expected_fraction: f64,
}

impl Armor {
    pub fn execute(self) -> Result<()> {
        if self.points < 0 {
            anyhow::bail!("--points must not be negative");
        }

        let mut rng = PcgRng::new(self.seed);
        let blocked = armor::mitigate(self.points, self.ac, &mut rng);
        let blocked_fraction = if self.points == 0 {
            0.0
        } else {
            f64::from(blocked) / f64::from(self.points)
        };
        let expected_fraction = if self.ac <= 0 {
            0.0
        } else {
            1.0 - (80.0_f64 / 81.0).powi(self.ac)
        };
        let report = ArmorReport {
            ac: self.ac,
            points: self.points,
            blocked,
            blocked_fraction,
            expected_fraction,
        };

        match self.format {
            OutputFormat::Summary => {
                println!("{} {}", style("Armor:").bold().cyan(), report.ac);
                println!("{} {}", style("Damage rolled:").bold().cyan(), report.points);
                println!(
                    "{} {} ({:.2}%)",
                    style("Blocked:").bold().cyan(),
                    report.blocked,
                    report.blocked_fraction * 100.0
                );
                println!(
                    "{} {:.2}%",
                    style("Expected:").bold().cyan(),
                    report.expected_fraction * 100.0
                );
            }
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize armor report")?;
                println!("{}", json);
            }
        }
        Ok(())
    }
}
