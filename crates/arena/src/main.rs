//! Melee arena: a developer CLI for the combat rules.
//!
//! Runs seeded duels from the scenario files and answers one-off questions
//! about armor, resistances and stabbing.
//! Run with: `cargo run -p melee-arena -- <command>`

mod commands;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use commands::{Armor, Duel, Resist, Stab};

/// Melee combat arena
#[derive(Parser)]
#[command(name = "melee-arena")]
#[command(about = "Run and inspect melee combat rounds", long_about = None)]
#[command(version)]
struct Cli {
    /// Content directory (defaults to $MELEE_DATA_DIR, then ./data)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log more (-v for debug, -vv for trace); RUST_LOG wins when set
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Fight seeded melee rounds between two combatants of a scenario
    Duel(Duel),

    /// Measure how much damage an armor value blocks
    Armor(Armor),

    /// Apply a resistance level to a damage roll
    Resist(Resist),

    /// Classify a stab opportunity inside a scenario
    Stab(Stab),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for MELEE_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    utils::setup_logging(cli.verbose);

    let data_dir = utils::data_dir(cli.data_dir);
    tracing::debug!(data_dir = %data_dir.display(), "content directory");

    match cli.command {
        Command::Duel(cmd) => cmd.execute(&data_dir),
        Command::Armor(cmd) => cmd.execute(),
        Command::Resist(cmd) => cmd.execute(&data_dir),
        Command::Stab(cmd) => cmd.execute(&data_dir),
    }
}
