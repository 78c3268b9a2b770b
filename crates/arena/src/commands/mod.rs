//! Command implementations for the arena
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod armor;
mod duel;
mod resist;
mod stab;

pub use armor::Armor;
pub use duel::Duel;
pub use resist::Resist;
pub use stab::Stab;

/// Output format shared by the reporting commands.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Summary,
    /// Full JSON output
    Json,
}
