//! Data-driven combat content and loaders.
//!
//! This crate turns the RON/TOML files under `data/` into `melee-core` values:
//! - Combat tunables (`config.toml`)
//! - Flavour and weapon-class tables layered over the built-in ones (`tables.ron`)
//! - Creature templates (`bestiary.ron`)
//! - Arena scenarios: a map plus the combatants standing on it (`scenarios/*.ron`)
//!
//! Content is read once at startup and never appears in round state.

pub mod loaders;

pub use loaders::{
    Bestiary, BestiaryLoader, ConfigLoader, ContentFactory, CreatureSpec, LoadResult, Scenario,
    ScenarioLoader, TablesLoader, TablesSpec,
};
