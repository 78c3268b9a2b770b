//! Read-only world collaborators.
//!
//! Map geometry, rule tables, and tuning constants never change during a round.
//! The [`CombatEnv`] aggregate bundles them so combat code can reach everything
//! it needs without hard coupling to concrete implementations.
mod map;
mod rng;
mod tables;

pub use map::{GridMap, MapDimensions, MapOracle, TerrainKind};
pub use rng::{CombatRng, PcgRng, compute_seed};
pub use tables::{CleaveShape, CombatTables, FlavourProfile, WeaponProfile};

use crate::config::CombatConfig;

/// Aggregates the read-only collaborators a round consults.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    pub map: &'a dyn MapOracle,
    pub tables: &'a CombatTables,
    pub config: &'a CombatConfig,
}

impl<'a> CombatEnv<'a> {
    pub fn new(map: &'a dyn MapOracle, tables: &'a CombatTables, config: &'a CombatConfig) -> Self {
        Self {
            map,
            tables,
            config,
        }
    }
}

impl core::fmt::Debug for CombatEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CombatEnv")
            .field("map", &self.map.dimensions())
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
