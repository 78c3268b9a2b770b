//! Deterministic melee combat rules for a turn-based dungeon crawler.
//!
//! `melee-core` resolves one combatant's melee round against another: how many
//! strikes happen, who they land on, and how resistances, armor and stabbing
//! shape the damage. Rounds run against an explicit [`state::Battlefield`]
//! through [`combat::MeleeResolver`]; world queries go through the read-only
//! collaborators in [`env`], and every random draw comes from one
//! [`env::CombatRng`] so a round replays identically for a given seed.
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod state;

pub use combat::{
    AbortReason, AlwaysConfirm, Arena, CleaveOutcome, CleaveTargets, CombatEvent, CombatLog,
    DamageFlavour, MeleeResolver, Prompter, ResistSource, RoundOptions, RoundOutcome,
    SpecialMode, StabType, StandardStriker, StrikeReport, StrikeRequest, StrikeSource, Striker,
    resist_adjust_damage,
};
pub use config::CombatConfig;
pub use env::{
    CleaveShape, CombatEnv, CombatRng, CombatTables, FlavourProfile, GridMap, MapDimensions,
    MapOracle, PcgRng, TerrainKind, WeaponProfile, compute_seed,
};
pub use error::{CombatError, ErrorContext, ErrorSeverity, GameError};
pub use state::{
    AttackKind, Attitude, Battlefield, Combatant, CombatantKind, Conditions, CreatureTraits,
    EntityId, Fighter, HandSlot, Mount, NaturalAttack, PlayerTraits, Position, ResistCharm,
    ResistKind, ResistVector, ResourceMeter, Weapon, WeaponClass, WeaponSlots,
};
