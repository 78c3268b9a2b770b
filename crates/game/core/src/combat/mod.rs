//! Melee combat resolution.
//!
//! # Architecture
//!
//! - **Pure models**: [`resist`], [`armor`] and [`stab`] are side-effect free
//!   apart from the random draws they are handed
//! - **Sequencing**: [`MeleeResolver`] runs whole rounds over an [`Arena`]
//! - **Strike seam**: a single strike is resolved by a [`Striker`], so the
//!   round logic can be tested without rolling real damage
//!
//! # Core Functions
//!
//! - `resolve_melee_round`: one attacker, one defender, one full round
//! - `resist_adjust_damage`: elemental mitigation for a defender
//! - `mitigate`: per-point armor blocks
//! - `classify`: stab vulnerability
//! - `build_cleave_targets` / `execute_cleave`: sweeping swings

pub mod armor;
pub mod cleave;
pub mod flavour;
pub mod guards;
pub mod log;
pub mod prompt;
pub mod resist;
pub mod round;
pub mod sequencer;
pub mod stab;
pub mod strike;

pub use cleave::{CleaveOutcome, CleaveTargets};
pub use flavour::DamageFlavour;
pub use log::{CombatEvent, CombatLog};
pub use prompt::{AlwaysConfirm, AlwaysDecline, Prompter};
pub use resist::{ResistSource, resist_adjust_damage};
pub use round::{AbortReason, AttackRound, RoundOptions, RoundOutcome, SpecialMode};
pub use sequencer::MeleeResolver;
pub use stab::StabType;
pub use strike::{Arena, StandardStriker, StrikeReport, StrikeRequest, StrikeSource, Striker};
