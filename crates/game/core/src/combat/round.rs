//! Round bookkeeping: options in, outcome out.

use strum::{EnumString, IntoStaticStr};

use crate::state::{Attitude, EntityId};

/// Bounded set of special player maneuvers that reshape a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SpecialMode {
    /// Closing-distance strike.
    Lunge,
    /// Spinning strike that already hits everything around the attacker.
    Whirlwind,
    /// Leaping strike off a wall at everything around the landing tile.
    WallJump,
}

impl SpecialMode {
    /// The maneuver addresses every target itself, so weapon cleave is skipped.
    pub const fn suppresses_cleave(self) -> bool {
        matches!(self, Self::Whirlwind | Self::WallJump)
    }
}

/// Per-round options supplied by the turn scheduler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoundOptions {
    /// Resolve numbers only; no blood, no companion strikes, no kiting.
    pub simulated: bool,
    pub special: Option<SpecialMode>,
    /// Targets addressed by the special maneuver; forwarded to each strike.
    pub target_count: u8,
}

impl RoundOptions {
    pub fn simulated() -> Self {
        Self {
            simulated: true,
            ..Self::default()
        }
    }

    pub fn with_special(mut self, special: SpecialMode, target_count: u8) -> Self {
        self.special = Some(special);
        self.target_count = target_count;
        self
    }

    /// Offhand, mutation and mount attacks are skipped during maneuvers.
    pub fn allows_extra_attacks(&self) -> bool {
        self.special.is_none()
    }

    pub fn allows_cleave(&self) -> bool {
        !self.special.is_some_and(SpecialMode::suppresses_cleave)
    }
}

/// Why a round ended without doing what was asked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AbortReason {
    /// No usable melee weapon for the available hands.
    UnsuitableEquipment,
    /// A confirmation prompt was answered no.
    Declined,
    /// A strike reported itself cancelled.
    Cancelled,
    /// The defender was beyond reach before anything was struck.
    OutOfReach,
}

/// Mutable state of the round in progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackRound {
    pub attacker: EntityId,
    /// Current target; changes when the round retargets.
    pub defender: EntityId,
    /// Sub-attacks attempted so far, including ones that failed.
    pub attack_index: u8,
    /// Sub-attacks that count for time accounting, as reported by the striker.
    pub effective_index: u8,
    pub did_hit: bool,
    /// At least one strike went through; cancelling now still costs the turn.
    pub consumed_time: bool,
    pub strikes: u16,
    /// Accumulated time in ticks.
    pub time_cost: u32,
    /// Defender attitude at round start; a change means the target was lost.
    pub initial_attitude: Attitude,
}

impl AttackRound {
    pub fn new(attacker: EntityId, defender: EntityId, initial_attitude: Attitude) -> Self {
        Self {
            attacker,
            defender,
            attack_index: 0,
            effective_index: 0,
            did_hit: false,
            consumed_time: false,
            strikes: 0,
            time_cost: 0,
            initial_attitude,
        }
    }

    /// Adds `delay × percent / 100` ticks to the round.
    pub fn charge(&mut self, delay: u16, percent: u32) {
        self.time_cost += u32::from(delay) * percent / 100;
    }

    pub fn finish(self) -> RoundOutcome {
        RoundOutcome {
            consumed_turn: true,
            did_hit: self.did_hit,
            aborted: None,
            strikes: self.strikes,
            time_cost: self.time_cost,
        }
    }

    /// Ends the round early. The turn is only consumed if something already happened.
    pub fn abort(self, reason: AbortReason) -> RoundOutcome {
        RoundOutcome {
            consumed_turn: self.consumed_time,
            did_hit: self.did_hit,
            aborted: Some(reason),
            strikes: self.strikes,
            time_cost: if self.consumed_time { self.time_cost } else { 0 },
        }
    }
}

/// What the turn scheduler learns from a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundOutcome {
    pub consumed_turn: bool,
    pub did_hit: bool,
    pub aborted: Option<AbortReason>,
    pub strikes: u16,
    pub time_cost: u32,
}

impl RoundOutcome {
    /// A round that never started: nothing happened, no time passes.
    pub fn not_started(reason: AbortReason) -> Self {
        Self {
            aborted: Some(reason),
            ..Self::default()
        }
    }
}
