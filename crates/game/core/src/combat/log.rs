//! User-facing combat notices.
//!
//! `tracing` carries diagnostics; the log carries what a player would read in
//! the message window. Callers drain it after each round.

use crate::combat::StabType;
use crate::state::{EntityId, Position};

/// Something observable that happened during a round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    /// One resolved strike.
    Strike {
        attacker: EntityId,
        defender: EntityId,
        hit: bool,
        damage: i32,
        blocked: i32,
        stab: StabType,
    },
    /// A cleaving swing reached a secondary target.
    Cleave {
        attacker: EntityId,
        defender: EntityId,
    },
    /// Remaining attacks were redirected to a new target.
    Retarget {
        attacker: EntityId,
        from: EntityId,
        to: EntityId,
    },
    /// A reach attacker stepped back before striking.
    KiteHop {
        attacker: EntityId,
        from: Position,
        to: Position,
    },
    /// The mount is too tired for further head attacks this round.
    MountExhausted { rider: EntityId },
    /// A cleave swing was stopped by terrain.
    ClangsAgainstWall {
        attacker: EntityId,
        defender: EntityId,
    },
    /// No usable melee weapon.
    CannotAttack { attacker: EntityId },
    /// A confirmation prompt was declined.
    Declined { attacker: EntityId, question: String },
    BloodSpatter { position: Position },
    Died { id: EntityId, killer: EntityId },
}

impl CombatEvent {
    /// Short message-window text. `name` resolves ids to display names.
    pub fn describe(&self, name: impl Fn(EntityId) -> String) -> String {
        match self {
            Self::Strike {
                attacker,
                defender,
                hit: true,
                damage,
                stab,
                ..
            } if stab.is_stab() => format!(
                "{} stabs {} for {damage} ({}).",
                name(*attacker),
                name(*defender),
                <&'static str>::from(*stab)
            ),
            Self::Strike {
                attacker,
                defender,
                hit: true,
                damage,
                ..
            } => format!("{} hits {} for {damage}.", name(*attacker), name(*defender)),
            Self::Strike {
                attacker, defender, ..
            } => format!("{} misses {}.", name(*attacker), name(*defender)),
            Self::Cleave { attacker, defender } => {
                format!("{}'s swing carries on to {}.", name(*attacker), name(*defender))
            }
            Self::Retarget { attacker, to, .. } => {
                format!("{} turns to attack {}.", name(*attacker), name(*to))
            }
            Self::KiteHop { attacker, to, .. } => {
                format!("{} hops backward to {to}.", name(*attacker))
            }
            Self::MountExhausted { .. } => "Your mount is too tired to attack.".to_owned(),
            Self::ClangsAgainstWall { attacker, .. } => {
                format!("{}'s weapon clangs harmlessly against the wall.", name(*attacker))
            }
            Self::CannotAttack { attacker } => format!(
                "{} cannot attack with the current equipment.",
                name(*attacker)
            ),
            Self::Declined { question, .. } => format!("{question} No."),
            Self::BloodSpatter { position } => format!("Blood spatters at {position}."),
            Self::Died { id, .. } => format!("{} dies!", name(*id)),
        }
    }
}

/// Ordered record of the events of one or more rounds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatLog {
    events: Vec<CombatEvent>,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, CombatEvent> {
        self.events.drain(..)
    }

    /// Number of strikes recorded so far.
    pub fn strikes(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, CombatEvent::Strike { .. }))
            .count()
    }
}
