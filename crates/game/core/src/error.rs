//! Common error infrastructure for melee-core.
//!
//! Only contract breaches surface as errors. Everything recoverable inside a
//! round (unsuitable equipment, lost targets, declined prompts, damage that
//! rounds to nothing) is folded into the round outcome and the combat log.
//!
//! # Design Principles
//!
//! - **Type Safety**: each failure has its own variant with the ids involved
//! - **Severity Classification**: errors are categorized for recovery strategies
//! - **Stable Codes**: every variant maps to a static code for logs and tests

use crate::state::{EntityId, Position};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; the caller may retry with another action.
    Recoverable,

    /// Invalid input that should be rejected without retry.
    ///
    /// Examples: unknown combatant id
    Validation,

    /// Unexpected state inconsistency that should be investigated.
    Internal,

    /// Contract breach by the caller; the round cannot start.
    ///
    /// Examples: defender already dead or removed
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Combatant the error is about (if applicable).
    pub actor: Option<EntityId>,

    /// Position where the error occurred (if applicable).
    pub position: Option<Position>,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            actor: None,
            position: None,
            message: None,
        }
    }

    /// Attaches an actor to this context (builder pattern).
    #[must_use]
    pub const fn with_actor(mut self, actor: EntityId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Attaches a position to this context (builder pattern).
    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all melee-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Contract breaches detected when a combat operation is invoked.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    /// No combatant with this id is on the battlefield.
    #[error("unknown combatant {id}")]
    UnknownCombatant { id: EntityId },

    /// The attacker is dead at round start.
    #[error("attacker {id} is dead")]
    AttackerDead { id: EntityId },

    /// The defender is dead at round start.
    #[error("defender {id} is dead")]
    DefenderDead { id: EntityId, context: ErrorContext },

    /// The defender was already taken off the battlefield.
    #[error("defender {id} has been removed from the battlefield")]
    DefenderRemoved { id: EntityId, context: ErrorContext },

    /// Attacker and defender are the same combatant.
    #[error("combatant {id} cannot attack itself")]
    SelfTarget { id: EntityId },
}

impl CombatError {
    pub fn defender_dead(id: EntityId, position: Position) -> Self {
        Self::DefenderDead {
            id,
            context: ErrorContext::new()
                .with_actor(id)
                .with_position(position)
                .with_message("round started against a dead defender"),
        }
    }

    pub fn defender_removed(id: EntityId, position: Position) -> Self {
        Self::DefenderRemoved {
            id,
            context: ErrorContext::new()
                .with_actor(id)
                .with_position(position)
                .with_message("round started against a removed defender"),
        }
    }
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownCombatant { .. } | Self::SelfTarget { .. } => ErrorSeverity::Validation,
            Self::AttackerDead { .. }
            | Self::DefenderDead { .. }
            | Self::DefenderRemoved { .. } => ErrorSeverity::Fatal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::DefenderDead { context, .. } | Self::DefenderRemoved { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCombatant { .. } => "COMBAT_UNKNOWN_COMBATANT",
            Self::AttackerDead { .. } => "COMBAT_ATTACKER_DEAD",
            Self::DefenderDead { .. } => "COMBAT_DEFENDER_DEAD",
            Self::DefenderRemoved { .. } => "COMBAT_DEFENDER_REMOVED",
            Self::SelfTarget { .. } => "COMBAT_SELF_TARGET",
        }
    }
}
