//! Common error infrastructure for combat-core.
//!
//! Two failure classes exist:
//!
//! - **Precondition violations** ([`CombatError`]): the host called an
//!   operation it must never call (unknown combatant, combat already over).
//!   These surface as `Err` and indicate a defect in the caller.
//! - **Gameplay rejections** ([`AbilityRejection`]): the player asked for
//!   something the rules forbid right now (cooldown, mana). These are carried
//!   inside structured results with `success = false` and leave state intact.

use crate::state::{CombatStatus, EntityId};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The player may choose another action and try again.
    Recoverable,

    /// Invalid input, should not retry without changes.
    Validation,

    /// Unexpected state inconsistency inside the engine.
    Internal,

    /// The caller broke the engine contract; the call cannot proceed.
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

    /// Returns true if this error indicates a bug in the engine or its host.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

// ============================================================================
// Precondition Violations
// ============================================================================

/// Contract breaches reported by session operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatError {
    /// The referenced combatant is not part of this encounter.
    #[error("combatant {0} is not part of this encounter")]
    UnknownCombatant(EntityId),

    /// The encounter already reached a terminal status.
    #[error("combat is over ({0})")]
    NotInProgress(CombatStatus),

    /// Two participants were given the same id.
    #[error("combatant id {0} is used more than once")]
    DuplicateCombatant(EntityId),
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CombatError::UnknownCombatant(_) => ErrorSeverity::Fatal,
            CombatError::NotInProgress(_) => ErrorSeverity::Fatal,
            CombatError::DuplicateCombatant(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CombatError::UnknownCombatant(_) => "COMBAT_UNKNOWN_COMBATANT",
            CombatError::NotInProgress(_) => "COMBAT_NOT_IN_PROGRESS",
            CombatError::DuplicateCombatant(_) => "COMBAT_DUPLICATE_COMBATANT",
        }
    }
}

// ============================================================================
// Gameplay Rejections
// ============================================================================

/// Reasons an ability use was refused. State is untouched when one is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityRejection {
    #[error("you don't know an ability called '{0}'")]
    UnknownAbility(String),

    #[error("{name} is on cooldown ({remaining} turns remaining)")]
    OnCooldown { name: String, remaining: u32 },

    #[error("not enough mana for {name} (need {required}, have {available})")]
    InsufficientMana {
        name: String,
        required: u32,
        available: u32,
    },

    #[error("{0} needs a target")]
    TargetRequired(String),

    #[error("target {0} not found")]
    TargetNotFound(EntityId),

    #[error("combat is already over")]
    CombatOver,
}

impl GameError for AbilityRejection {
    fn severity(&self) -> ErrorSeverity {
        use AbilityRejection::*;
        match self {
            OnCooldown { .. } | InsufficientMana { .. } => ErrorSeverity::Recoverable,
            UnknownAbility(_) | TargetRequired(_) | TargetNotFound(_) => {
                ErrorSeverity::Validation
            }
            CombatOver => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use AbilityRejection::*;
        match self {
            UnknownAbility(_) => "ABILITY_UNKNOWN",
            OnCooldown { .. } => "ABILITY_ON_COOLDOWN",
            InsufficientMana { .. } => "ABILITY_INSUFFICIENT_MANA",
            TargetRequired(_) => "ABILITY_TARGET_REQUIRED",
            TargetNotFound(_) => "ABILITY_TARGET_NOT_FOUND",
            CombatOver => "ABILITY_COMBAT_OVER",
        }
    }
}
