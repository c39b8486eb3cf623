//! Engine errors.
//!
//! Every rejection happens before any state is touched, so a failed call
//! leaves the session exactly as it was and costs no turn.

use crate::env::{CharacterId, EquipmentId, ItemId, MoveId};
use crate::error::{BattleError, ErrorSeverity};
use crate::state::Side;

// ============================================================================
// Action Errors
// ============================================================================

/// Reasons a submitted action is rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("session has already ended")]
    SessionEnded,

    #[error("it is side {expected}'s turn, not side {actual}'s")]
    NotYourTurn { expected: Side, actual: Side },

    #[error("moveset has no move at index {0}")]
    InvalidMove(usize),

    #[error("move '{0}' is not in the catalog")]
    UnknownMove(MoveId),

    #[error("insufficient energy: need {required}, have {available}")]
    InsufficientEnergy { required: u32, available: u32 },

    #[error("item '{0}' is not in the catalog")]
    UnknownItem(ItemId),

    #[error("no '{0}' left in the inventory")]
    ItemNotOwned(ItemId),

    #[error("equipment slot {0} does not exist")]
    InvalidSlot(usize),

    #[error("equipment slot {0} is empty")]
    EmptySlot(usize),

    #[error("equipment in slot {0} cannot be armed")]
    NotArmable(usize),

    #[error("equipment in slot {0} is already armed")]
    AlreadyArmed(usize),

    #[error("equipment in slot {0} has already been used")]
    AlreadyUsed(usize),

    #[error("fleeing is not allowed here")]
    FleeNotAllowed,
}

impl BattleError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            NotYourTurn { .. } | InsufficientEnergy { .. } => ErrorSeverity::Recoverable,
            SessionEnded | InvalidMove(_) | UnknownItem(_) | ItemNotOwned(_) => {
                ErrorSeverity::Validation
            }
            InvalidSlot(_) | EmptySlot(_) | NotArmable(_) | AlreadyArmed(_) | AlreadyUsed(_) => {
                ErrorSeverity::Validation
            }
            FleeNotAllowed => ErrorSeverity::Validation,
            // Builds are validated at session creation; a missing move later
            // means the catalog and the session disagree.
            UnknownMove(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            SessionEnded => "ACTION_SESSION_ENDED",
            NotYourTurn { .. } => "ACTION_NOT_YOUR_TURN",
            InvalidMove(_) => "ACTION_INVALID_MOVE",
            UnknownMove(_) => "ACTION_UNKNOWN_MOVE",
            InsufficientEnergy { .. } => "ACTION_INSUFFICIENT_ENERGY",
            UnknownItem(_) => "ACTION_UNKNOWN_ITEM",
            ItemNotOwned(_) => "ACTION_ITEM_NOT_OWNED",
            InvalidSlot(_) => "ACTION_INVALID_SLOT",
            EmptySlot(_) => "ACTION_EMPTY_SLOT",
            NotArmable(_) => "ACTION_NOT_ARMABLE",
            AlreadyArmed(_) => "ACTION_ALREADY_ARMED",
            AlreadyUsed(_) => "ACTION_ALREADY_USED",
            FleeNotAllowed => "ACTION_FLEE_NOT_ALLOWED",
        }
    }
}

// ============================================================================
// Setup Errors
// ============================================================================

/// Reasons a combatant or session cannot be constructed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetupError {
    #[error("unknown character '{0}'")]
    UnknownCharacter(CharacterId),

    #[error("unknown move '{0}'")]
    UnknownMove(MoveId),

    #[error("unknown equipment '{0}'")]
    UnknownEquipment(EquipmentId),

    #[error("equipment '{equipment}' does not belong in slot {slot}")]
    EquipmentSlotMismatch { slot: usize, equipment: EquipmentId },

    #[error("side {0} has already selected a character")]
    AlreadySelected(Side),

    #[error("both sides must select a character first")]
    LobbyIncomplete,
}

impl BattleError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        use SetupError::*;
        match self {
            AlreadySelected(_) | LobbyIncomplete => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use SetupError::*;
        match self {
            UnknownCharacter(_) => "SETUP_UNKNOWN_CHARACTER",
            UnknownMove(_) => "SETUP_UNKNOWN_MOVE",
            UnknownEquipment(_) => "SETUP_UNKNOWN_EQUIPMENT",
            EquipmentSlotMismatch { .. } => "SETUP_EQUIPMENT_SLOT_MISMATCH",
            AlreadySelected(_) => "SETUP_ALREADY_SELECTED",
            LobbyIncomplete => "SETUP_LOBBY_INCOMPLETE",
        }
    }
}
