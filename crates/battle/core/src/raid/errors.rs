//! Raid-specific rejections.

use crate::engine::ActionError;
use crate::error::{BattleError, ErrorSeverity};
use crate::state::AccountId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RaidError {
    #[error("{0} has not joined this raid")]
    NotJoined(AccountId),

    #[error("{0} has already joined this raid")]
    AlreadyJoined(AccountId),

    #[error("{0} has been eliminated")]
    Eliminated(AccountId),

    #[error("it is {expected}'s turn, not {actual}'s")]
    NotYourTurn {
        expected: AccountId,
        actual: AccountId,
    },

    #[error("raid has ended")]
    Ended,

    #[error(transparent)]
    Action(#[from] ActionError),
}

impl BattleError for RaidError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RaidError::NotYourTurn { .. } => ErrorSeverity::Recoverable,
            RaidError::Action(inner) => inner.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RaidError::NotJoined(_) => "RAID_NOT_JOINED",
            RaidError::AlreadyJoined(_) => "RAID_ALREADY_JOINED",
            RaidError::Eliminated(_) => "RAID_ELIMINATED",
            RaidError::NotYourTurn { .. } => "RAID_NOT_YOUR_TURN",
            RaidError::Ended => "RAID_ENDED",
            RaidError::Action(inner) => inner.error_code(),
        }
    }
}
