//! Unified error type surfaced by the runtime API.
//!
//! Wraps engine rejections, collaborator failures, and worker coordination
//! failures so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use battle_core::{
    AccountId, ActionError, BattleError, CharacterId, ErrorSeverity, RaidError, SessionId,
    SetupError,
};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("arena requires a catalog before building")]
    MissingCatalog,

    #[error("{account} is already engaged in {session}")]
    AlreadyEngaged {
        account: AccountId,
        session: SessionId,
    },

    #[error("{account} is not a participant of {session}")]
    NotParticipant {
        account: AccountId,
        session: SessionId,
    },

    #[error("{0} is still waiting for character selection")]
    LobbyPending(SessionId),

    #[error("character selection for {0} is closed")]
    SelectionClosed(SessionId),

    #[error("unknown account {0}")]
    UnknownAccount(AccountId),

    #[error("{account} does not own character '{character}'")]
    CharacterNotOwned {
        account: AccountId,
        character: CharacterId,
    },

    #[error("account collaborator failed: {0}")]
    Collaborator(String),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Raid(#[from] RaidError),
}

impl RuntimeError {
    /// Classification used to pick the log level of a rejection.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Action(err) => err.severity(),
            RuntimeError::Setup(err) => err.severity(),
            RuntimeError::Raid(err) => err.severity(),
            RuntimeError::LobbyPending(_) => ErrorSeverity::Recoverable,
            RuntimeError::CommandChannelClosed
            | RuntimeError::ReplyChannelClosed(_)
            | RuntimeError::MissingCatalog
            | RuntimeError::Collaborator(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::Action(err) => err.error_code(),
            RuntimeError::Setup(err) => err.error_code(),
            RuntimeError::Raid(err) => err.error_code(),
            RuntimeError::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            RuntimeError::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            RuntimeError::MissingCatalog => "RUNTIME_MISSING_CATALOG",
            RuntimeError::AlreadyEngaged { .. } => "RUNTIME_ALREADY_ENGAGED",
            RuntimeError::NotParticipant { .. } => "RUNTIME_NOT_PARTICIPANT",
            RuntimeError::LobbyPending(_) => "RUNTIME_LOBBY_PENDING",
            RuntimeError::SelectionClosed(_) => "RUNTIME_SELECTION_CLOSED",
            RuntimeError::UnknownAccount(_) => "RUNTIME_UNKNOWN_ACCOUNT",
            RuntimeError::CharacterNotOwned { .. } => "RUNTIME_CHARACTER_NOT_OWNED",
            RuntimeError::Collaborator(_) => "RUNTIME_COLLABORATOR",
        }
    }

    /// Logs a rejected request at a level matching its severity.
    pub(crate) fn log_rejection(&self, session: SessionId) {
        let code = self.error_code();
        let severity = self.severity();
        let kind = severity.as_str();
        match severity {
            ErrorSeverity::Internal => tracing::error!(%session, code, kind, error = %self, "request failed"),
            ErrorSeverity::Recoverable => tracing::debug!(%session, code, kind, error = %self, "request rejected"),
            ErrorSeverity::Validation => tracing::info!(%session, code, kind, error = %self, "request rejected"),
        }
    }
}
