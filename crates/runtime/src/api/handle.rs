//! Cloneable façades for issuing commands to session workers.
//!
//! Each handle hides the channel plumbing of one live session. Requests are
//! answered by the session's worker in arrival order, so concurrent callers
//! never observe a half-applied action.
use tokio::sync::{broadcast, mpsc, oneshot};

use battle_core::{
    AccountId, BattleAction, BattleEvent, CharacterId, DuelState, LobbyStatus, RaidState,
    SessionId, TurnResolution,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{DuelCommand, RaidCommand};

/// Read-only view of a duel session.
#[derive(Clone, Debug, PartialEq)]
pub enum DuelView {
    Lobby(LobbyStatus),
    Battle(Box<DuelState>),
    /// Character selection timed out before the duel began.
    Cancelled,
}

async fn request<C, T>(
    command_tx: &mpsc::Sender<C>,
    make: impl FnOnce(oneshot::Sender<T>) -> C,
) -> Result<T> {
    let (reply_tx, reply_rx) = oneshot::channel();

    command_tx
        .send(make(reply_tx))
        .await
        .map_err(|_| RuntimeError::CommandChannelClosed)?;

    reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
}

/// Client-facing handle to one duel.
#[derive(Clone)]
pub struct DuelHandle {
    session: SessionId,
    command_tx: mpsc::Sender<DuelCommand>,
    event_bus: EventBus,
}

impl DuelHandle {
    pub(crate) fn new(
        session: SessionId,
        command_tx: mpsc::Sender<DuelCommand>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            session,
            command_tx,
            event_bus,
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Locks in the character `account` fights with. The duel starts as soon
    /// as both sides have selected.
    pub async fn select_character(
        &self,
        account: AccountId,
        character: impl Into<CharacterId>,
    ) -> Result<LobbyStatus> {
        let character = character.into();
        request(&self.command_tx, |reply| DuelCommand::Select {
            account,
            character,
            reply,
        })
        .await?
    }

    /// Submits an action for the side `account` controls.
    pub async fn submit(&self, account: AccountId, action: BattleAction) -> Result<TurnResolution> {
        request(&self.command_tx, |reply| DuelCommand::Submit {
            account,
            action,
            reply,
        })
        .await?
    }

    pub async fn view(&self) -> Result<DuelView> {
        request(&self.command_tx, |reply| DuelCommand::View { reply }).await
    }

    /// Subscribe to events from a specific topic. Events of every session
    /// share a topic; filter on [`Event::session`].
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }
}

/// Client-facing handle to one raid.
#[derive(Clone)]
pub struct RaidHandle {
    session: SessionId,
    command_tx: mpsc::Sender<RaidCommand>,
    event_bus: EventBus,
}

impl RaidHandle {
    pub(crate) fn new(
        session: SessionId,
        command_tx: mpsc::Sender<RaidCommand>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            session,
            command_tx,
            event_bus,
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Joins `account` with one of its characters.
    ///
    /// Rejected if the account is engaged in any other live session.
    pub async fn join(
        &self,
        account: AccountId,
        character: impl Into<CharacterId>,
    ) -> Result<Vec<BattleEvent>> {
        let character = character.into();
        request(&self.command_tx, |reply| RaidCommand::Join {
            account,
            character,
            reply,
        })
        .await?
    }

    pub async fn submit(&self, account: AccountId, action: BattleAction) -> Result<TurnResolution> {
        request(&self.command_tx, |reply| RaidCommand::Submit {
            account,
            action,
            reply,
        })
        .await?
    }

    pub async fn state(&self) -> Result<RaidState> {
        request(&self.command_tx, |reply| RaidCommand::State { reply }).await
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }
}
