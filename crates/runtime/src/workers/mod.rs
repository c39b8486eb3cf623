//! Background tasks that own live sessions.
//!
//! One worker task per session holds the authoritative state, receives
//! commands from its handle, runs the session's timers, and publishes every
//! event it produces. Nothing else mutates a session.
mod clock;
mod duel;
mod raid;

pub(crate) use duel::{DuelCommand, DuelWorker};
pub(crate) use raid::{RaidCommand, RaidWorker};

use std::sync::Arc;

use battle_core::{AccountId, CharacterBuild, CharacterId, Inventory, SessionOutcome};

use crate::api::{AccountDirectory, OutcomeSink, Result};
use crate::arena::RuntimeConfig;
use crate::events::{Event, EventBus, LifecycleEvent};
use crate::oracle::BattleOracles;
use crate::registry::SessionRegistry;

/// Everything a worker shares with the arena that spawned it.
#[derive(Clone)]
pub(crate) struct SessionServices {
    pub oracles: BattleOracles,
    pub directory: Arc<dyn AccountDirectory>,
    pub sink: Arc<dyn OutcomeSink>,
    pub registry: SessionRegistry,
    pub event_bus: EventBus,
    pub config: RuntimeConfig,
}

impl SessionServices {
    /// Reads the character build and inventory `account` brings to a battle.
    pub async fn account_loadout(
        &self,
        account: AccountId,
        character: &CharacterId,
    ) -> Result<(CharacterBuild, Inventory)> {
        let build = self.directory.character(account, character).await?;
        let inventory = self.directory.inventory(account).await?;
        Ok((build, inventory))
    }

    /// Hands a finished session's outcome to the account layer and removes
    /// the session from the registry.
    ///
    /// Engines hand out each outcome once, so this runs once per session.
    pub async fn settle(&self, outcome: SessionOutcome) {
        let session = outcome.session;
        if let Err(err) = self.sink.apply_outcome(&outcome).await {
            tracing::error!(%session, error = %err, "failed to apply outcome");
        }
        tracing::info!(
            %session,
            mode = %outcome.mode,
            winner = ?outcome.winner,
            reason = %outcome.reason,
            turns = outcome.turns,
            "session settled"
        );

        self.registry.close(session).await;
        self.event_bus
            .publish(Event::Lifecycle(LifecycleEvent::SessionSettled {
                session,
                mode: outcome.mode,
                winner: outcome.winner,
                reason: outcome.reason,
            }));
    }
}
