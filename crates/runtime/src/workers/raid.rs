//! Raid worker: joins, raider actions, and the periodic sweep.
//!
//! Expiry and inactivity are applied by [`RaidEngine::sweep`] on a fixed
//! interval; the engine itself never reads a clock. The sweep stops once the
//! raid is terminal.

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::debug;

use battle_core::{
    AccountId, BattleAction, BattleEvent, CharacterId, Combatant, Owner, RaidEngine, RaidError,
    RaidState, SessionId, SessionMode, TurnResolution,
};

use super::SessionServices;
use super::clock::SessionClock;
use crate::api::Result;
use crate::events::{Event, LifecycleEvent, SessionEvent};

/// Commands that can be sent to a raid worker
pub(crate) enum RaidCommand {
    Join {
        account: AccountId,
        character: CharacterId,
        reply: oneshot::Sender<Result<Vec<BattleEvent>>>,
    },
    Submit {
        account: AccountId,
        action: BattleAction,
        reply: oneshot::Sender<Result<TurnResolution>>,
    },
    State {
        reply: oneshot::Sender<RaidState>,
    },
}

pub(crate) struct RaidWorker {
    session: SessionId,
    state: RaidState,
    services: SessionServices,
    command_rx: mpsc::Receiver<RaidCommand>,
    clock: SessionClock,
}

impl RaidWorker {
    pub fn new(
        state: RaidState,
        services: SessionServices,
        command_rx: mpsc::Receiver<RaidCommand>,
    ) -> Self {
        Self {
            session: state.id,
            state,
            services,
            command_rx,
            clock: SessionClock::start(),
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        self.services
            .event_bus
            .publish(Event::Lifecycle(LifecycleEvent::SessionStarted {
                session: self.session,
                mode: SessionMode::Raid,
            }));

        let period = self
            .services
            .config
            .raid_sweep_interval
            .max(Duration::from_millis(1));
        let mut sweep = time::interval_at(time::Instant::now() + period, period);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let live = !self.state.is_terminal();
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd).await;
                }
                _ = sweep.tick(), if live => {
                    self.sweep().await;
                }
                else => break,
            }
        }

        debug!(session = %self.session, "raid worker stopped");
    }

    async fn handle_command(&mut self, cmd: RaidCommand) {
        match cmd {
            RaidCommand::Join {
                account,
                character,
                reply,
            } => {
                let result = self.join(account, &character).await;
                if let Err(err) = &result {
                    err.log_rejection(self.session);
                }
                if reply.send(result).is_err() {
                    debug!("Join reply channel closed (caller dropped)");
                }
            }
            RaidCommand::Submit {
                account,
                action,
                reply,
            } => {
                let result = self.submit(account, &action).await;
                if let Err(err) = &result {
                    err.log_rejection(self.session);
                }
                if reply.send(result).is_err() {
                    debug!("Submit reply channel closed (caller dropped)");
                }
            }
            RaidCommand::State { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("State reply channel closed (caller dropped)");
                }
            }
        }
    }

    async fn join(&mut self, account: AccountId, character: &CharacterId) -> Result<Vec<BattleEvent>> {
        if self.state.is_terminal() {
            return Err(RaidError::Ended.into());
        }
        let claimed = self.services.registry.claim(account, self.session).await?;

        let result = self.enlist(account, character).await;
        match &result {
            Ok(events) => {
                self.publish(events);
                self.settle_if_finished().await;
            }
            Err(_) if claimed => {
                self.services.registry.release(account, self.session).await;
            }
            Err(_) => {}
        }
        result
    }

    async fn enlist(&mut self, account: AccountId, character: &CharacterId) -> Result<Vec<BattleEvent>> {
        let (build, inventory) = self.services.account_loadout(account, character).await?;

        let oracles = self.services.oracles.clone();
        let env = oracles.env();
        let combatant = Combatant::from_build(&env, Owner::Account(account), &build, inventory)?;
        let now = self.clock.now();
        let events = RaidEngine::new(&mut self.state).join(&env, account, combatant, now)?;
        Ok(events)
    }

    async fn submit(&mut self, account: AccountId, action: &BattleAction) -> Result<TurnResolution> {
        let oracles = self.services.oracles.clone();
        let now = self.clock.now();
        let resolution = RaidEngine::new(&mut self.state).execute(&oracles.env(), account, action, now)?;

        self.publish(&resolution.events);
        self.settle_if_finished().await;
        Ok(resolution)
    }

    async fn sweep(&mut self) {
        let oracles = self.services.oracles.clone();
        let now = self.clock.now();
        let events = RaidEngine::new(&mut self.state).sweep(&oracles.env(), now);
        if !events.is_empty() {
            self.publish(&events);
            self.settle_if_finished().await;
        }
    }

    async fn settle_if_finished(&mut self) {
        if !self.state.is_terminal() {
            return;
        }
        if let Some(outcome) = RaidEngine::new(&mut self.state).take_outcome() {
            self.services.settle(outcome).await;
        }
    }

    fn publish(&self, events: &[BattleEvent]) {
        for event in events {
            self.services.event_bus.publish(Event::Raid(SessionEvent {
                session: self.session,
                event: event.clone(),
            }));
        }
    }
}
