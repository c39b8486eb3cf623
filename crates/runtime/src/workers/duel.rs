//! Duel worker: character selection, turn timers, and AI-driven sides.
//!
//! The worker owns a [`DuelLobby`] until both sides have selected, then the
//! [`DuelState`]. At most one deadline is pending at a time: the selection
//! timeout while in the lobby, then either the human side's action timeout
//! or the pacing delay before an AI side acts. A terminal duel clears it.

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Duration, Instant};
use tracing::{debug, error, warn};

use battle_core::env::compute_seed;
use battle_core::{
    AccountId, BattleAction, BattleEvent, CharacterId, DuelEngine, DuelLobby, DuelState,
    LobbyStatus, SessionId, SessionMode, Side, TurnResolution, ai,
};

use super::SessionServices;
use crate::api::{DuelView, Result, RuntimeError};
use crate::events::{Event, LifecycleEvent, SessionEvent};

/// Stream salt separating AI decisions from the duel's own rolls.
const AI_STREAM: u64 = 0xA1;

/// Commands that can be sent to a duel worker
pub(crate) enum DuelCommand {
    Select {
        account: AccountId,
        character: CharacterId,
        reply: oneshot::Sender<Result<LobbyStatus>>,
    },
    Submit {
        account: AccountId,
        action: BattleAction,
        reply: oneshot::Sender<Result<TurnResolution>>,
    },
    View {
        reply: oneshot::Sender<DuelView>,
    },
}

enum Stage {
    Lobby(DuelLobby),
    Battle(DuelState),
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Deadline {
    Selection,
    Action,
    AiTurn,
}

#[derive(Clone, Copy, Debug)]
struct Timer {
    at: Instant,
    kind: Deadline,
}

impl Timer {
    fn after(kind: Deadline, delay: Duration) -> Self {
        Self {
            at: Instant::now() + delay,
            kind,
        }
    }
}

pub(crate) struct DuelWorker {
    session: SessionId,
    stage: Stage,
    services: SessionServices,
    command_rx: mpsc::Receiver<DuelCommand>,
    timer: Option<Timer>,
    ai_seed: u64,
    ai_rolls: u64,
}

impl DuelWorker {
    pub fn new(
        lobby: DuelLobby,
        seed: u64,
        services: SessionServices,
        command_rx: mpsc::Receiver<DuelCommand>,
    ) -> Self {
        Self {
            session: lobby.id(),
            stage: Stage::Lobby(lobby),
            services,
            command_rx,
            timer: None,
            ai_seed: compute_seed(seed, AI_STREAM),
            ai_rolls: 0,
        }
    }

    /// Main worker loop.
    ///
    /// Runs until every handle is dropped and no deadline is pending.
    pub async fn run(mut self) {
        self.open();

        loop {
            let deadline = self.timer.map(|timer| timer.at);
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd).await;
                }
                _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.handle_deadline().await;
                }
                else => break,
            }
        }

        debug!(session = %self.session, "duel worker stopped");
    }

    fn open(&mut self) {
        self.publish_lifecycle(LifecycleEvent::LobbyOpened {
            session: self.session,
        });

        let ready = matches!(&self.stage, Stage::Lobby(lobby) if lobby.status() == LobbyStatus::Ready);
        if ready {
            if let Err(err) = self.start() {
                err.log_rejection(self.session);
            }
        } else {
            self.timer = Some(Timer::after(
                Deadline::Selection,
                self.services.config.selection_timeout,
            ));
        }
    }

    async fn handle_command(&mut self, cmd: DuelCommand) {
        match cmd {
            DuelCommand::Select {
                account,
                character,
                reply,
            } => {
                let result = self.select(account, character).await;
                if let Err(err) = &result {
                    err.log_rejection(self.session);
                }
                if reply.send(result).is_err() {
                    debug!("Select reply channel closed (caller dropped)");
                }
            }
            DuelCommand::Submit {
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
            DuelCommand::View { reply } => {
                if reply.send(self.view()).is_err() {
                    debug!("View reply channel closed (caller dropped)");
                }
            }
        }
    }

    async fn handle_deadline(&mut self) {
        let Some(timer) = self.timer.take() else {
            return;
        };
        match timer.kind {
            Deadline::Selection => self.cancel_lobby().await,
            Deadline::Action => self.time_out().await,
            Deadline::AiTurn => self.play_ai_turn().await,
        }
    }

    // ===== lobby =====

    async fn select(&mut self, account: AccountId, character: CharacterId) -> Result<LobbyStatus> {
        let side = match &self.stage {
            Stage::Lobby(lobby) => lobby.side_of(account).ok_or(RuntimeError::NotParticipant {
                account,
                session: self.session,
            })?,
            Stage::Battle(_) | Stage::Cancelled => {
                return Err(RuntimeError::SelectionClosed(self.session));
            }
        };

        let (build, inventory) = self.services.account_loadout(account, &character).await?;

        let oracles = self.services.oracles.clone();
        let Stage::Lobby(lobby) = &mut self.stage else {
            return Err(RuntimeError::SelectionClosed(self.session));
        };
        let status = lobby.select(&oracles.env(), side, &build, inventory)?;
        if status == LobbyStatus::Ready {
            self.start()?;
        }
        Ok(status)
    }

    fn start(&mut self) -> Result<()> {
        let oracles = self.services.oracles.clone();
        let Stage::Lobby(lobby) = &mut self.stage else {
            return Ok(());
        };
        let (state, events) = lobby.start(&oracles.env())?;
        self.stage = Stage::Battle(state);

        self.publish_lifecycle(LifecycleEvent::SessionStarted {
            session: self.session,
            mode: SessionMode::Duel,
        });
        self.publish(&events);
        self.schedule_turn();
        Ok(())
    }

    async fn cancel_lobby(&mut self) {
        if !matches!(self.stage, Stage::Lobby(_)) {
            return;
        }
        warn!(session = %self.session, "character selection timed out");
        self.stage = Stage::Cancelled;
        self.services.registry.close(self.session).await;
        self.publish_lifecycle(LifecycleEvent::LobbyCancelled {
            session: self.session,
        });
    }

    // ===== battle =====

    async fn submit(&mut self, account: AccountId, action: &BattleAction) -> Result<TurnResolution> {
        let session = self.session;
        let oracles = self.services.oracles.clone();
        let state = match &mut self.stage {
            Stage::Battle(state) => state,
            Stage::Lobby(_) => return Err(RuntimeError::LobbyPending(session)),
            Stage::Cancelled => return Err(RuntimeError::SelectionClosed(session)),
        };
        let side = Side::BOTH
            .into_iter()
            .find(|side| state.combatant(*side).owner.account() == Some(account))
            .ok_or(RuntimeError::NotParticipant { account, session })?;

        let resolution = DuelEngine::new(state).execute(&oracles.env(), side, action)?;
        self.after_resolution(&resolution).await;
        Ok(resolution)
    }

    /// The human side let its action timer run out.
    async fn time_out(&mut self) {
        let oracles = self.services.oracles.clone();
        let Stage::Battle(state) = &mut self.stage else {
            return;
        };
        let result = DuelEngine::new(state).timeout(&oracles.env());
        match result {
            Ok(resolution) => self.after_resolution(&resolution).await,
            Err(err) => RuntimeError::from(err).log_rejection(self.session),
        }
    }

    async fn play_ai_turn(&mut self) {
        let session = self.session;
        let oracles = self.services.oracles.clone();
        let Stage::Battle(state) = &mut self.stage else {
            return;
        };
        let Some(side) = state.current() else {
            return;
        };

        let env = oracles.env();
        let mut dice = env.dice(self.ai_seed, self.ai_rolls);
        let action = ai::choose_action(
            &env,
            &mut dice,
            state.combatant(side),
            state.combatant(side.opponent()),
        );
        self.ai_rolls = dice.nonce();
        debug!(%session, %side, ?action, "ai side acts");

        let chosen = DuelEngine::new(state).execute(&env, side, &action);
        let result = match chosen {
            Ok(resolution) => Ok(resolution),
            Err(err) => {
                warn!(%session, %side, error = %err, "ai action rejected, passing");
                DuelEngine::new(state).execute(&env, side, &BattleAction::Pass)
            }
        };
        let resolution = match result {
            Ok(resolution) => resolution,
            Err(err) => {
                error!(%session, %side, error = %err, "ai side cannot act");
                return;
            }
        };
        self.after_resolution(&resolution).await;
    }

    async fn after_resolution(&mut self, resolution: &TurnResolution) {
        self.publish(&resolution.events);
        // Arming equipment keeps the turn and its running timer.
        if resolution.turn_consumed {
            self.schedule_turn();
        }
        self.settle_if_finished().await;
    }

    fn schedule_turn(&mut self) {
        let Stage::Battle(state) = &self.stage else {
            self.timer = None;
            return;
        };
        let config = &self.services.config;
        self.timer = state.current().map(|side| {
            if state.combatant(side).owner.is_scripted() {
                Timer::after(Deadline::AiTurn, config.turn_delay)
            } else {
                Timer::after(Deadline::Action, config.action_timeout)
            }
        });
    }

    async fn settle_if_finished(&mut self) {
        let Stage::Battle(state) = &mut self.stage else {
            return;
        };
        if !state.is_terminal() {
            return;
        }
        self.timer = None;
        if let Some(outcome) = DuelEngine::new(state).take_outcome() {
            self.services.settle(outcome).await;
        }
    }

    // ===== views & events =====

    fn view(&self) -> DuelView {
        match &self.stage {
            Stage::Lobby(lobby) => DuelView::Lobby(lobby.status()),
            Stage::Battle(state) => DuelView::Battle(Box::new(state.clone())),
            Stage::Cancelled => DuelView::Cancelled,
        }
    }

    fn publish(&self, events: &[BattleEvent]) {
        for event in events {
            self.services.event_bus.publish(Event::Duel(SessionEvent {
                session: self.session,
                event: event.clone(),
            }));
        }
    }

    fn publish_lifecycle(&self, event: LifecycleEvent) {
        self.services.event_bus.publish(Event::Lifecycle(event));
    }
}
