//! Arena coordinator and builder.
//!
//! The [`Arena`] creates sessions, spawns one worker per session, and keeps
//! the [`SessionRegistry`] that prevents an account from being engaged in
//! two live sessions at once. Several arenas may coexist; each has its own
//! registry and event bus.
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};

use battle_core::env::compute_seed;
use battle_core::{
    AccountId, BattleConfig, Catalog, CharacterBuild, DuelLobby, Inventory, Owner, RaidEngine,
    SessionId, SetupError, Side, Timestamp,
};

use crate::api::{
    AccountDirectory, DuelHandle, InMemoryDirectory, LoggingSink, OutcomeSink, RaidHandle, Result,
    RuntimeError,
};
use crate::events::{Event, EventBus, Topic};
use crate::oracle::BattleOracles;
use crate::registry::{SessionHandle, SessionRegistry};
use crate::workers::{DuelWorker, RaidWorker, SessionServices};

/// Runtime tuning that is not part of the combat rules.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Pause before an AI-driven duel side acts.
    pub turn_delay: Duration,
    /// How long a human duel side may take before its turn resolves as a pass.
    pub action_timeout: Duration,
    /// How long a duel lobby waits for both sides to select.
    pub selection_timeout: Duration,
    /// How often raid workers apply expiry and inactivity.
    pub raid_sweep_interval: Duration,
    /// Base seed for session RNG streams; random when unset.
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 256,
            command_buffer_size: 32,
            turn_delay: Duration::from_millis(500),
            action_timeout: Duration::from_secs(60),
            selection_timeout: Duration::from_secs(120),
            raid_sweep_interval: Duration::from_secs(5),
            seed: None,
        }
    }
}

/// One side of a duel request.
#[derive(Clone, Debug, PartialEq)]
pub enum Contender {
    /// An account that selects its character in the lobby.
    Account(AccountId),
    /// An AI opponent with a fixed build, selected at creation.
    Ai(CharacterBuild),
}

impl Contender {
    fn owner(&self) -> Owner {
        match self {
            Contender::Account(account) => Owner::Account(*account),
            Contender::Ai(_) => Owner::Ai,
        }
    }
}

#[derive(Clone)]
pub struct Arena {
    services: SessionServices,
    seed: u64,
    next_session: Arc<AtomicU64>,
}

impl Arena {
    pub fn builder() -> ArenaBuilder {
        ArenaBuilder::new()
    }

    pub fn oracles(&self) -> &BattleOracles {
        &self.services.oracles
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.services.registry
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.services.event_bus.subscribe(topic)
    }

    /// Opens a duel lobby between two contenders.
    ///
    /// AI contenders select immediately; account contenders select through
    /// [`DuelHandle::select_character`]. Fails if either account is already
    /// engaged in a live session.
    pub async fn start_duel(&self, a: Contender, b: Contender) -> Result<DuelHandle> {
        let session = self.allocate_session();
        let seed = compute_seed(self.seed, session.0);
        let accounts: Vec<AccountId> = [&a, &b]
            .into_iter()
            .filter_map(|contender| contender.owner().account())
            .collect();
        self.services.registry.claim_all(&accounts, session).await?;

        let mut lobby = DuelLobby::new(session, seed, [a.owner(), b.owner()]);
        if let Err(err) = self.select_ai_sides(&mut lobby, [&a, &b]) {
            self.services.registry.close(session).await;
            return Err(err.into());
        }

        let (command_tx, command_rx) = mpsc::channel(self.services.config.command_buffer_size.max(1));
        let handle = DuelHandle::new(session, command_tx, self.services.event_bus.clone());
        self.services
            .registry
            .register(session, SessionHandle::Duel(handle.clone()))
            .await;

        let worker = DuelWorker::new(lobby, seed, self.services.clone(), command_rx);
        tokio::spawn(async move {
            worker.run().await;
        });

        tracing::info!(%session, ?accounts, "duel lobby opened");
        Ok(handle)
    }

    /// Opens a raid around a boss built from `boss`. The raid clock starts
    /// now.
    pub async fn open_raid(&self, boss: &CharacterBuild) -> Result<RaidHandle> {
        let session = self.allocate_session();
        let seed = compute_seed(self.seed, session.0);
        let state = RaidEngine::open(
            &self.services.oracles.env(),
            session,
            seed,
            boss,
            Timestamp::ZERO,
        )?;

        let (command_tx, command_rx) = mpsc::channel(self.services.config.command_buffer_size.max(1));
        let handle = RaidHandle::new(session, command_tx, self.services.event_bus.clone());
        self.services
            .registry
            .register(session, SessionHandle::Raid(handle.clone()))
            .await;

        let worker = RaidWorker::new(state, self.services.clone(), command_rx);
        tokio::spawn(async move {
            worker.run().await;
        });

        Ok(handle)
    }

    pub async fn duel(&self, session: SessionId) -> Option<DuelHandle> {
        self.services.registry.duel(session).await
    }

    pub async fn raid(&self, session: SessionId) -> Option<RaidHandle> {
        self.services.registry.raid(session).await
    }

    pub async fn session_of(&self, account: AccountId) -> Option<SessionId> {
        self.services.registry.session_of(account).await
    }

    pub async fn live_sessions(&self) -> Vec<SessionId> {
        self.services.registry.live_sessions().await
    }

    fn allocate_session(&self) -> SessionId {
        SessionId(self.next_session.fetch_add(1, Ordering::Relaxed))
    }

    fn select_ai_sides(
        &self,
        lobby: &mut DuelLobby,
        contenders: [&Contender; 2],
    ) -> std::result::Result<(), SetupError> {
        let env = self.services.oracles.env();
        for (side, contender) in Side::BOTH.into_iter().zip(contenders) {
            if let Contender::Ai(build) = contender {
                lobby.select(&env, side, build, Inventory::default())?;
            }
        }
        Ok(())
    }
}

/// Builder for [`Arena`]
pub struct ArenaBuilder {
    config: RuntimeConfig,
    catalog: Option<Catalog>,
    battle_config: BattleConfig,
    directory: Option<Arc<dyn AccountDirectory>>,
    sink: Option<Arc<dyn OutcomeSink>>,
}

impl ArenaBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            catalog: None,
            battle_config: BattleConfig::default(),
            directory: None,
            sink: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the content catalog (required)
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Override the combat tuning
    pub fn battle_config(mut self, config: BattleConfig) -> Self {
        self.battle_config = config;
        self
    }

    /// Set the account directory (defaults to an empty in-memory directory)
    pub fn directory(mut self, directory: impl AccountDirectory + 'static) -> Self {
        self.directory = Some(Arc::new(directory));
        self
    }

    /// Set the outcome sink (defaults to [`LoggingSink`])
    pub fn outcome_sink(mut self, sink: impl OutcomeSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    pub fn build(self) -> Result<Arena> {
        let catalog = self.catalog.ok_or(RuntimeError::MissingCatalog)?;
        let seed = self.config.seed.unwrap_or_else(rand::random);

        let services = SessionServices {
            oracles: BattleOracles::new(catalog, self.battle_config),
            directory: self
                .directory
                .unwrap_or_else(|| Arc::new(InMemoryDirectory::new())),
            sink: self.sink.unwrap_or_else(|| Arc::new(LoggingSink)),
            registry: SessionRegistry::new(),
            event_bus: EventBus::with_capacity(self.config.event_buffer_size),
            config: self.config,
        };

        Ok(Arena {
            services,
            seed,
            next_session: Arc::new(AtomicU64::new(1)),
        })
    }
}
