//! Simulated raid: account raiders on autopilot against a boss.
use std::io::Write;

use anyhow::{Result, bail};
use tokio::sync::broadcast::error::TryRecvError;

use battle_core::env::compute_seed;
use battle_core::{AccountId, BattleAction, CharacterBuild, RaidError, SessionOutcome, ai};
use battle_runtime::{AccountRecord, Arena, InMemoryDirectory, RuntimeError, Topic};

use super::{BuildArgs, follow, load_arena, report_event};
use crate::config::ClientConfig;
use crate::report::Reporter;

/// Stream salt for the raiders' autopilot decisions.
const AUTOPILOT_STREAM: u64 = 0xC1;

/// Send a party of AI-piloted raiders against a boss
#[derive(clap::Args, Clone, Debug)]
pub struct RaidCommand {
    /// Boss character template
    #[arg(value_name = "BOSS")]
    pub boss: String,

    /// Raider character templates, one account each
    #[arg(value_name = "RAIDER", required = true)]
    pub raiders: Vec<String>,

    /// Boss level
    #[arg(long, default_value_t = 10)]
    pub boss_level: u32,

    /// Give up after this many raider turns
    #[arg(long, default_value_t = 500)]
    pub max_turns: u32,

    #[command(flatten)]
    pub build: BuildArgs,
}

impl RaidCommand {
    pub async fn execute<W: Write>(
        self,
        config: &mut ClientConfig,
        reporter: &mut Reporter<W>,
    ) -> Result<SessionOutcome> {
        let boss = BuildArgs {
            level: self.boss_level,
            ..self.build.clone()
        }
        .build(&self.boss)?;

        let mut directory = InMemoryDirectory::new();
        let mut party = Vec::with_capacity(self.raiders.len());
        for (n, character) in self.raiders.iter().enumerate() {
            let account = AccountId(n as u64 + 1);
            let build = self.build.build(character)?;
            directory = directory.with_account(account, AccountRecord::default().with_character(build));
            party.push((account, character.clone()));
        }

        let seed = config.resolve_seed();
        let arena = load_arena(config, directory)?;
        let outcome = run_raid(&arena, &boss, &party, seed, self.max_turns, reporter).await?;
        reporter.outcome(&outcome)?;
        Ok(outcome)
    }
}

/// Opens a raid, joins `party`, and plays each raider's turn with the AI
/// until the raid ends.
pub async fn run_raid<W: Write>(
    arena: &Arena,
    boss: &CharacterBuild,
    party: &[(AccountId, String)],
    seed: u64,
    max_turns: u32,
    reporter: &mut Reporter<W>,
) -> Result<SessionOutcome> {
    let mut rx = arena.subscribe(Topic::Raid);
    let raid = arena.open_raid(boss).await?;
    let session = raid.session();
    for (account, character) in party {
        raid.join(*account, character.as_str()).await?;
    }

    let oracles = arena.oracles().clone();
    let env = oracles.env();
    let autopilot_seed = compute_seed(seed, AUTOPILOT_STREAM);
    let mut rolls = 0;

    for _ in 0..max_turns {
        loop {
            match rx.try_recv() {
                Ok(event) => {
                    if let Some(outcome) = report_event(&event, session, reporter)? {
                        return Ok(outcome);
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(%session, skipped, "event stream lagged");
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Closed) => bail!("event stream closed before {session} ended"),
            }
        }

        let state = raid.state().await?;
        let Some(account) = state.current() else {
            break;
        };
        let Some(raider) = state.raider(account) else {
            break;
        };
        let action = {
            let mut dice = env.dice(autopilot_seed, rolls);
            let action = ai::choose_action(&env, &mut dice, &raider.combatant, &state.boss);
            rolls = dice.nonce();
            action
        };

        match raid.submit(account, action.clone()).await {
            Ok(_) => {}
            // Expired between turns; the next sweep settles it.
            Err(RuntimeError::Raid(RaidError::Ended)) => return follow(&mut rx, session, reporter).await,
            Err(err) => {
                tracing::warn!(%session, %account, ?action, error = %err, "autopilot action rejected, passing");
                raid.submit(account, BattleAction::Pass).await?;
            }
        }
    }

    if raid.state().await?.is_terminal() {
        return follow(&mut rx, session, reporter).await;
    }
    bail!("{session} still running after {max_turns} raider turns")
}
