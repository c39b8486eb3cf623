//! `arena` subcommands.
mod duel;
mod raid;

pub use duel::{DuelCommand, run_duel};
pub use raid::{RaidCommand, run_raid};

use anyhow::{Context, Result, bail};
use tokio::sync::broadcast::{self, error::RecvError};

use battle_content::ContentFactory;
use battle_core::{BattleEvent, CharacterBuild, SessionId, SessionOutcome};
use battle_runtime::{Arena, Event, InMemoryDirectory};

use crate::config::ClientConfig;
use crate::report::Reporter;

/// Level, stat roll, and tier moves shared by every simulated character.
#[derive(clap::Args, Clone, Debug)]
pub struct BuildArgs {
    /// Character level
    #[arg(long, default_value_t = 10)]
    pub level: u32,

    /// Stat roll percentage (0-100)
    #[arg(long, default_value_t = 80.0)]
    pub stat: f64,

    /// The two tier moves, comma separated
    #[arg(long, value_delimiter = ',', default_value = "slash,mend")]
    pub moves: Vec<String>,
}

impl BuildArgs {
    pub fn build(&self, character: &str) -> Result<CharacterBuild> {
        let [first, second] = self.moves.as_slice() else {
            bail!("expected exactly two tier moves, got {}", self.moves.len());
        };
        Ok(CharacterBuild::new(
            character,
            self.level,
            self.stat,
            [first.clone().into(), second.clone().into()],
        ))
    }
}

/// Builds an arena over the configured content.
pub fn load_arena(config: &ClientConfig, directory: InMemoryDirectory) -> Result<Arena> {
    let factory = match &config.data_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    };
    let catalog = factory
        .load_catalog()
        .with_context(|| format!("loading catalog from {}", factory.data_dir().display()))?;
    let battle_config = factory
        .load_config()
        .with_context(|| format!("loading battle config from {}", factory.data_dir().display()))?;

    let arena = Arena::builder()
        .config(config.runtime.clone())
        .catalog(catalog)
        .battle_config(battle_config)
        .directory(directory)
        .build()?;
    Ok(arena)
}

/// Reports events of `session` from `rx` until its outcome arrives.
async fn follow<W: std::io::Write>(
    rx: &mut broadcast::Receiver<Event>,
    session: SessionId,
    reporter: &mut Reporter<W>,
) -> Result<SessionOutcome> {
    loop {
        match rx.recv().await {
            Ok(event) => {
                if let Some(outcome) = report_event(&event, session, reporter)? {
                    return Ok(outcome);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(%session, skipped, "event stream lagged");
            }
            Err(RecvError::Closed) => bail!("event stream closed before {session} ended"),
        }
    }
}

/// Reports `event` if it belongs to `session`, returning the outcome once
/// the session ends.
fn report_event<W: std::io::Write>(
    event: &Event,
    session: SessionId,
    reporter: &mut Reporter<W>,
) -> Result<Option<SessionOutcome>> {
    if event.session() != session {
        return Ok(None);
    }
    reporter.event(event)?;
    match event {
        Event::Duel(inner) | Event::Raid(inner) => match &inner.event {
            BattleEvent::SessionEnded(outcome) => Ok(Some(outcome.clone())),
            _ => Ok(None),
        },
        Event::Lifecycle(_) => Ok(None),
    }
}
