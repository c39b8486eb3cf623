//! Simulated AI-versus-AI duel.
use std::io::Write;

use anyhow::Result;

use battle_core::{CharacterBuild, SessionOutcome};
use battle_runtime::{Arena, Contender, InMemoryDirectory, Topic};

use super::{BuildArgs, follow, load_arena};
use crate::config::ClientConfig;
use crate::report::Reporter;

/// Pit two AI-controlled characters against each other
#[derive(clap::Args, Clone, Debug)]
pub struct DuelCommand {
    /// Character template for side A
    #[arg(value_name = "A")]
    pub a: String,

    /// Character template for side B
    #[arg(value_name = "B")]
    pub b: String,

    #[command(flatten)]
    pub build: BuildArgs,
}

impl DuelCommand {
    pub async fn execute<W: Write>(
        self,
        config: &ClientConfig,
        reporter: &mut Reporter<W>,
    ) -> Result<SessionOutcome> {
        let a = self.build.build(&self.a)?;
        let b = self.build.build(&self.b)?;
        let arena = load_arena(config, InMemoryDirectory::new())?;

        let outcome = run_duel(&arena, a, b, reporter).await?;
        reporter.outcome(&outcome)?;
        Ok(outcome)
    }
}

/// Plays a duel between two AI builds to the end.
pub async fn run_duel<W: Write>(
    arena: &Arena,
    a: CharacterBuild,
    b: CharacterBuild,
    reporter: &mut Reporter<W>,
) -> Result<SessionOutcome> {
    let mut rx = arena.subscribe(Topic::Duel);
    let duel = arena
        .start_duel(Contender::Ai(a), Contender::Ai(b))
        .await?;
    tracing::info!(session = %duel.session(), "duel started");

    follow(&mut rx, duel.session(), reporter).await
}
