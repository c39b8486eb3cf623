//! `arena`: run simulated duels and raids from the terminal.
//!
//! ```bash
//! arena duel pyra frost --seed 7
//! arena raid colossus aegis seraph volt --format json
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use battle_client::{ClientConfig, DuelCommand, OutputFormat, RaidCommand, Reporter, logging};

/// Run simulated duels and raids
#[derive(Parser)]
#[command(name = "arena")]
#[command(about = "Turn-based battle simulator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Base seed for every session (random when unset)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Directory holding catalog.ron and battle.toml
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "summary")]
    format: OutputFormat,

    /// Pause before an AI duel side acts
    #[arg(long, global = true, value_name = "MS")]
    turn_delay_ms: Option<u64>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Pit two AI-controlled characters against each other
    Duel(DuelCommand),

    /// Send a party of AI-piloted raiders against a boss
    Raid(RaidCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for ARENA_* settings)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let mut config = ClientConfig::from_env();
    if let Some(seed) = cli.seed {
        config.runtime.seed = Some(seed);
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(ms) = cli.turn_delay_ms {
        config.runtime.turn_delay = Duration::from_millis(ms);
    }
    let seed = config.resolve_seed();
    tracing::info!(seed, "arena starting");

    let mut reporter = Reporter::stdout(cli.format);
    let outcome = match cli.command {
        Command::Duel(cmd) => cmd.execute(&config, &mut reporter).await?,
        Command::Raid(cmd) => cmd.execute(&mut config, &mut reporter).await?,
    };

    tracing::info!(session = %outcome.session, reason = %outcome.reason, "arena finished");
    Ok(())
}
