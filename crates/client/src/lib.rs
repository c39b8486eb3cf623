//! Command-line driver for the battle engine.
//!
//! ```text
//! arena duel <A> <B>          AI versus AI duel
//! arena raid <BOSS> <RAIDER>… raiders on autopilot against a boss
//! ```
//!
//! Both subcommands build an [`Arena`](battle_runtime::Arena) over the
//! bundled content (or `--data-dir`), stream session events to stdout, and
//! finish with the session outcome.
pub mod commands;
pub mod config;
pub mod logging;
pub mod report;

pub use commands::{BuildArgs, DuelCommand, RaidCommand, load_arena, run_duel, run_raid};
pub use config::ClientConfig;
pub use report::{OutputFormat, Reporter};
