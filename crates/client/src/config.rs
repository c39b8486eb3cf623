//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use battle_runtime::RuntimeConfig;

/// Settings for one `arena` invocation.
///
/// Command-line flags take precedence over the environment.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub runtime: RuntimeConfig,
    /// Directory holding `catalog.ron` and `battle.toml`; the bundled data
    /// is used when unset.
    pub data_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_SEED` - Base seed for every session (default: random)
    /// - `ARENA_DATA_DIR` - Content directory (default: bundled data)
    /// - `ARENA_TURN_DELAY_MS` - Pause before an AI side acts (default: 500)
    /// - `ARENA_ACTION_TIMEOUT_SECS` - Human action timeout (default: 60)
    /// - `ARENA_SELECTION_TIMEOUT_SECS` - Lobby selection timeout (default: 120)
    /// - `ARENA_RAID_SWEEP_MS` - Raid expiry/inactivity sweep period (default: 5000)
    /// - `ARENA_EVENT_BUFFER` - Event bus capacity per topic (default: 256)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let runtime = &mut config.runtime;

        runtime.seed = read_env::<u64>("ARENA_SEED");
        if let Some(ms) = read_env::<u64>("ARENA_TURN_DELAY_MS") {
            runtime.turn_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = read_env::<u64>("ARENA_ACTION_TIMEOUT_SECS") {
            runtime.action_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = read_env::<u64>("ARENA_SELECTION_TIMEOUT_SECS") {
            runtime.selection_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(ms) = read_env::<u64>("ARENA_RAID_SWEEP_MS") {
            runtime.raid_sweep_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(capacity) = read_env::<usize>("ARENA_EVENT_BUFFER") {
            runtime.event_buffer_size = capacity.max(1);
        }

        config.data_dir = env::var("ARENA_DATA_DIR").ok().map(PathBuf::from);
        config
    }

    /// The base seed, drawing a random one on first use so the whole run
    /// shares it.
    pub fn resolve_seed(&mut self) -> u64 {
        *self.runtime.seed.get_or_insert_with(rand::random)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
