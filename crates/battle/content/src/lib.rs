//! Data-driven battle content.
//!
//! Loads the move/character/equipment/item catalog from RON and the
//! [`BattleConfig`](battle_core::BattleConfig) tuning from TOML. Content is
//! immutable once loaded and is handed to the engines through
//! [`battle_core::CatalogOracle`].

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ConfigLoader, ContentFactory, LoadResult};

use std::path::PathBuf;

/// Directory holding the data files shipped with this crate.
pub fn bundled_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}
