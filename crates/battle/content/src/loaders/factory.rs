//! Content factory for loading everything a battle needs from one directory.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, Catalog};

use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult};

/// Loads battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml
/// └── catalog.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CATALOG_FILE: &'static str = "catalog.ron";
    pub const CONFIG_FILE: &'static str = "battle.toml";

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data files bundled with this crate.
    pub fn bundled() -> Self {
        Self::new(crate::bundled_data_dir())
    }

    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        CatalogLoader::load(&self.data_dir.join(Self::CATALOG_FILE))
    }

    /// Load `battle.toml`, or the default config when the file is absent.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            tracing::info!(path = %path.display(), "no battle config, using defaults");
            return Ok(BattleConfig::default());
        }
        ConfigLoader::load(&path)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
