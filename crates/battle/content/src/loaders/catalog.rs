//! Battle catalog loader.

use std::path::Path;

use battle_core::{Catalog, CatalogData};

use crate::loaders::{LoadResult, read_file};

/// Loader for the battle catalog from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Loads and cross-checks a catalog file.
    pub fn load(path: &Path) -> LoadResult<Catalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid catalog {}: {}", path.display(), e))
    }

    /// Parses catalog RON and validates its cross references.
    pub fn parse(content: &str) -> LoadResult<Catalog> {
        let data: CatalogData = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;
        let catalog = Catalog::from_data(data)?;
        tracing::debug!(
            moves = catalog.move_count(),
            characters = catalog.character_count(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}
