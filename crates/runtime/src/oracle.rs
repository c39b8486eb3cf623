//! Shared, immutable battle content.
//!
//! Every session worker holds a clone of [`BattleOracles`] and builds a
//! [`BattleEnv`] snapshot from it per call. Catalog and config are never
//! mutated after load, so they are shared behind `Arc` without locks.
use std::sync::Arc;

use battle_core::{BattleConfig, BattleEnv, Catalog, PcgRng};

#[derive(Clone, Debug)]
pub struct BattleOracles {
    catalog: Arc<Catalog>,
    config: Arc<BattleConfig>,
    rng: PcgRng,
}

impl BattleOracles {
    pub fn new(catalog: Catalog, config: BattleConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            config: Arc::new(config),
            rng: PcgRng,
        }
    }

    pub fn env(&self) -> BattleEnv<'_> {
        BattleEnv::new(self.catalog.as_ref(), &self.rng, self.config.as_ref())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }
}
