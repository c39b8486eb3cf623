//! Read-only environment consumed by the engines.
//!
//! Everything here is immutable during a battle: the content catalog, the
//! tuning config, and the RNG oracle. Sessions borrow a [`BattleEnv`] per
//! call instead of owning these.
mod abilities;
mod catalog;
mod characters;
mod equipment;
mod ids;
mod items;
mod moves;
mod rng;

pub use abilities::AbilityDescriptor;
pub use catalog::{Catalog, CatalogData, CatalogError, CatalogOracle};
pub use characters::{CharacterBuild, CharacterTemplate};
pub use equipment::{EquipmentDescriptor, EquipmentEffect, Rarity};
pub use ids::{CharacterId, EquipmentId, ItemId, MoveId};
pub use items::{ItemDefinition, ItemEffect};
pub use moves::{MoveDefinition, MoveEffect, MoveKind, MovePool};
pub use rng::{Dice, PcgRng, RngOracle, SequenceRng, compute_seed};

use crate::config::BattleConfig;

/// Bundles the oracles a resolution step needs.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    catalog: &'a dyn CatalogOracle,
    rng: &'a dyn RngOracle,
    config: &'a BattleConfig,
}

impl<'a> BattleEnv<'a> {
    pub fn new(
        catalog: &'a dyn CatalogOracle,
        rng: &'a dyn RngOracle,
        config: &'a BattleConfig,
    ) -> Self {
        Self {
            catalog,
            rng,
            config,
        }
    }

    pub fn catalog(&self) -> &'a dyn CatalogOracle {
        self.catalog
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    pub fn config(&self) -> &'a BattleConfig {
        self.config
    }

    /// Opens a roller over a session's `(seed, rolls)` pair.
    pub fn dice(&self, seed: u64, rolls: u64) -> Dice<'a> {
        Dice::new(self.rng, seed, rolls)
    }
}

impl core::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
