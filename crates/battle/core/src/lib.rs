//! Deterministic combat rules shared by duels and raids.
//!
//! `battle-core` defines the canonical combat model (combatants, sessions,
//! formulas, the modifier pipeline) and exposes synchronous APIs the runtime
//! drives. All session mutation flows through [`engine::DuelEngine`] and
//! [`raid::RaidEngine`]; randomness comes from an injected
//! [`env::RngOracle`] so every resolution is reproducible from a seed.
pub mod action;
pub mod ai;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod outcome;
pub mod pipeline;
pub mod raid;
pub mod state;

#[cfg(test)]
mod testing;

pub use action::BattleAction;
pub use config::BattleConfig;
pub use engine::{ActionError, DuelEngine, DuelLobby, LobbyStatus, SetupError, TurnResolution};
pub use env::{
    AbilityDescriptor, BattleEnv, Catalog, CatalogData, CatalogError, CatalogOracle,
    CharacterBuild, CharacterId, CharacterTemplate, Dice, EquipmentDescriptor, EquipmentEffect,
    EquipmentId, ItemDefinition, ItemEffect, ItemId, MoveDefinition, MoveEffect, MoveId, MovePool,
    PcgRng, Rarity, RngOracle, SequenceRng,
};
pub use error::{BattleError, ErrorSeverity};
pub use events::{ActionReport, BattleEvent, CombatantRef, EliminationReason, ResolvedAction};
pub use outcome::{
    DamageRank, EndReason, ItemConsumption, RewardGrant, SessionMode, SessionOutcome, Winner,
};
pub use raid::{RaidEngine, RaidError, RaidPhase, RaidState, Raider};
pub use state::{
    AbilityState, AccountId, Activation, Buff, BuffStat, Buffs, Combatant, DuelPhase, DuelState,
    Inventory, Loadout, Moveset, Owner, SessionId, Side, StatusEffect, StatusEffects, StatusKind,
    Timestamp,
};
