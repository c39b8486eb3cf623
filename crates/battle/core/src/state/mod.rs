//! Mutable battle state.
//!
//! [`Combatant`] is one side's actor; [`DuelState`] owns two of them plus
//! the turn pointer. Raid state lives in [`crate::raid`] because its queue
//! and eviction rules are raid-specific. Every HP and energy write goes
//! through clamping mutators on [`Combatant`].
mod ability;
mod buffs;
mod combatant;
mod duel;
mod equipment;
mod ids;
mod status;

pub use ability::AbilityState;
pub use buffs::{Buff, BuffStat, Buffs};
pub use combatant::{Combatant, Inventory, Moveset, Owner, Tally};
pub use duel::{DuelPhase, DuelState, Side};
pub use equipment::{Activation, EquippedItem, Loadout, Triggered};
pub use ids::{AccountId, SessionId, Timestamp};
pub use status::{StatusEffect, StatusEffects, StatusKind, StatusTick};
