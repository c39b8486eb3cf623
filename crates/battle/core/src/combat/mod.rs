//! Formula library.
//!
//! Pure functions mapping (move, level, ST) to magnitudes, costs and
//! critical rolls. Nothing here touches session state; randomness is drawn
//! only through the [`Dice`](crate::env::Dice) handed in by the caller.
//!
//! # Core Functions
//!
//! - `damage`: signed magnitude of a move (negative for heals)
//! - `energy_cost`: declared or default cost before ability reductions
//! - `critical_roll`: one Bernoulli trial scaling the base damage
//! - `max_hp`: derived HP pool of a character build

pub mod crit;
pub mod damage;

pub use crit::{CritRoll, critical_roll};
pub use damage::{
    calculate_damage, damage, energy_cost, level_multiplier, max_hp, stat_multiplier,
};
