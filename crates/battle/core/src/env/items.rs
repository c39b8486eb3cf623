//! Inventory item definitions usable mid-battle.

use super::ItemId;
use crate::state::BuffStat;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    pub effect: ItemEffect,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemEffect {
    Heal { amount: u32 },
    Energy { amount: u32 },
    Buff {
        stat: BuffStat,
        multiplier: f64,
        /// Counted like [`MoveEffect::SelfBuff`](crate::env::MoveEffect)
        /// turns: the turn the item is used in is the first.
        turns: u32,
    },
    /// Remove every status effect from the user.
    Cleanse,
}
