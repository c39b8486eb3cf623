//! Move definitions and the stat-banded tier move pool.

use super::{Dice, MoveId};
use crate::state::{BuffStat, StatusKind};

/// Static definition of a move.
///
/// `power > 0` deals damage, `power < 0` heals the user, `power == 0` is a
/// support move whose only effect is [`MoveDefinition::effect`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveDefinition {
    pub id: MoveId,
    pub name: String,
    pub power: i32,
    /// Explicit energy cost; `None` falls back to the special/tier default.
    #[cfg_attr(feature = "serde", serde(default))]
    pub energy_cost: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: Option<MoveEffect>,
}

impl MoveDefinition {
    pub fn new(id: impl Into<MoveId>, name: impl Into<String>, power: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            power,
            energy_cost: None,
            effect: None,
        }
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.energy_cost = Some(cost);
        self
    }

    pub fn with_effect(mut self, effect: MoveEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn kind(&self) -> MoveKind {
        match self.power {
            p if p > 0 => MoveKind::Damage,
            p if p < 0 => MoveKind::Heal,
            _ => MoveKind::Support,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveKind {
    Damage,
    Heal,
    Support,
}

/// Secondary effect carried by a move.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveEffect {
    /// Buff the user.
    SelfBuff {
        stat: BuffStat,
        multiplier: f64,
        /// Ends of the user's turns the buff survives, counting the turn
        /// that applies it. `2` covers the user's next action.
        turns: u32,
    },
    /// Afflict the target with `chance` probability.
    Inflict {
        kind: StatusKind,
        turns: u32,
        chance: f64,
    },
    /// Add to the user's shield pool.
    Shield { amount: u32 },
    /// Remove every status effect from the user.
    Cleanse,
}

/// Tier moves grouped by the stat band they are drawn from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovePool {
    /// ST below 40.
    pub low: Vec<MoveId>,
    /// ST from 40 up to 75.
    pub mid: Vec<MoveId>,
    /// ST 75 and above.
    pub high: Vec<MoveId>,
}

impl MovePool {
    pub const MID_BAND_START: f64 = 40.0;
    pub const HIGH_BAND_START: f64 = 75.0;

    pub fn band(&self, stat_percent: f64) -> &[MoveId] {
        if stat_percent >= Self::HIGH_BAND_START {
            &self.high
        } else if stat_percent >= Self::MID_BAND_START {
            &self.mid
        } else {
            &self.low
        }
    }

    /// Draws two distinct tier moves for a new character instance.
    ///
    /// Returns `None` when the band holds fewer than two moves.
    pub fn draw_tier_moves(&self, stat_percent: f64, dice: &mut Dice<'_>) -> Option<[MoveId; 2]> {
        let band = self.band(stat_percent);
        if band.len() < 2 {
            return None;
        }
        let first = dice.index(band.len());
        let mut second = dice.index(band.len() - 1);
        if second >= first {
            second += 1;
        }
        Some([band[first].clone(), band[second].clone()])
    }
}
