//! Player-selectable actions.

use crate::env::ItemId;

/// One action submitted by the side whose turn it is.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value", rename_all = "snake_case"))]
pub enum BattleAction {
    /// Attack (or heal/support) with the move at this moveset index.
    Move(usize),
    Pass,
    /// Duel only; the other side wins.
    Flee,
    UseItem(ItemId),
    /// Arm the equipment in this slot. Does not consume the turn.
    ActivateEquipment(usize),
}

impl BattleAction {
    pub const fn consumes_turn(&self) -> bool {
        !matches!(self, BattleAction::ActivateEquipment(_))
    }
}
