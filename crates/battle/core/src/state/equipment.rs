//! Per-battle equipment slots and activation tracking.

use crate::config::BattleConfig;
use crate::engine::ActionError;
use crate::env::{EquipmentDescriptor, EquipmentEffect};

/// Lifecycle of one equipped item within a battle.
///
/// Armable effects go `Available → Armed → Used`; once-per-battle passives go
/// `Available → Used`; persistent passives stay `Available`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Activation {
    #[default]
    Available,
    Armed,
    Used,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquippedItem {
    pub descriptor: EquipmentDescriptor,
    pub activation: Activation,
}

/// A fired equipment hook: the slot it came from and the effect it carried.
#[derive(Clone, Debug, PartialEq)]
pub struct Triggered {
    pub slot: usize,
    pub descriptor: EquipmentDescriptor,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Loadout {
    slots: [Option<EquippedItem>; BattleConfig::EQUIPMENT_SLOTS],
}

impl Loadout {
    pub fn new(slots: [Option<EquipmentDescriptor>; BattleConfig::EQUIPMENT_SLOTS]) -> Self {
        Self {
            slots: slots.map(|slot| {
                slot.map(|descriptor| EquippedItem {
                    descriptor,
                    activation: Activation::Available,
                })
            }),
        }
    }

    pub fn slot(&self, index: usize) -> Option<&EquippedItem> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &EquippedItem)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|item| (index, item)))
    }

    /// Arms the item in `index`. Does not consume a turn.
    pub fn arm(&mut self, index: usize) -> Result<&EquipmentDescriptor, ActionError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(ActionError::InvalidSlot(index))?;
        let item = slot.as_mut().ok_or(ActionError::EmptySlot(index))?;
        if !item.descriptor.effect.is_armable() {
            return Err(ActionError::NotArmable(index));
        }
        match item.activation {
            Activation::Available => {
                item.activation = Activation::Armed;
                Ok(&item.descriptor)
            }
            Activation::Armed => Err(ActionError::AlreadyArmed(index)),
            Activation::Used => Err(ActionError::AlreadyUsed(index)),
        }
    }

    /// Effect of a persistent passive matching `predicate`, if equipped.
    pub fn passive(&self, predicate: impl Fn(&EquipmentEffect) -> bool) -> Option<(usize, &EquipmentDescriptor)> {
        self.iter()
            .find(|(_, item)| item.activation == Activation::Available && predicate(&item.descriptor.effect))
            .map(|(index, item)| (index, &item.descriptor))
    }

    /// Fires the first item in `state` matching `predicate` and marks it used.
    pub fn consume(
        &mut self,
        state: Activation,
        predicate: impl Fn(&EquipmentEffect) -> bool,
    ) -> Option<Triggered> {
        let (slot, item) = self
            .slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_mut().map(|item| (index, item)))
            .find(|(_, item)| item.activation == state && predicate(&item.descriptor.effect))?;
        item.activation = Activation::Used;
        Some(Triggered {
            slot,
            descriptor: item.descriptor.clone(),
        })
    }
}
