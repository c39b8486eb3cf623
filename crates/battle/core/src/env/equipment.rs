//! Equipment descriptors.
//!
//! Equipment occupies one of three rarity slots and carries exactly one
//! effect. Armable effects must be activated before they do anything; passive
//! effects fire on their own trigger.

use super::EquipmentId;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Rarity {
    Common,
    Rare,
    Legendary,
}

impl Rarity {
    /// Loadout slot index reserved for this rarity.
    pub const fn slot(&self) -> usize {
        match self {
            Rarity::Common => 0,
            Rarity::Rare => 1,
            Rarity::Legendary => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentDescriptor {
    pub id: EquipmentId,
    pub name: String,
    pub rarity: Rarity,
    pub effect: EquipmentEffect,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipmentEffect {
    /// Once per battle: heal the holder a fraction of damage they just dealt.
    MedDrop { heal_fraction: f64 },
    /// Drain energy from the target whenever the holder lands a hit.
    Siphon { energy: u32 },
    /// Armable: one extra dodge roll against the next incoming hit.
    Evasion { dodge_chance: f64 },
    /// Armable: reflect a fraction of the next incoming hit.
    Reflect { fraction: f64 },
    /// Once per battle: revive to full HP with `energy` the first time HP
    /// would reach zero.
    Phoenix { energy: u32 },
    /// Armable: refund a fraction of the next move's energy cost.
    Recycler { refund_fraction: f64 },
    /// Convert a fraction of healing done into energy.
    Converter { fraction: f64 },
}

impl EquipmentEffect {
    pub const fn is_armable(&self) -> bool {
        matches!(
            self,
            EquipmentEffect::Evasion { .. }
                | EquipmentEffect::Reflect { .. }
                | EquipmentEffect::Recycler { .. }
        )
    }

    pub const fn label(&self) -> &'static str {
        match self {
            EquipmentEffect::MedDrop { .. } => "med_drop",
            EquipmentEffect::Siphon { .. } => "siphon",
            EquipmentEffect::Evasion { .. } => "evasion",
            EquipmentEffect::Reflect { .. } => "reflect",
            EquipmentEffect::Phoenix { .. } => "phoenix",
            EquipmentEffect::Recycler { .. } => "recycler",
            EquipmentEffect::Converter { .. } => "converter",
        }
    }
}
