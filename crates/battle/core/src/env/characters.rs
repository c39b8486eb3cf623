//! Character templates and per-player character builds.

use super::{AbilityDescriptor, CharacterId, EquipmentId, MoveId};
use crate::config::BattleConfig;

/// Immutable, identity-fixed character data shared by every owner.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterTemplate {
    pub id: CharacterId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub icon: String,
    pub base_hp: u32,
    pub special_move: MoveId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ability: Option<AbilityDescriptor>,
}

/// One owned character instance: the template plus everything rolled or
/// chosen for it outside of battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterBuild {
    pub template: CharacterId,
    pub level: u32,
    /// ST, continuous in `0.0..=100.0`.
    pub stat_percent: f64,
    pub tier_moves: [MoveId; 2],
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: [Option<EquipmentId>; BattleConfig::EQUIPMENT_SLOTS],
}

impl CharacterBuild {
    pub fn new(
        template: impl Into<CharacterId>,
        level: u32,
        stat_percent: f64,
        tier_moves: [MoveId; 2],
    ) -> Self {
        Self {
            template: template.into(),
            level: level.max(1),
            stat_percent: stat_percent.clamp(0.0, 100.0),
            tier_moves,
            equipment: Default::default(),
        }
    }

    /// Places equipment into the given slot, replacing whatever was there.
    pub fn with_equipment(mut self, slot: usize, id: impl Into<EquipmentId>) -> Self {
        if let Some(entry) = self.equipment.get_mut(slot) {
            *entry = Some(id.into());
        }
        self
    }
}
