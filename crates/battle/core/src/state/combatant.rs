//! In-battle actor state.

use std::collections::BTreeMap;

use super::{AbilityState, AccountId, Buffs, Loadout, StatusEffects};
use crate::combat;
use crate::engine::{ActionError, SetupError};
use crate::env::{
    AbilityDescriptor, BattleEnv, CatalogOracle, CharacterBuild, CharacterId, ItemId,
    MoveDefinition, MoveId,
};

/// Who drives a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Owner {
    Account(AccountId),
    Ai,
    Boss,
}

impl Owner {
    pub const fn account(&self) -> Option<AccountId> {
        match self {
            Owner::Account(id) => Some(*id),
            Owner::Ai | Owner::Boss => None,
        }
    }

    pub const fn is_scripted(&self) -> bool {
        !matches!(self, Owner::Account(_))
    }
}

/// The special move at index 0 followed by the two tier moves.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Moveset {
    pub special: MoveId,
    pub tier: [MoveId; 2],
}

impl Moveset {
    pub const SPECIAL_INDEX: usize = 0;

    pub fn get(&self, index: usize) -> Option<&MoveId> {
        match index {
            0 => Some(&self.special),
            1 | 2 => self.tier.get(index - 1),
            _ => None,
        }
    }

    pub const fn is_special(index: usize) -> bool {
        index == Self::SPECIAL_INDEX
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &MoveId)> {
        core::iter::once(&self.special).chain(&self.tier).enumerate()
    }
}

/// Snapshot of an account's consumables, taken at battle start.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Inventory {
    items: BTreeMap<ItemId, u32>,
}

impl Inventory {
    pub fn count(&self, id: &ItemId) -> u32 {
        self.items.get(id).copied().unwrap_or(0)
    }

    /// Removes one unit; `false` when none are left.
    pub fn take(&mut self, id: &ItemId) -> bool {
        match self.items.get_mut(id) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, u32)> {
        self.items.iter().map(|(id, count)| (id, *count))
    }

    pub fn is_empty(&self) -> bool {
        self.items.values().all(|count| *count == 0)
    }
}

impl FromIterator<(ItemId, u32)> for Inventory {
    fn from_iter<T: IntoIterator<Item = (ItemId, u32)>>(iter: T) -> Self {
        let mut items = BTreeMap::new();
        for (id, count) in iter {
            *items.entry(id).or_insert(0) += count;
        }
        Self { items }
    }
}

/// Running per-combatant totals used for ranking and the outcome manifest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tally {
    pub damage_dealt: u64,
    pub healing_done: u64,
    pub items_used: BTreeMap<ItemId, u32>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub owner: Owner,
    pub character: CharacterId,
    pub name: String,
    pub icon: String,
    pub level: u32,
    pub stat_percent: f64,
    max_hp: u32,
    hp: u32,
    max_energy: u32,
    energy: u32,
    pub moveset: Moveset,
    pub shield: u32,
    pub buffs: Buffs,
    pub ability: Option<AbilityDescriptor>,
    pub ability_state: AbilityState,
    pub loadout: Loadout,
    pub status: StatusEffects,
    pub inventory: Inventory,
    pub tally: Tally,
}

impl Combatant {
    /// Resolves a build against the catalog into a fresh combatant.
    pub fn from_build(
        env: &BattleEnv<'_>,
        owner: Owner,
        build: &CharacterBuild,
        inventory: Inventory,
    ) -> Result<Self, SetupError> {
        let catalog = env.catalog();
        let template = catalog
            .character(&build.template)
            .ok_or_else(|| SetupError::UnknownCharacter(build.template.clone()))?;

        for id in core::iter::once(&template.special_move).chain(&build.tier_moves) {
            if catalog.move_definition(id).is_none() {
                return Err(SetupError::UnknownMove(id.clone()));
            }
        }

        let mut slots: [Option<_>; crate::config::BattleConfig::EQUIPMENT_SLOTS] = Default::default();
        for (slot, id) in build.equipment.iter().enumerate() {
            let Some(id) = id else { continue };
            let descriptor = catalog
                .equipment(id)
                .ok_or_else(|| SetupError::UnknownEquipment(id.clone()))?;
            if descriptor.rarity.slot() != slot {
                return Err(SetupError::EquipmentSlotMismatch {
                    slot,
                    equipment: id.clone(),
                });
            }
            slots[slot] = Some(descriptor.clone());
        }

        let energy = &env.config().energy;
        let max_hp = combat::max_hp(template.base_hp, build.level, build.stat_percent);
        let ability = template.ability.clone();

        Ok(Self {
            owner,
            character: template.id.clone(),
            name: template.name.clone(),
            icon: template.icon.clone(),
            level: build.level.max(1),
            stat_percent: build.stat_percent.clamp(0.0, 100.0),
            max_hp,
            hp: max_hp,
            max_energy: energy.max,
            energy: energy.starting.min(energy.max),
            moveset: Moveset {
                special: template.special_move.clone(),
                tier: build.tier_moves.clone(),
            },
            shield: 0,
            buffs: Buffs::default(),
            ability_state: AbilityState::fresh(ability.as_ref()),
            ability,
            loadout: Loadout::new(slots),
            status: StatusEffects::empty(),
            inventory,
            tally: Tally::default(),
        })
    }

    /// Builds the raid boss: a regular build with its HP pool scaled up.
    pub fn boss(
        env: &BattleEnv<'_>,
        build: &CharacterBuild,
        hp_multiplier: f64,
    ) -> Result<Self, SetupError> {
        let mut boss = Self::from_build(env, Owner::Boss, build, Inventory::default())?;
        let scaled = (boss.max_hp as f64 * hp_multiplier.max(1.0)).round();
        boss.max_hp = scaled.clamp(1.0, u32::MAX as f64) as u32;
        boss.hp = boss.max_hp;
        Ok(boss)
    }

    // ===== vitals =====

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn max_energy(&self) -> u32 {
        self.max_energy
    }

    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f64 / self.max_hp as f64
        }
    }

    pub fn is_down(&self) -> bool {
        self.hp == 0
    }

    /// Removes up to `amount` HP and returns what was actually removed.
    pub fn lose_hp(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Restores up to `amount` HP and returns what was actually restored.
    pub fn restore_hp(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_hp - self.hp);
        self.hp += gained;
        gained
    }

    pub fn gain_energy(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_energy - self.energy);
        self.energy += gained;
        gained
    }

    pub fn drain_energy(&mut self, amount: u32) -> u32 {
        let drained = amount.min(self.energy);
        self.energy -= drained;
        drained
    }

    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp);
    }

    pub fn set_energy(&mut self, energy: u32) {
        self.energy = energy.min(self.max_energy);
    }

    pub fn knock_out(&mut self) {
        self.hp = 0;
    }

    /// Back to full HP with `energy`.
    pub fn revive(&mut self, energy: u32) {
        self.hp = self.max_hp;
        self.energy = energy.min(self.max_energy);
    }

    // ===== moves =====

    /// Looks up the move in `index` and whether it is the special.
    pub fn move_at<'c>(
        &self,
        index: usize,
        catalog: &'c dyn CatalogOracle,
    ) -> Result<(&'c MoveDefinition, bool), ActionError> {
        let id = self
            .moveset
            .get(index)
            .ok_or(ActionError::InvalidMove(index))?;
        let definition = catalog
            .move_definition(id)
            .ok_or_else(|| ActionError::UnknownMove(id.clone()))?;
        Ok((definition, Moveset::is_special(index)))
    }

    pub fn record_item_use(&mut self, id: &ItemId) {
        *self.tally.items_used.entry(id.clone()).or_insert(0) += 1;
    }
}
