//! Status effect registry.
//!
//! Each combatant carries at most one instance per [`StatusKind`]. Effects
//! are processed once, at the start of the afflicted side's turn: every
//! damage/heal tick is summed into a [`StatusTick`] that the engine applies
//! atomically, then effects whose `remaining_turns` reached zero are removed.
//!
//! # Re-application
//!
//! Applying a kind that is already present extends `remaining_turns` to
//! `max(existing, new)` and increments `stacks`. The latest applier becomes
//! the effect's source.

use arrayvec::ArrayVec;

use crate::config::{BattleConfig, StatusConfig};
use crate::events::CombatantRef;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub remaining_turns: u32,
    pub stacks: u32,
    /// Ticks already dealt; drives poison escalation.
    pub ticks_dealt: u32,
    /// Combatant credited with the damage this effect deals.
    pub source: CombatantRef,
}

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
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusKind {
    // Damage over time
    Burn,
    Poison,
    // Heal over time
    Regen,
    // Skip turn
    Freeze,
    Paralyze,
    Stun,
}

impl StatusKind {
    pub const fn is_damage_over_time(&self) -> bool {
        matches!(self, Self::Burn | Self::Poison)
    }

    pub const fn is_heal_over_time(&self) -> bool {
        matches!(self, Self::Regen)
    }

    pub const fn skips_turn(&self) -> bool {
        matches!(self, Self::Freeze | Self::Paralyze | Self::Stun)
    }

    /// Duration used when an effect is inflicted without an explicit one.
    pub fn default_turns(&self, config: &StatusConfig) -> u32 {
        match self {
            Self::Burn => config.burn_turns,
            Self::Poison => config.poison_turns,
            Self::Regen => config.regen_turns,
            Self::Freeze | Self::Paralyze | Self::Stun => config.skip_turns,
        }
    }
}

/// Summed result of one start-of-turn status pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusTick {
    pub damage: u32,
    pub heal: u32,
    /// Kinds that wore off during this pass, in list order.
    pub expired: Vec<StatusKind>,
    /// First skip-turn effect that was active when the pass began.
    pub skip: Option<StatusKind>,
    /// Damage per damage-over-time effect, with its source, in list order.
    pub sources: Vec<(CombatantRef, u32)>,
}

impl StatusTick {
    pub fn is_empty(&self) -> bool {
        self.damage == 0 && self.heal == 0 && self.expired.is_empty() && self.skip.is_none()
    }
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Applies or refreshes an effect and returns the resulting instance.
    ///
    /// Zero-turn applications are ignored.
    pub fn apply(
        &mut self,
        kind: StatusKind,
        turns: u32,
        source: CombatantRef,
    ) -> Option<StatusEffect> {
        if turns == 0 {
            return None;
        }

        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.remaining_turns = existing.remaining_turns.max(turns);
            existing.stacks = existing.stacks.saturating_add(1);
            existing.source = source;
            return Some(*existing);
        }

        let effect = StatusEffect {
            kind,
            remaining_turns: turns,
            stacks: 1,
            ticks_dealt: 0,
            source,
        };
        // Capacity equals the number of kinds, so a new kind always fits.
        self.effects.try_push(effect).ok()?;
        Some(effect)
    }

    /// Removes every effect and returns the removed kinds.
    pub fn clear(&mut self) -> Vec<StatusKind> {
        self.effects.drain(..).map(|e| e.kind).collect()
    }

    /// Runs one start-of-turn pass for a holder with `max_hp`.
    pub fn tick(&mut self, max_hp: u32, config: &StatusConfig) -> StatusTick {
        let mut tick = StatusTick {
            skip: self
                .effects
                .iter()
                .find(|e| e.kind.skips_turn())
                .map(|e| e.kind),
            ..StatusTick::default()
        };

        for effect in self.effects.iter_mut() {
            let amount = match effect.kind {
                StatusKind::Burn => fraction_of(max_hp, config.burn_fraction),
                StatusKind::Poison => {
                    let fraction = config.poison_base_fraction
                        + config.poison_increment_fraction * effect.ticks_dealt as f64;
                    fraction_of(max_hp, fraction)
                }
                StatusKind::Regen => fraction_of(max_hp, config.regen_fraction),
                StatusKind::Freeze | StatusKind::Paralyze | StatusKind::Stun => 0,
            };
            if effect.kind.is_damage_over_time() {
                tick.damage += amount;
                tick.sources.push((effect.source, amount));
            } else if effect.kind.is_heal_over_time() {
                tick.heal += amount;
            }
            effect.ticks_dealt += 1;
            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
        }

        tick.expired = self
            .effects
            .iter()
            .filter(|e| e.remaining_turns == 0)
            .map(|e| e.kind)
            .collect();
        self.effects.retain(|e| e.remaining_turns > 0);

        tick
    }
}

fn fraction_of(max_hp: u32, fraction: f64) -> u32 {
    if fraction <= 0.0 {
        return 0;
    }
    ((max_hp as f64 * fraction).round() as u32).max(1)
}
