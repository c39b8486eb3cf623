//! Stage 5: defender mitigations.

use crate::env::{Dice, EquipmentEffect};
use crate::events::{BattleEvent, CombatantRef};
use crate::state::{Activation, BuffStat, Combatant};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mitigation {
    pub damage: u32,
    pub blocked: u32,
    pub dodged: bool,
}

impl Mitigation {
    fn dodged() -> Self {
        Self {
            dodged: true,
            ..Self::default()
        }
    }
}

/// Order: flat reduction, defense buff, ability dodge, armed evasion,
/// first-hit reduction, block pool. A dodge stops the chain.
pub fn mitigate(
    dice: &mut Dice<'_>,
    defender: &mut Combatant,
    defender_ref: CombatantRef,
    incoming: u32,
    events: &mut Vec<BattleEvent>,
) -> Mitigation {
    let mut damage = incoming;

    let (flat_reduction, dodge_chance, first_hit_reduction) = defender
        .ability
        .as_ref()
        .map_or((0, 0.0, 0.0), |a| {
            (a.flat_damage_reduction, a.dodge_chance, a.first_hit_reduction)
        });

    damage = damage.saturating_sub(flat_reduction);

    let defense = defender.buffs.multiplier(BuffStat::Defense);
    if defense != 1.0 {
        damage = (damage as f64 / defense).round() as u32;
    }

    if dice.chance(dodge_chance) {
        return Mitigation::dodged();
    }

    let is_evasion = |e: &EquipmentEffect| matches!(e, EquipmentEffect::Evasion { .. });
    if let Some(fired) = defender.loadout.consume(Activation::Armed, is_evasion) {
        let chance = match fired.descriptor.effect {
            EquipmentEffect::Evasion { dodge_chance } => dodge_chance,
            _ => 0.0,
        };
        events.push(BattleEvent::EquipmentTriggered {
            actor: defender_ref,
            slot: fired.slot,
            equipment: fired.descriptor.id,
            amount: 0,
        });
        if dice.chance(chance) {
            return Mitigation::dodged();
        }
    }

    if !defender.ability_state.first_hit_spent {
        defender.ability_state.first_hit_spent = true;
        if first_hit_reduction > 0.0 {
            damage = (damage as f64 * (1.0 - first_hit_reduction.min(1.0))).round() as u32;
        }
    }

    let blocked = damage.min(defender.ability_state.damage_block_remaining);
    defender.ability_state.damage_block_remaining -= blocked;
    damage -= blocked;

    Mitigation {
        damage,
        blocked,
        dodged: false,
    }
}
