//! Stage 8: equipment hooks.
//!
//! These run independently of ability hooks. Armed evasion lives in stage 5
//! and auto-revive in [`super::vitals`] because both must act mid-chain.

use crate::env::EquipmentEffect;
use crate::events::{ActionReport, BattleEvent, CombatantRef};
use crate::state::{Activation, Combatant};

use super::{Participants, vitals};

/// Hooks that fire after a hit landed for `landed` damage.
pub fn after_hit(
    p: &mut Participants<'_>,
    landed: u32,
    report: &mut ActionReport,
    events: &mut Vec<BattleEvent>,
) {
    if landed == 0 {
        return;
    }

    let is_med_drop = |e: &EquipmentEffect| matches!(e, EquipmentEffect::MedDrop { .. });
    if let Some(fired) = p.attacker.loadout.consume(Activation::Available, is_med_drop) {
        if let EquipmentEffect::MedDrop { heal_fraction } = fired.descriptor.effect {
            let healed = p
                .attacker
                .restore_hp((landed as f64 * heal_fraction).round() as u32);
            report.healed += healed;
            events.push(BattleEvent::EquipmentTriggered {
                actor: p.attacker_ref,
                slot: fired.slot,
                equipment: fired.descriptor.id,
                amount: healed,
            });
        }
    }

    let siphon = p
        .attacker
        .loadout
        .passive(|e| matches!(e, EquipmentEffect::Siphon { .. }))
        .map(|(slot, descriptor)| (slot, descriptor.clone()));
    if let Some((slot, descriptor)) = siphon {
        if let EquipmentEffect::Siphon { energy } = descriptor.effect {
            let drained = p.defender.drain_energy(energy);
            report.energy_drained += drained;
            report.energy_gained += p.attacker.gain_energy(drained);
            events.push(BattleEvent::EquipmentTriggered {
                actor: p.attacker_ref,
                slot,
                equipment: descriptor.id,
                amount: drained,
            });
        }
    }

    let is_reflect = |e: &EquipmentEffect| matches!(e, EquipmentEffect::Reflect { .. });
    if let Some(fired) = p.defender.loadout.consume(Activation::Armed, is_reflect) {
        if let EquipmentEffect::Reflect { fraction } = fired.descriptor.effect {
            let amount = (landed as f64 * fraction).round() as u32;
            let hit = vitals::strike(p.attacker, p.attacker_ref, amount, events);
            report.reflected = hit.absorbed + hit.hp_damage;
            p.defender.tally.damage_dealt += u64::from(report.reflected);
            events.push(BattleEvent::EquipmentTriggered {
                actor: p.defender_ref,
                slot: fired.slot,
                equipment: fired.descriptor.id,
                amount: report.reflected,
            });
        }
    }
}

/// Armed refund of part of the energy just spent.
pub fn refund(
    attacker: &mut Combatant,
    attacker_ref: CombatantRef,
    spent: u32,
    report: &mut ActionReport,
    events: &mut Vec<BattleEvent>,
) {
    let is_recycler = |e: &EquipmentEffect| matches!(e, EquipmentEffect::Recycler { .. });
    let Some(fired) = attacker.loadout.consume(Activation::Armed, is_recycler) else {
        return;
    };
    if let EquipmentEffect::Recycler { refund_fraction } = fired.descriptor.effect {
        let refunded = attacker.gain_energy((spent as f64 * refund_fraction).round() as u32);
        report.energy_refunded += refunded;
        events.push(BattleEvent::EquipmentTriggered {
            actor: attacker_ref,
            slot: fired.slot,
            equipment: fired.descriptor.id,
            amount: refunded,
        });
    }
}

/// Converts part of `healed` into energy for the holder.
pub fn convert_heal(
    holder: &mut Combatant,
    holder_ref: CombatantRef,
    healed: u32,
    report: &mut ActionReport,
    events: &mut Vec<BattleEvent>,
) {
    if healed == 0 {
        return;
    }
    let converter = holder
        .loadout
        .passive(|e| matches!(e, EquipmentEffect::Converter { .. }))
        .map(|(slot, descriptor)| (slot, descriptor.clone()));
    let Some((slot, descriptor)) = converter else {
        return;
    };
    if let EquipmentEffect::Converter { fraction } = descriptor.effect {
        let gained = holder.gain_energy((healed as f64 * fraction).round() as u32);
        report.energy_gained += gained;
        events.push(BattleEvent::EquipmentTriggered {
            actor: holder_ref,
            slot,
            equipment: descriptor.id,
            amount: gained,
        });
    }
}
