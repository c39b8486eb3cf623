//! Stage 7: attacker side effects of a landed hit.

use crate::config::StatusConfig;
use crate::env::Dice;
use crate::events::{ActionReport, BattleEvent};
use crate::state::StatusKind;

use super::Participants;

pub fn apply(
    status: &StatusConfig,
    dice: &mut Dice<'_>,
    p: &mut Participants<'_>,
    landed: u32,
    report: &mut ActionReport,
    events: &mut Vec<BattleEvent>,
) {
    let Some(ability) = p.attacker.ability.clone() else {
        return;
    };

    if ability.lifesteal > 0.0 {
        let amount = (landed as f64 * ability.lifesteal).round() as u32;
        report.healed += p.attacker.restore_hp(amount);
    }

    if ability.energy_steal > 0 {
        let drained = p.defender.drain_energy(ability.energy_steal);
        report.energy_drained += drained;
        report.energy_gained += p.attacker.gain_energy(drained);
    }

    if ability.damage_to_energy > 0.0 {
        let amount = (landed as f64 * ability.damage_to_energy).round() as u32;
        report.energy_gained += p.attacker.gain_energy(amount);
    }

    if p.defender.is_down() {
        return;
    }
    for (kind, chance) in [
        (StatusKind::Burn, ability.burn_chance),
        (StatusKind::Paralyze, ability.paralyze_chance),
        (StatusKind::Freeze, ability.freeze_chance),
    ] {
        if dice.chance(chance) {
            super::inflict_status(status, p, kind, 0, events);
        }
    }
}
