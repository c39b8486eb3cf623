//! Heal moves and secondary move effects.

use crate::config::StatusConfig;
use crate::env::{Dice, MoveDefinition, MoveEffect};
use crate::events::{ActionReport, BattleEvent};

use super::{Participants, equipment};

/// Heal path: skips defender mitigation, applies heal bonus and conversion.
pub fn heal(
    p: &mut Participants<'_>,
    definition: &MoveDefinition,
    is_special: bool,
    report: &mut ActionReport,
    events: &mut Vec<BattleEvent>,
) {
    let magnitude = -crate::combat::damage(
        definition,
        p.attacker.level,
        p.attacker.stat_percent,
        is_special,
    );
    let bonus = p.attacker.ability.as_ref().map_or(0.0, |a| a.heal_bonus);
    let amount = (magnitude.max(0) as f64 * (1.0 + bonus.max(0.0))).round() as u32;

    let healed = p.attacker.restore_hp(amount);
    p.attacker.tally.healing_done += healed as u64;
    report.healed += healed;

    equipment::convert_heal(p.attacker, p.attacker_ref, healed, report, events);
}

/// Applies a move's secondary effect.
pub fn apply_effect(
    status: &StatusConfig,
    dice: &mut Dice<'_>,
    p: &mut Participants<'_>,
    effect: &MoveEffect,
    events: &mut Vec<BattleEvent>,
) {
    match *effect {
        MoveEffect::SelfBuff {
            stat,
            multiplier,
            turns,
        } => {
            if p.attacker.buffs.apply(stat, multiplier, turns) {
                events.push(BattleEvent::BuffApplied {
                    target: p.attacker_ref,
                    stat,
                    multiplier,
                    turns,
                });
            }
        }
        MoveEffect::Inflict {
            kind,
            turns,
            chance,
        } => {
            if !p.defender.is_down() && dice.chance(chance) {
                super::inflict_status(status, p, kind, turns, events);
            }
        }
        MoveEffect::Shield { amount } => {
            p.attacker.shield = p.attacker.shield.saturating_add(amount);
            events.push(BattleEvent::ShieldGranted {
                actor: p.attacker_ref,
                amount,
            });
        }
        MoveEffect::Cleanse => {
            for kind in p.attacker.status.clear() {
                events.push(BattleEvent::StatusExpired {
                    target: p.attacker_ref,
                    kind,
                });
            }
        }
    }
}

