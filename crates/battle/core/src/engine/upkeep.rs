//! Start-of-turn and end-of-turn bookkeeping shared by duels and raids.
//!
//! A turn begins, in order, with: the one-time battle shield, ability regen,
//! flat energy regen, then the status pass (which may force a skip). Buffs
//! count down when the holder's turn ends, skipped turns included.
//!
//! Damage-over-time ticks are credited to whoever applied the effect. The
//! caller owns every combatant, so it applies [`TurnStart::credits`].

use crate::config::BattleConfig;
use crate::events::{BattleEvent, CombatantRef};
use crate::pipeline::vitals;
use crate::state::{Combatant, StatusKind};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnStart {
    /// Skip-turn effect that consumes this turn.
    pub skip: Option<StatusKind>,
    /// Status damage that landed, per applying combatant.
    pub credits: Vec<(CombatantRef, u32)>,
}

/// Runs the start of `actor`'s turn.
///
/// The caller must check [`Combatant::is_down`] afterwards: status damage can
/// knock the holder out.
pub fn begin_turn(
    config: &BattleConfig,
    combatant: &mut Combatant,
    actor: CombatantRef,
    turn: u32,
    events: &mut Vec<BattleEvent>,
) -> TurnStart {
    events.push(BattleEvent::TurnStarted { actor, turn });

    let (battle_shield, regen_hp, regen_energy) = combatant
        .ability
        .as_ref()
        .map_or((0, 0, 0), |a| (a.battle_shield, a.regen_hp, a.regen_energy));

    if !combatant.ability_state.shield_granted {
        combatant.ability_state.shield_granted = true;
        if battle_shield > 0 {
            combatant.shield = combatant.shield.saturating_add(battle_shield);
            events.push(BattleEvent::ShieldGranted {
                actor,
                amount: battle_shield,
            });
        }
    }

    let hp = combatant.restore_hp(regen_hp);
    let energy = combatant.gain_energy(regen_energy.saturating_add(config.energy.regen_per_turn));
    if hp > 0 || energy > 0 {
        events.push(BattleEvent::Regenerated { actor, hp, energy });
    }

    let tick = combatant.status.tick(combatant.max_hp(), &config.status);
    let mut start = TurnStart::default();
    if tick.damage > 0 || tick.heal > 0 {
        // Heal offsets damage first; only overkill goes uncredited.
        let landed = if tick.damage > tick.heal {
            vitals::inflict(combatant, actor, tick.damage - tick.heal, events) + tick.heal
        } else {
            combatant.restore_hp(tick.heal - tick.damage);
            tick.damage
        };
        start.credits = split_credit(&tick.sources, landed);
        events.push(BattleEvent::StatusTicked {
            actor,
            damage: tick.damage,
            heal: tick.heal,
        });
    }
    for kind in tick.expired {
        events.push(BattleEvent::StatusExpired {
            target: actor,
            kind,
        });
    }

    if combatant.is_down() {
        return start;
    }
    if let Some(cause) = tick.skip {
        tracing::debug!(actor = ?actor, %cause, "turn skipped");
        events.push(BattleEvent::TurnSkipped { actor, cause });
    }
    start.skip = tick.skip;
    start
}

/// Hands out `landed` across `sources` in order.
fn split_credit(sources: &[(CombatantRef, u32)], landed: u32) -> Vec<(CombatantRef, u32)> {
    let mut left = landed;
    let mut credits = Vec::with_capacity(sources.len());
    for &(source, amount) in sources {
        let credited = amount.min(left);
        if credited == 0 {
            break;
        }
        left -= credited;
        credits.push((source, credited));
    }
    credits
}

/// Counts the holder's buffs down by one turn.
pub fn end_turn(combatant: &mut Combatant, actor: CombatantRef, events: &mut Vec<BattleEvent>) {
    for stat in combatant.buffs.tick() {
        events.push(BattleEvent::BuffExpired {
            target: actor,
            stat,
        });
    }
}
