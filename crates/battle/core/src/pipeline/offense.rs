//! Stages 2 to 4: base magnitude, critical roll, attacker bonuses.
//!
//! Values stay `f64` through the multiplicative stages and are rounded once
//! at the end of stage 4.

use crate::combat::{self, CritRoll};
use crate::config::BattleConfig;
use crate::env::{Dice, MoveDefinition};
use crate::state::{BuffStat, Combatant};

/// Stage 2.
pub fn base_damage(attacker: &Combatant, definition: &MoveDefinition, is_special: bool) -> u32 {
    combat::damage(definition, attacker.level, attacker.stat_percent, is_special).max(0) as u32
}

/// Effective crit chance after attacker bonuses and defender reductions.
pub fn crit_chance(config: &BattleConfig, attacker: &Combatant, defender: &Combatant) -> f64 {
    let bonus = attacker.ability.as_ref().map_or(0.0, |a| a.crit_chance_bonus);
    let reduction = defender
        .ability
        .as_ref()
        .map_or(0.0, |a| a.enemy_crit_chance_reduction);
    let chance = (config.crit.base_chance + bonus) * attacker.buffs.multiplier(BuffStat::Critical);
    (chance - reduction).clamp(0.0, 1.0)
}

/// Stage 3. Returns the post-crit amount and whether the roll succeeded.
pub fn roll_critical(
    config: &BattleConfig,
    dice: &mut Dice<'_>,
    attacker: &Combatant,
    defender: &Combatant,
    base: u32,
) -> (f64, bool) {
    let chance = crit_chance(config, attacker, defender);
    let CritRoll {
        damage,
        is_critical,
    } = combat::critical_roll(base, chance, config.crit.multiplier, dice);

    let mut amount = damage as f64;
    if is_critical {
        let bonus = attacker.ability.as_ref().map_or(0.0, |a| a.crit_damage_bonus);
        amount *= 1.0 + bonus.max(0.0);
    }
    (amount, is_critical)
}

/// Stage 4. Consumes the first-attack bonus.
pub fn apply_bonuses(attacker: &mut Combatant, amount: f64, is_special: bool) -> u32 {
    let mut amount = amount;
    let first_attack = !attacker.ability_state.first_attack_spent;
    attacker.ability_state.first_attack_spent = true;

    if let Some(ability) = attacker.ability.as_ref() {
        if first_attack && ability.first_attack_bonus > 0.0 {
            amount *= 1.0 + ability.first_attack_bonus;
        }
        if is_special && ability.special_damage_bonus > 0.0 {
            amount *= 1.0 + ability.special_damage_bonus;
        }
        amount += ability.flat_damage_bonus as f64;
    }

    amount *= attacker.buffs.multiplier(BuffStat::Attack);

    if let Some(ability) = attacker.ability.as_ref() {
        let fraction = attacker.hp_fraction();
        if ability.has_high_hp_bonus() && fraction >= ability.high_hp_threshold {
            amount *= 1.0 + ability.high_hp_damage_bonus;
        }
        if ability.has_low_hp_bonus() && fraction <= ability.low_hp_threshold {
            amount *= 1.0 + ability.low_hp_damage_bonus;
        }
    }

    amount.round().clamp(1.0, u32::MAX as f64) as u32
}
