//! Damage, heal and energy formulas.

use crate::config::EnergyConfig;
use crate::env::MoveDefinition;

// ============================================================================
// Multipliers
// ============================================================================

/// ```text
/// level_multiplier = 1 + (level - 1) * 0.08
/// ```
pub fn level_multiplier(level: u32) -> f64 {
    1.0 + (level.max(1) - 1) as f64 * 0.08
}

/// ```text
/// special:      0.8 + ST/100 * 0.6
/// tier / heal:  0.6 + ST/100 * 0.4
/// ```
pub fn stat_multiplier(stat_percent: f64, is_special: bool) -> f64 {
    let st = stat_percent.clamp(0.0, 100.0) / 100.0;
    if is_special {
        0.8 + st * 0.6
    } else {
        0.6 + st * 0.4
    }
}

// ============================================================================
// Magnitudes
// ============================================================================

/// Signed magnitude of a move with the given base power.
///
/// # Formula
///
/// ```text
/// magnitude = max(1, round(|power| * level_multiplier * stat_multiplier))
/// result    = sign(power) * magnitude
/// ```
///
/// Zero power yields 0 (support move). Heals (negative power) always use the
/// tier stat multiplier; the caller negates the result back to a heal amount.
pub fn calculate_damage(power: i32, level: u32, stat_percent: f64, is_special: bool) -> i32 {
    if power == 0 {
        return 0;
    }
    let special_scaling = is_special && power > 0;
    let raw = power.unsigned_abs() as f64
        * level_multiplier(level)
        * stat_multiplier(stat_percent, special_scaling);
    let magnitude = (raw.round() as i64).clamp(1, i32::MAX as i64) as i32;
    if power < 0 { -magnitude } else { magnitude }
}

pub fn damage(definition: &MoveDefinition, level: u32, stat_percent: f64, is_special: bool) -> i32 {
    calculate_damage(definition.power, level, stat_percent, is_special)
}

/// Declared move cost, or the special/tier default.
pub fn energy_cost(definition: &MoveDefinition, is_special: bool, energy: &EnergyConfig) -> u32 {
    definition.energy_cost.unwrap_or(if is_special {
        energy.special_default_cost
    } else {
        energy.tier_default_cost
    })
}

/// ```text
/// max_hp = max(1, round(base_hp * level_multiplier * (0.6 + ST/100 * 0.4)))
/// ```
pub fn max_hp(base_hp: u32, level: u32, stat_percent: f64) -> u32 {
    let raw = base_hp as f64 * level_multiplier(level) * stat_multiplier(stat_percent, false);
    (raw.round() as u64).clamp(1, u32::MAX as u64) as u32
}
