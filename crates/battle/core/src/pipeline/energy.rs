//! Stage 1: energy cost.

use crate::combat;
use crate::config::EnergyConfig;
use crate::engine::ActionError;
use crate::env::MoveDefinition;
use crate::state::Combatant;

/// Cost the attacker would pay for `definition` right now.
///
/// ```text
/// cost = round(base * (1 - energy_cost_reduction) * (1 - tier_energy_cost_reduction if tier))
/// ```
pub fn quote(
    attacker: &Combatant,
    definition: &MoveDefinition,
    is_special: bool,
    energy: &EnergyConfig,
) -> u32 {
    let base = combat::energy_cost(definition, is_special, energy);
    let Some(ability) = attacker.ability.as_ref() else {
        return base;
    };

    let mut factor = 1.0 - ability.energy_cost_reduction.clamp(0.0, 1.0);
    if !is_special {
        factor *= 1.0 - ability.tier_energy_cost_reduction.clamp(0.0, 1.0);
    }
    (base as f64 * factor).round() as u32
}

pub fn ensure_affordable(attacker: &Combatant, cost: u32) -> Result<(), ActionError> {
    if attacker.energy() < cost {
        return Err(ActionError::InsufficientEnergy {
            required: cost,
            available: attacker.energy(),
        });
    }
    Ok(())
}
