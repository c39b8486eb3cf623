use crate::env::AbilityDescriptor;

/// Scratch record for once-per-battle ability triggers.
///
/// Created fresh for every battle; each one-shot stage checks its flag and
/// sets it in the same step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityState {
    pub first_attack_spent: bool,
    pub first_hit_spent: bool,
    pub shield_granted: bool,
    pub damage_block_remaining: u32,
}

impl AbilityState {
    pub fn fresh(ability: Option<&AbilityDescriptor>) -> Self {
        Self {
            damage_block_remaining: ability.map_or(0, |a| a.damage_block),
            ..Self::default()
        }
    }
}
