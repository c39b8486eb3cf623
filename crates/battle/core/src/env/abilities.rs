//! Passive ability descriptors.
//!
//! An ability is a bag of named numeric modifiers. Each pipeline stage reads
//! only the fields it cares about; a zero field is inert. Fractions are in
//! `0.0..=1.0`, flat values are HP or energy points.

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AbilityDescriptor {
    pub name: String,

    // Energy
    pub energy_cost_reduction: f64,
    pub tier_energy_cost_reduction: f64,

    // Critical hits
    pub crit_chance_bonus: f64,
    pub crit_damage_bonus: f64,
    pub enemy_crit_chance_reduction: f64,

    // Offense
    pub first_attack_bonus: f64,
    pub special_damage_bonus: f64,
    pub flat_damage_bonus: u32,
    /// Own HP fraction at or above which `high_hp_damage_bonus` applies.
    pub high_hp_threshold: f64,
    pub high_hp_damage_bonus: f64,
    /// Own HP fraction at or below which `low_hp_damage_bonus` applies.
    pub low_hp_threshold: f64,
    pub low_hp_damage_bonus: f64,

    // Defense
    pub flat_damage_reduction: u32,
    pub dodge_chance: f64,
    pub first_hit_reduction: f64,
    /// One-battle pool absorbing damage before the shield.
    pub damage_block: u32,
    /// Shield granted once, at the start of the holder's first turn.
    pub battle_shield: u32,

    // After a hit lands
    pub lifesteal: f64,
    pub energy_steal: u32,
    pub damage_to_energy: f64,
    pub burn_chance: f64,
    pub paralyze_chance: f64,
    pub freeze_chance: f64,

    // Sustain
    pub heal_bonus: f64,
    pub regen_hp: u32,
    pub regen_energy: u32,
}

impl AbilityDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn has_high_hp_bonus(&self) -> bool {
        self.high_hp_damage_bonus > 0.0 && self.high_hp_threshold > 0.0
    }

    pub fn has_low_hp_bonus(&self) -> bool {
        self.low_hp_damage_bonus > 0.0 && self.low_hp_threshold > 0.0
    }
}
