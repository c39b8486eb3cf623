//! Battle configuration constants and tunable parameters.
//!
//! Every balance number the engine reads lives here so content files can
//! override it. Fractions are expressed in `0.0..=1.0`; durations in
//! milliseconds because the core never touches a clock directly.

/// Top-level tuning knobs for duels and raids.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    pub energy: EnergyConfig,
    pub crit: CritConfig,
    pub status: StatusConfig,
    pub duel: DuelConfig,
    pub ai: AiConfig,
    pub raid: RaidConfig,
    pub rewards: RewardConfig,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// One slot per [`StatusKind`](crate::state::StatusKind).
    pub const MAX_STATUS_EFFECTS: usize = 6;
    /// One equipment slot per rarity tier.
    pub const EQUIPMENT_SLOTS: usize = 3;
    /// Special move plus two tier moves.
    pub const MOVESET_SIZE: usize = 3;

    pub fn new() -> Self {
        Self::default()
    }
}

/// Energy pool and move cost defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnergyConfig {
    pub max: u32,
    pub starting: u32,
    /// Flat energy gained at the start of every turn.
    pub regen_per_turn: u32,
    /// Cost used when a special move does not declare one.
    pub special_default_cost: u32,
    /// Cost used when a tier move does not declare one.
    pub tier_default_cost: u32,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            max: 100,
            starting: 50,
            regen_per_turn: 10,
            special_default_cost: 40,
            tier_default_cost: 20,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CritConfig {
    pub base_chance: f64,
    /// Damage multiplier on a successful roll, before ability bonuses.
    pub multiplier: f64,
}

impl Default for CritConfig {
    fn default() -> Self {
        Self {
            base_chance: 0.10,
            multiplier: 2.0,
        }
    }
}

/// Status effect magnitudes (fractions of the target's max HP) and default
/// durations used when an effect is inflicted without an explicit duration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatusConfig {
    pub burn_fraction: f64,
    pub burn_turns: u32,
    pub poison_base_fraction: f64,
    /// Extra fraction added for every tick poison has already dealt.
    pub poison_increment_fraction: f64,
    pub poison_turns: u32,
    pub regen_fraction: f64,
    pub regen_turns: u32,
    /// Duration of freeze, paralyze and stun.
    pub skip_turns: u32,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            burn_fraction: 0.05,
            burn_turns: 3,
            poison_base_fraction: 0.03,
            poison_increment_fraction: 0.02,
            poison_turns: 4,
            regen_fraction: 0.06,
            regen_turns: 3,
            skip_turns: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DuelConfig {
    /// Consecutive action timeouts by one side before it forfeits.
    pub idle_forfeit_after: u32,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            idle_forfeit_after: 3,
        }
    }
}

/// AI priority weights.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiConfig {
    pub special_multiplier: f64,
    pub finisher_threshold: f64,
    pub finisher_multiplier: f64,
    pub desperation_threshold: f64,
    pub desperation_multiplier: f64,
    pub high_damage_threshold: u32,
    pub jitter_max: f64,
    /// Candidates scoring at least `top * candidate_window` are eligible.
    pub candidate_window: f64,
    pub pass_chance: f64,
    /// Heal priorities for own HP below 30%, below 60%, and otherwise.
    pub heal_band_scores: [f64; 3],
    pub support_score: f64,
    /// Support priority when the move's buff is already active.
    pub support_score_active: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            special_multiplier: 1.3,
            finisher_threshold: 0.3,
            finisher_multiplier: 1.6,
            desperation_threshold: 0.5,
            desperation_multiplier: 1.2,
            high_damage_threshold: 50,
            jitter_max: 25.0,
            candidate_window: 0.75,
            pass_chance: 0.05,
            heal_band_scores: [250.0, 120.0, 20.0],
            support_score: 60.0,
            support_score_active: 15.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RaidConfig {
    pub boss_hp_multiplier: f64,
    pub inactivity_threshold_ms: u64,
    pub duration_ms: u64,
}

impl Default for RaidConfig {
    fn default() -> Self {
        Self {
            boss_hp_multiplier: 12.0,
            inactivity_threshold_ms: 180_000,
            duration_ms: 30 * 60 * 1_000,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardConfig {
    pub duel_win_currency: u64,
    /// Raid damage needed per currency unit.
    pub raid_damage_per_currency: u64,
    /// Currency multiplier applied when a raid ends without a boss kill.
    pub partial_credit_fraction: f64,
    /// Consumable granted to the top raid ranks on victory.
    pub rare_item: String,
    /// Quantity of `rare_item` for ranks 1, 2 and 3.
    pub rank_item_counts: [u32; 3],
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            duel_win_currency: 100,
            raid_damage_per_currency: 10,
            partial_credit_fraction: 0.5,
            rare_item: "elixir".to_owned(),
            rank_item_counts: [3, 2, 1],
        }
    }
}
