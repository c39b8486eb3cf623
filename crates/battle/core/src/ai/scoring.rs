//! Move priorities.
//!
//! ```text
//! damage:  base / max(cost, 1) * 100
//!          * special_multiplier      if special
//!          * finisher_multiplier     if opponent hp fraction < finisher_threshold
//!          * desperation_multiplier  if own hp fraction < desperation_threshold
//!                                    and base > high_damage_threshold
//! heal:    heal_band_scores[band(own hp fraction)]
//! support: support_score, or support_score_active when already in effect
//! ```

use crate::config::AiConfig;
use crate::env::{MoveDefinition, MoveEffect, MoveKind};
use crate::pipeline;
use crate::state::Combatant;

/// Upper HP-fraction bounds of the first two heal bands.
const HEAL_BANDS: [f64; 2] = [0.3, 0.6];

/// Deterministic part of a move's priority, before jitter.
pub fn priority(
    config: &AiConfig,
    actor: &Combatant,
    opponent: &Combatant,
    definition: &MoveDefinition,
    is_special: bool,
    cost: u32,
) -> f64 {
    match definition.kind() {
        MoveKind::Damage => damage_priority(config, actor, opponent, definition, is_special, cost),
        MoveKind::Heal => heal_priority(config, actor.hp_fraction()),
        MoveKind::Support => support_priority(config, actor, definition),
    }
}

fn damage_priority(
    config: &AiConfig,
    actor: &Combatant,
    opponent: &Combatant,
    definition: &MoveDefinition,
    is_special: bool,
    cost: u32,
) -> f64 {
    let damage = pipeline::base_damage(actor, definition, is_special);
    let mut score = damage as f64 / cost.max(1) as f64 * 100.0;
    if is_special {
        score *= config.special_multiplier;
    }
    if opponent.hp_fraction() < config.finisher_threshold {
        score *= config.finisher_multiplier;
    }
    if actor.hp_fraction() < config.desperation_threshold && damage > config.high_damage_threshold
    {
        score *= config.desperation_multiplier;
    }
    score
}

fn heal_priority(config: &AiConfig, hp_fraction: f64) -> f64 {
    let band = HEAL_BANDS
        .iter()
        .position(|bound| hp_fraction < *bound)
        .unwrap_or(HEAL_BANDS.len());
    config.heal_band_scores[band]
}

fn support_priority(config: &AiConfig, actor: &Combatant, definition: &MoveDefinition) -> f64 {
    let already_active = match definition.effect {
        Some(MoveEffect::SelfBuff { stat, .. }) => actor.buffs.is_active(stat),
        Some(MoveEffect::Shield { .. }) => actor.shield > 0,
        _ => false,
    };
    if already_active {
        config.support_score_active
    } else {
        config.support_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::CatalogOracle;
    use crate::state::BuffStat;
    use crate::testing::{Fixture, NO_LUCK};

    fn definition<'c>(fixture: &'c Fixture, id: &str) -> &'c MoveDefinition {
        fixture.catalog.move_definition(&id.into()).unwrap()
    }

    #[test]
    fn special_outscores_its_raw_efficiency() {
        let fixture = Fixture::new(NO_LUCK);
        let hero = fixture.hero();
        let blast = definition(&fixture, "blast");

        // 99 damage for 40 energy, then x1.3
        let score = priority(&fixture.config.ai, &hero, &hero, blast, true, 40);
        assert!((score - 99.0 / 40.0 * 100.0 * 1.3).abs() < 1e-9);
    }

    #[test]
    fn finisher_applies_below_threshold() {
        let fixture = Fixture::new(NO_LUCK);
        let hero = fixture.hero();
        let mut weak = fixture.hero();
        weak.set_hp(100);
        let jab = definition(&fixture, "jab");

        let normal = priority(&fixture.config.ai, &hero, &hero, jab, false, 20);
        let finishing = priority(&fixture.config.ai, &hero, &weak, jab, false, 20);
        assert!((finishing - normal * 1.6).abs() < 1e-9);
    }

    #[test]
    fn desperation_needs_a_heavy_hitter() {
        let fixture = Fixture::new(NO_LUCK);
        let hero = fixture.hero();
        let mut hurt = fixture.hero();
        hurt.set_hp(150);

        let jab = definition(&fixture, "jab");
        assert_eq!(
            priority(&fixture.config.ai, &hurt, &hero, jab, false, 20),
            priority(&fixture.config.ai, &hero, &hero, jab, false, 20)
        );

        let blast = definition(&fixture, "blast");
        let calm = priority(&fixture.config.ai, &hero, &hero, blast, true, 40);
        let desperate = priority(&fixture.config.ai, &hurt, &hero, blast, true, 40);
        assert!((desperate - calm * 1.2).abs() < 1e-9);
    }

    #[test]
    fn heal_priority_follows_hp_bands() {
        let fixture = Fixture::new(NO_LUCK);
        let mut hero = fixture.hero();
        let mend = definition(&fixture, "mend");
        let config = &fixture.config.ai;
        let opponent = fixture.hero();

        assert_eq!(priority(config, &hero, &opponent, mend, false, 20), 20.0);
        hero.set_hp(200);
        assert_eq!(priority(config, &hero, &opponent, mend, false, 20), 120.0);
        hero.set_hp(100);
        assert_eq!(priority(config, &hero, &opponent, mend, false, 20), 250.0);
    }

    #[test]
    fn active_buff_lowers_support_priority() {
        let fixture = Fixture::new(NO_LUCK);
        let mut hero = fixture.hero();
        let opponent = fixture.hero();
        let focus = definition(&fixture, "focus");

        assert_eq!(priority(&fixture.config.ai, &hero, &opponent, focus, false, 10), 60.0);
        hero.buffs.apply(BuffStat::Attack, 1.5, 2);
        assert_eq!(priority(&fixture.config.ai, &hero, &opponent, focus, false, 10), 15.0);
    }
}
