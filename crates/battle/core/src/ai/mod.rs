//! Move selection for AI-controlled combatants.
//!
//! Draws come from the session's [`Dice`], so an AI turn replays exactly
//! from the session seed. Draw order: pass check, one jitter draw per
//! affordable move, then the pick inside the candidate window.
mod scoring;
mod selector;

pub use scoring::priority;
pub use selector::{Candidate, affordable};

use crate::action::BattleAction;
use crate::env::{BattleEnv, Dice};
use crate::state::Combatant;

/// Chooses `actor`'s action against `opponent`.
///
/// Passes without drawing when no move is affordable.
pub fn choose_action(
    env: &BattleEnv<'_>,
    dice: &mut Dice<'_>,
    actor: &Combatant,
    opponent: &Combatant,
) -> BattleAction {
    let config = &env.config().ai;
    let mut candidates = selector::affordable(env, actor, opponent);
    if candidates.is_empty() {
        tracing::debug!(character = %actor.character, "no affordable move, passing");
        return BattleAction::Pass;
    }
    if dice.chance(config.pass_chance) {
        tracing::debug!(character = %actor.character, "ai chose to pass");
        return BattleAction::Pass;
    }

    selector::jitter(config, dice, &mut candidates);
    let index = selector::pick(config, dice, &candidates);
    tracing::debug!(
        character = %actor.character,
        ?candidates,
        index,
        "ai picked a move"
    );
    BattleAction::Move(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, NO_LUCK};

    #[test]
    fn passes_without_drawing_when_broke() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let mut hero = fixture.hero();
        hero.set_energy(5);
        let mut dice = env.dice(1, 0);

        assert_eq!(
            choose_action(&env, &mut dice, &hero, &fixture.hero()),
            BattleAction::Pass
        );
        assert_eq!(dice.nonce(), 0);
    }

    #[test]
    fn pass_roll_can_skip_an_affordable_turn() {
        let fixture = Fixture::new(&[0.01]);
        let env = fixture.env();
        let mut dice = env.dice(1, 0);

        assert_eq!(
            choose_action(&env, &mut dice, &fixture.hero(), &fixture.hero()),
            BattleAction::Pass
        );
        assert_eq!(dice.nonce(), 1);
    }

    #[test]
    fn efficient_special_wins_at_full_health() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let mut dice = env.dice(1, 0);

        let action = choose_action(&env, &mut dice, &fixture.hero(), &fixture.hero());
        assert_eq!(action, BattleAction::Move(0));
        // pass check, three jitters; the pick has one eligible candidate
        assert_eq!(dice.nonce(), 4);
    }

    #[test]
    fn low_health_prefers_healing() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let mut hero = fixture.hero();
        hero.set_hp(50);
        hero.set_energy(25);
        let mut dice = env.dice(1, 0);

        assert_eq!(
            choose_action(&env, &mut dice, &hero, &fixture.hero()),
            BattleAction::Move(2)
        );
    }
}
