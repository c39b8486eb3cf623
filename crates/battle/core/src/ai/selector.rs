//! Candidate collection and weighted-window selection.

use crate::config::AiConfig;
use crate::env::{BattleEnv, Dice};
use crate::pipeline;
use crate::state::Combatant;

use super::scoring;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Moveset index.
    pub index: usize,
    pub priority: f64,
}

/// Scores every move the actor can pay for right now, in moveset order.
pub fn affordable(env: &BattleEnv<'_>, actor: &Combatant, opponent: &Combatant) -> Vec<Candidate> {
    let config = env.config();
    actor
        .moveset
        .iter()
        .filter_map(|(index, _)| {
            let (definition, is_special) = actor.move_at(index, env.catalog()).ok()?;
            let cost = pipeline::quote(actor, definition, is_special, &config.energy);
            pipeline::ensure_affordable(actor, cost).ok()?;
            Some(Candidate {
                index,
                priority: scoring::priority(
                    &config.ai,
                    actor,
                    opponent,
                    definition,
                    is_special,
                    cost,
                ),
            })
        })
        .collect()
}

/// Adds one jitter draw to every candidate, in order.
pub fn jitter(config: &AiConfig, dice: &mut Dice<'_>, candidates: &mut [Candidate]) {
    for candidate in candidates.iter_mut() {
        candidate.priority += dice.uniform(config.jitter_max);
    }
}

/// Picks uniformly among candidates within the window of the top score.
///
/// `candidates` must be non-empty.
pub fn pick(config: &AiConfig, dice: &mut Dice<'_>, candidates: &[Candidate]) -> usize {
    let top = candidates
        .iter()
        .map(|c| c.priority)
        .fold(f64::NEG_INFINITY, f64::max);
    let floor = top * config.candidate_window;
    let eligible: Vec<usize> = candidates
        .iter()
        .filter(|c| c.priority >= floor)
        .map(|c| c.index)
        .collect();
    eligible[dice.index(eligible.len())]
}
