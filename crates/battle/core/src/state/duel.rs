//! Duel session aggregate.

use super::{Combatant, SessionId};
use crate::events::CombatantRef;
use crate::outcome::{EndReason, SessionOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    pub const fn opponent(&self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub const fn index(&self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DuelPhase {
    AwaitingAction(Side),
    Terminal { winner: Side, reason: EndReason },
}

/// One live duel. Mutated only through [`DuelEngine`](crate::engine::DuelEngine).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DuelState {
    pub id: SessionId,
    pub sides: [Combatant; 2],
    pub phase: DuelPhase,
    /// Number of turns started so far.
    pub turn: u32,
    pub seed: u64,
    /// Roll nonce; every random draw advances it.
    pub rolls: u64,
    /// Consecutive action timeouts per side.
    pub idle_timeouts: [u32; 2],
    pub(crate) outcome: Option<SessionOutcome>,
}

impl DuelState {
    /// Raw state before the first turn has started; use
    /// [`DuelEngine::begin`](crate::engine::DuelEngine::begin) to open it.
    pub fn new(id: SessionId, seed: u64, a: Combatant, b: Combatant, first: Side) -> Self {
        Self {
            id,
            sides: [a, b],
            phase: DuelPhase::AwaitingAction(first),
            turn: 0,
            seed,
            rolls: 0,
            idle_timeouts: [0; 2],
            outcome: None,
        }
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        &self.sides[side.index()]
    }

    pub fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        &mut self.sides[side.index()]
    }

    /// Adds `amount` to the damage tally of the side `source` names.
    pub fn credit_damage(&mut self, source: CombatantRef, amount: u32) {
        if let CombatantRef::Side(side) = source {
            self.combatant_mut(side).tally.damage_dealt += u64::from(amount);
        }
    }

    /// Mutable access to `actor` and its opponent at once.
    pub fn pair_mut(&mut self, actor: Side) -> (&mut Combatant, &mut Combatant) {
        let [a, b] = &mut self.sides;
        match actor {
            Side::A => (a, b),
            Side::B => (b, a),
        }
    }

    pub fn current(&self) -> Option<Side> {
        match self.phase {
            DuelPhase::AwaitingAction(side) => Some(side),
            DuelPhase::Terminal { .. } => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, DuelPhase::Terminal { .. })
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            DuelPhase::Terminal { winner, .. } => Some(winner),
            DuelPhase::AwaitingAction(_) => None,
        }
    }

    /// Outcome waiting to be applied, if the duel has ended and it has not
    /// been taken yet.
    pub fn pending_outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }
}
