use std::collections::BTreeSet;

use crate::events::CombatantRef;
use crate::outcome::{EndReason, SessionOutcome, Winner};
use crate::state::{AccountId, Combatant, SessionId, Timestamp};

use super::TurnQueue;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Raider {
    pub account: AccountId,
    pub combatant: Combatant,
    pub joined_at: Timestamp,
    /// Refreshed when the raider's turn starts and when it acts.
    pub last_active: Timestamp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RaidPhase {
    Active,
    /// `winner` is `None` when the raid clock ran out.
    Terminal {
        winner: Option<Winner>,
        reason: EndReason,
    },
}

/// One live raid. Mutated only through [`RaidEngine`](super::RaidEngine).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RaidState {
    pub id: SessionId,
    pub boss: Combatant,
    /// Every raider that ever joined, in join order.
    pub raiders: Vec<Raider>,
    pub queue: TurnQueue,
    /// Raider whose turn has started and who is expected to act.
    pub active: Option<AccountId>,
    pub eliminated: BTreeSet<AccountId>,
    pub started_at: Timestamp,
    pub ends_at: Timestamp,
    pub seed: u64,
    pub rolls: u64,
    pub turn: u32,
    pub phase: RaidPhase,
    pub(crate) outcome: Option<SessionOutcome>,
}

impl RaidState {
    pub fn new(id: SessionId, seed: u64, boss: Combatant, now: Timestamp, duration_ms: u64) -> Self {
        Self {
            id,
            boss,
            raiders: Vec::new(),
            queue: TurnQueue::default(),
            active: None,
            eliminated: BTreeSet::new(),
            started_at: now,
            ends_at: now.after(duration_ms),
            seed,
            rolls: 0,
            turn: 0,
            phase: RaidPhase::Active,
            outcome: None,
        }
    }

    pub fn raider(&self, account: AccountId) -> Option<&Raider> {
        self.raiders.iter().find(|r| r.account == account)
    }

    pub fn raider_mut(&mut self, account: AccountId) -> Option<&mut Raider> {
        self.raiders.iter_mut().find(|r| r.account == account)
    }

    /// Adds `amount` to the damage tally of the boss or raider `source`
    /// names, eliminated raiders included.
    pub fn credit_damage(&mut self, source: CombatantRef, amount: u32) {
        let combatant = match source {
            CombatantRef::Boss => Some(&mut self.boss),
            CombatantRef::Raider(account) => self.raider_mut(account).map(|r| &mut r.combatant),
            CombatantRef::Side(_) => None,
        };
        if let Some(combatant) = combatant {
            combatant.tally.damage_dealt += u64::from(amount);
        }
    }

    pub fn has_joined(&self, account: AccountId) -> bool {
        self.raider(account).is_some()
    }

    pub fn is_eliminated(&self, account: AccountId) -> bool {
        self.eliminated.contains(&account)
    }

    /// Raiders still in the fight, in join order.
    pub fn survivors(&self) -> impl Iterator<Item = AccountId> + '_ {
        self.raiders
            .iter()
            .map(|r| r.account)
            .filter(|account| !self.eliminated.contains(account))
    }

    pub fn current(&self) -> Option<AccountId> {
        match self.phase {
            RaidPhase::Active => self.active,
            RaidPhase::Terminal { .. } => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, RaidPhase::Terminal { .. })
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.ends_at
    }

    pub fn pending_outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }
}
