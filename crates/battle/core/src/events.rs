//! Structured battle events.
//!
//! Engines return events in the order they happened. They carry numbers and
//! ids only; rendering is the caller's concern.

use crate::env::{EquipmentId, ItemId, MoveId};
use crate::outcome::SessionOutcome;
use crate::state::{AccountId, BuffStat, Side, StatusKind};

/// Names a combatant inside a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantRef {
    Side(Side),
    Raider(AccountId),
    Boss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EliminationReason {
    Knockout,
    Fled,
    /// Raid participant idle past the inactivity threshold.
    Inactive,
    /// Duel side that timed out too many turns in a row.
    Forfeit,
}

/// What the actor did on a resolved turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolvedAction {
    Move { index: usize, id: MoveId },
    Pass,
    /// Implicit pass after an action timeout.
    TimedOut,
}

/// Numeric summary of one resolved action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionReport {
    pub actor: CombatantRef,
    pub target: CombatantRef,
    pub action: ResolvedAction,
    pub energy_spent: u32,
    pub energy_refunded: u32,
    /// Damage after mitigation, before shield absorption.
    pub damage: u32,
    pub blocked: u32,
    pub absorbed_by_shield: u32,
    pub hp_damage: u32,
    pub healed: u32,
    pub energy_gained: u32,
    pub energy_drained: u32,
    pub reflected: u32,
    pub critical: bool,
    pub dodged: bool,
}

impl ActionReport {
    pub fn new(actor: CombatantRef, target: CombatantRef, action: ResolvedAction) -> Self {
        Self {
            actor,
            target,
            action,
            energy_spent: 0,
            energy_refunded: 0,
            damage: 0,
            blocked: 0,
            absorbed_by_shield: 0,
            hp_damage: 0,
            healed: 0,
            energy_gained: 0,
            energy_drained: 0,
            reflected: 0,
            critical: false,
            dodged: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    TurnStarted {
        actor: CombatantRef,
        turn: u32,
    },
    Regenerated {
        actor: CombatantRef,
        hp: u32,
        energy: u32,
    },
    ShieldGranted {
        actor: CombatantRef,
        amount: u32,
    },
    /// Net status damage and healing applied at turn start.
    StatusTicked {
        actor: CombatantRef,
        damage: u32,
        heal: u32,
    },
    StatusApplied {
        target: CombatantRef,
        kind: StatusKind,
        remaining_turns: u32,
        stacks: u32,
    },
    StatusExpired {
        target: CombatantRef,
        kind: StatusKind,
    },
    TurnSkipped {
        actor: CombatantRef,
        cause: StatusKind,
    },
    BuffApplied {
        target: CombatantRef,
        stat: BuffStat,
        multiplier: f64,
        turns: u32,
    },
    BuffExpired {
        target: CombatantRef,
        stat: BuffStat,
    },
    ActionResolved(ActionReport),
    ItemUsed {
        actor: CombatantRef,
        item: ItemId,
        hp: u32,
        energy: u32,
    },
    EquipmentArmed {
        actor: CombatantRef,
        slot: usize,
        equipment: EquipmentId,
    },
    EquipmentTriggered {
        actor: CombatantRef,
        slot: usize,
        equipment: EquipmentId,
        amount: u32,
    },
    Revived {
        actor: CombatantRef,
        hp: u32,
        energy: u32,
    },
    Joined {
        raider: AccountId,
    },
    Eliminated {
        actor: CombatantRef,
        reason: EliminationReason,
    },
    SessionEnded(SessionOutcome),
}

impl BattleEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BattleEvent::SessionEnded(_))
    }
}
