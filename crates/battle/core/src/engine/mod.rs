//! Duel turn resolver.
//!
//! [`DuelEngine`] is the only writer of a [`DuelState`]. A call either
//! resolves completely or returns an [`ActionError`] with the state untouched.
//!
//! ```text
//! AwaitingAction(side) --execute--> Resolving --> AwaitingAction(other)
//!                                             \-> Terminal
//! ```
//!
//! After every consumed turn the engine runs end-of-turn bookkeeping for the
//! actor, hands the pointer to the other side, and runs that side's upkeep.
//! Sides with a skip effect are passed over until someone can act.
mod errors;
pub mod items;
mod lobby;
pub mod upkeep;

pub use errors::{ActionError, SetupError};
pub use lobby::{DuelLobby, LobbyStatus};

use crate::action::BattleAction;
use crate::env::{BattleEnv, Dice};
use crate::events::{ActionReport, BattleEvent, CombatantRef, EliminationReason, ResolvedAction};
use crate::outcome::{
    EndReason, ItemConsumption, RewardGrant, SessionMode, SessionOutcome, Winner, rank_by_damage,
};
use crate::pipeline::{self, Participants};
use crate::state::{Combatant, DuelPhase, DuelState, SessionId, Side};

/// Events produced by one engine call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TurnResolution {
    pub events: Vec<BattleEvent>,
    /// `false` for actions that leave the turn with the same side.
    pub turn_consumed: bool,
}

impl TurnResolution {
    pub fn is_terminal(&self) -> bool {
        self.events.iter().any(BattleEvent::is_terminal)
    }
}

pub struct DuelEngine<'a> {
    state: &'a mut DuelState,
}

impl<'a> DuelEngine<'a> {
    pub fn new(state: &'a mut DuelState) -> Self {
        Self { state }
    }

    /// Creates a duel and runs the first side's upkeep.
    pub fn begin(
        env: &BattleEnv<'_>,
        id: SessionId,
        seed: u64,
        a: Combatant,
        b: Combatant,
        first: Side,
    ) -> (DuelState, Vec<BattleEvent>) {
        let mut state = DuelState::new(id, seed, a, b, first);
        let mut events = Vec::new();
        tracing::info!(
            session = %id,
            a = %state.combatant(Side::A).character,
            b = %state.combatant(Side::B).character,
            "duel started"
        );
        DuelEngine::new(&mut state).advance(env, first, &mut events);
        (state, events)
    }

    /// Resolves `action` submitted by `side`.
    pub fn execute(
        &mut self,
        env: &BattleEnv<'_>,
        side: Side,
        action: &BattleAction,
    ) -> Result<TurnResolution, ActionError> {
        let current = self.state.current().ok_or(ActionError::SessionEnded)?;
        if side != current {
            return Err(ActionError::NotYourTurn {
                expected: current,
                actual: side,
            });
        }

        let actor_ref = CombatantRef::Side(side);
        let target_ref = CombatantRef::Side(side.opponent());
        let mut dice = env.dice(self.state.seed, self.state.rolls);
        let mut events = Vec::new();

        match action {
            BattleAction::ActivateEquipment(slot) => {
                let descriptor = self.state.combatant_mut(side).loadout.arm(*slot)?;
                events.push(BattleEvent::EquipmentArmed {
                    actor: actor_ref,
                    slot: *slot,
                    equipment: descriptor.id.clone(),
                });
                return Ok(TurnResolution {
                    events,
                    turn_consumed: false,
                });
            }
            BattleAction::Move(index) => {
                let (attacker, defender) = self.state.pair_mut(side);
                let resolution = pipeline::resolve_move(
                    env,
                    &mut dice,
                    Participants {
                        attacker,
                        attacker_ref: actor_ref,
                        defender,
                        defender_ref: target_ref,
                    },
                    *index,
                )?;
                events.push(BattleEvent::ActionResolved(resolution.report));
                events.extend(resolution.events);
            }
            BattleAction::Pass => {
                events.push(BattleEvent::ActionResolved(ActionReport::new(
                    actor_ref,
                    target_ref,
                    ResolvedAction::Pass,
                )));
            }
            BattleAction::Flee => {
                events.push(BattleEvent::Eliminated {
                    actor: actor_ref,
                    reason: EliminationReason::Fled,
                });
                self.finish(env, side.opponent(), EndReason::Fled, &mut events);
                return Ok(TurnResolution {
                    events,
                    turn_consumed: true,
                });
            }
            BattleAction::UseItem(id) => {
                items::use_item(env, self.state.combatant_mut(side), actor_ref, id, &mut events)?;
            }
        }

        self.state.idle_timeouts[side.index()] = 0;
        self.commit(&dice);
        self.after_action(env, side, &mut events);
        Ok(TurnResolution {
            events,
            turn_consumed: true,
        })
    }

    /// The current side let its action timer run out.
    ///
    /// Resolves as a pass; after `idle_forfeit_after` consecutive timeouts the
    /// side forfeits instead.
    pub fn timeout(&mut self, env: &BattleEnv<'_>) -> Result<TurnResolution, ActionError> {
        let side = self.state.current().ok_or(ActionError::SessionEnded)?;
        let actor_ref = CombatantRef::Side(side);
        let mut events = Vec::new();

        let idle = &mut self.state.idle_timeouts[side.index()];
        *idle += 1;
        let idle = *idle;
        let limit = env.config().duel.idle_forfeit_after;
        tracing::warn!(session = %self.state.id, %side, idle, limit, "action timed out");

        if limit > 0 && idle >= limit {
            events.push(BattleEvent::Eliminated {
                actor: actor_ref,
                reason: EliminationReason::Forfeit,
            });
            self.finish(env, side.opponent(), EndReason::Forfeit, &mut events);
        } else {
            events.push(BattleEvent::ActionResolved(ActionReport::new(
                actor_ref,
                CombatantRef::Side(side.opponent()),
                ResolvedAction::TimedOut,
            )));
            self.after_action(env, side, &mut events);
        }

        Ok(TurnResolution {
            events,
            turn_consumed: true,
        })
    }

    /// Hands out the outcome of a finished duel exactly once.
    pub fn take_outcome(&mut self) -> Option<SessionOutcome> {
        self.state.outcome.take()
    }

    fn commit(&mut self, dice: &Dice<'_>) {
        self.state.rolls = dice.nonce();
    }

    fn after_action(&mut self, env: &BattleEnv<'_>, actor: Side, events: &mut Vec<BattleEvent>) {
        let actor_down = self.state.combatant(actor).is_down();
        let opponent_down = self.state.combatant(actor.opponent()).is_down();
        if actor_down || opponent_down {
            for side in Side::BOTH {
                if self.state.combatant(side).is_down() {
                    events.push(BattleEvent::Eliminated {
                        actor: CombatantRef::Side(side),
                        reason: EliminationReason::Knockout,
                    });
                }
            }
            // A side that knocks itself out loses, even on a double knockout.
            let winner = if actor_down { actor.opponent() } else { actor };
            self.finish(env, winner, EndReason::Knockout, events);
            return;
        }

        upkeep::end_turn(
            self.state.combatant_mut(actor),
            CombatantRef::Side(actor),
            events,
        );
        self.advance(env, actor.opponent(), events);
    }

    /// Starts turns from `next` until a side can act or the duel ends.
    fn advance(&mut self, env: &BattleEnv<'_>, next: Side, events: &mut Vec<BattleEvent>) {
        let mut next = next;
        loop {
            self.state.turn += 1;
            self.state.phase = DuelPhase::AwaitingAction(next);
            let turn = self.state.turn;
            let actor_ref = CombatantRef::Side(next);
            tracing::debug!(session = %self.state.id, side = %next, turn, "turn started");

            let combatant = self.state.combatant_mut(next);
            let start = upkeep::begin_turn(env.config(), combatant, actor_ref, turn, events);
            let down = combatant.is_down();
            for (source, amount) in start.credits {
                self.state.credit_damage(source, amount);
            }

            if down {
                events.push(BattleEvent::Eliminated {
                    actor: actor_ref,
                    reason: EliminationReason::Knockout,
                });
                self.finish(env, next.opponent(), EndReason::Knockout, events);
                return;
            }
            if start.skip.is_none() {
                return;
            }
            upkeep::end_turn(self.state.combatant_mut(next), actor_ref, events);
            next = next.opponent();
        }
    }

    fn finish(
        &mut self,
        env: &BattleEnv<'_>,
        winner: Side,
        reason: EndReason,
        events: &mut Vec<BattleEvent>,
    ) {
        self.state.phase = DuelPhase::Terminal { winner, reason };
        let outcome = duel_outcome(env, self.state, winner, reason);
        tracing::info!(
            session = %self.state.id,
            %winner,
            %reason,
            turns = self.state.turn,
            "duel ended"
        );
        events.push(BattleEvent::SessionEnded(outcome.clone()));
        self.state.outcome = Some(outcome);
    }
}

fn duel_outcome(
    env: &BattleEnv<'_>,
    state: &DuelState,
    winner: Side,
    reason: EndReason,
) -> SessionOutcome {
    let ranking = rank_by_damage(Side::BOTH.into_iter().map(|side| {
        let combatant = state.combatant(side);
        (
            CombatantRef::Side(side),
            combatant.owner.account(),
            combatant.tally.damage_dealt,
        )
    }));

    let rewards = state
        .combatant(winner)
        .owner
        .account()
        .map(|account| RewardGrant {
            account,
            currency: env.config().rewards.duel_win_currency,
            items: Vec::new(),
        })
        .into_iter()
        .collect();

    let consumed = Side::BOTH
        .into_iter()
        .flat_map(|side| consumption(state.combatant(side)))
        .collect();

    SessionOutcome {
        session: state.id,
        mode: SessionMode::Duel,
        winner: Some(Winner::Side(winner)),
        reason,
        turns: state.turn,
        ranking,
        rewards,
        consumed,
    }
}

/// Items an account-owned combatant used during the battle.
pub(crate) fn consumption(combatant: &Combatant) -> Vec<ItemConsumption> {
    let Some(account) = combatant.owner.account() else {
        return Vec::new();
    };
    combatant
        .tally
        .items_used
        .iter()
        .map(|(item, count)| ItemConsumption {
            account,
            item: item.clone(),
            count: *count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ItemId;
    use crate::state::{AccountId, BuffStat, Inventory, Owner, StatusKind};
    use crate::testing::{Fixture, NO_LUCK};

    fn duel(fixture: &Fixture) -> (DuelState, Vec<BattleEvent>) {
        let a = fixture.owned(
            Owner::Account(AccountId(1)),
            fixture.build(50.0, ["jab", "mend"]),
            [(ItemId::from("potion"), 1u32)].into_iter().collect(),
        );
        let b = fixture.owned(
            Owner::Account(AccountId(2)),
            fixture.build(50.0, ["jab", "mend"]),
            Inventory::default(),
        );
        DuelEngine::begin(&fixture.env(), SessionId(9), 1, a, b, Side::A)
    }

    #[test]
    fn opening_runs_first_upkeep() {
        let fixture = Fixture::new(NO_LUCK);
        let (state, events) = duel(&fixture);
        assert_eq!(state.current(), Some(Side::A));
        assert_eq!(state.turn, 1);
        assert_eq!(state.combatant(Side::A).energy(), 60);
        assert_eq!(state.combatant(Side::B).energy(), 50);
        assert!(matches!(events[0], BattleEvent::TurnStarted { turn: 1, .. }));
    }

    #[test]
    fn turns_alternate_after_a_move() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let (mut state, _) = duel(&fixture);

        let out = DuelEngine::new(&mut state)
            .execute(&env, Side::A, &BattleAction::Move(0))
            .unwrap();
        assert!(out.turn_consumed);
        assert_eq!(state.current(), Some(Side::B));
        assert_eq!(state.combatant(Side::B).hp(), 400 - 99);
        assert_eq!(state.combatant(Side::B).energy(), 60);
        assert_eq!(state.rolls, 1);
    }

    #[test]
    fn wrong_side_is_rejected_without_mutation() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let (mut state, _) = duel(&fixture);
        let before = state.clone();

        let err = DuelEngine::new(&mut state)
            .execute(&env, Side::B, &BattleAction::Pass)
            .unwrap_err();
        assert_eq!(
            err,
            ActionError::NotYourTurn {
                expected: Side::A,
                actual: Side::B
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn knockout_ends_the_duel_and_rejects_further_actions() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let (mut state, _) = duel(&fixture);
        state.combatant_mut(Side::B).set_hp(50);

        let mut engine = DuelEngine::new(&mut state);
        let out = engine.execute(&env, Side::A, &BattleAction::Move(0)).unwrap();
        assert!(out.is_terminal());
        assert!(out.events.iter().any(|e| matches!(
            e,
            BattleEvent::Eliminated {
                actor: CombatantRef::Side(Side::B),
                reason: EliminationReason::Knockout
            }
        )));

        assert_eq!(
            engine.execute(&env, Side::B, &BattleAction::Pass),
            Err(ActionError::SessionEnded)
        );
        assert_eq!(
            engine.execute(&env, Side::A, &BattleAction::Pass),
            Err(ActionError::SessionEnded)
        );

        let outcome = engine.take_outcome().unwrap();
        assert_eq!(outcome.winner, Some(Winner::Side(Side::A)));
        assert_eq!(outcome.reason, EndReason::Knockout);
        assert_eq!(outcome.reward_for(AccountId(1)).unwrap().currency, 100);
        assert!(outcome.reward_for(AccountId(2)).is_none());
        assert_eq!(outcome.ranking[0].account, Some(AccountId(1)));
        assert!(engine.take_outcome().is_none());
    }

    #[test]
    fn reflect_knockout_of_the_attacker_hands_the_win_over() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let a = fixture.hero();
        let b = fixture.combatant(fixture.build(50.0, ["jab", "mend"]).with_equipment(1, "mirror"));
        let (mut state, _) = DuelEngine::begin(&env, SessionId(1), 1, a, b, Side::A);
        state.combatant_mut(Side::B).loadout.arm(1).unwrap();
        state.combatant_mut(Side::A).set_hp(5);

        DuelEngine::new(&mut state)
            .execute(&env, Side::A, &BattleAction::Move(1))
            .unwrap();
        assert_eq!(state.winner(), Some(Side::B));
    }

    #[test]
    fn flee_hands_the_win_to_the_other_side() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let (mut state, _) = duel(&fixture);

        let out = DuelEngine::new(&mut state)
            .execute(&env, Side::A, &BattleAction::Flee)
            .unwrap();
        assert!(out.is_terminal());
        assert_eq!(
            state.phase,
            DuelPhase::Terminal {
                winner: Side::B,
                reason: EndReason::Fled
            }
        );
    }

    #[test]
    fn arming_equipment_keeps_the_turn() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let a = fixture.combatant(fixture.build(50.0, ["jab", "mend"]).with_equipment(1, "mirror"));
        let (mut state, _) = DuelEngine::begin(&env, SessionId(1), 1, a, fixture.hero(), Side::A);

        let mut engine = DuelEngine::new(&mut state);
        let out = engine
            .execute(&env, Side::A, &BattleAction::ActivateEquipment(1))
            .unwrap();
        assert!(!out.turn_consumed);
        assert_eq!(
            engine.execute(&env, Side::A, &BattleAction::ActivateEquipment(0)),
            Err(ActionError::EmptySlot(0))
        );
        assert_eq!(state.current(), Some(Side::A));
    }

    #[test]
    fn item_use_consumes_the_turn_and_is_reported() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let (mut state, _) = duel(&fixture);
        state.combatant_mut(Side::A).set_hp(100);

        let mut engine = DuelEngine::new(&mut state);
        engine
            .execute(&env, Side::A, &BattleAction::UseItem("potion".into()))
            .unwrap();
        engine.execute(&env, Side::B, &BattleAction::Flee).unwrap();
        let outcome = engine.take_outcome().unwrap();

        assert_eq!(state.combatant(Side::A).hp(), 200);
        assert_eq!(outcome.consumed.len(), 1);
        assert_eq!(outcome.consumed[0].item, ItemId::from("potion"));
    }

    #[test]
    fn unowned_item_is_rejected() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let (mut state, _) = duel(&fixture);

        let mut engine = DuelEngine::new(&mut state);
        assert_eq!(
            engine.execute(&env, Side::A, &BattleAction::UseItem("tonic".into())),
            Err(ActionError::ItemNotOwned("tonic".into()))
        );
        assert_eq!(
            engine.execute(&env, Side::A, &BattleAction::UseItem("nothing".into())),
            Err(ActionError::UnknownItem("nothing".into()))
        );
    }

    #[test]
    fn frozen_side_is_passed_over() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let (mut state, _) = duel(&fixture);
        state
            .combatant_mut(Side::B)
            .status
            .apply(StatusKind::Freeze, 1, CombatantRef::Side(Side::A));

        let out = DuelEngine::new(&mut state)
            .execute(&env, Side::A, &BattleAction::Pass)
            .unwrap();
        assert!(out.events.iter().any(|e| matches!(
            e,
            BattleEvent::TurnSkipped {
                actor: CombatantRef::Side(Side::B),
                cause: StatusKind::Freeze
            }
        )));
        assert_eq!(state.current(), Some(Side::A));
        assert_eq!(state.turn, 3);
    }

    #[test]
    fn repeated_timeouts_forfeit() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let (mut state, _) = duel(&fixture);

        let mut engine = DuelEngine::new(&mut state);
        for _ in 0..2 {
            // A times out, B passes
            let out = engine.timeout(&env).unwrap();
            assert!(!out.is_terminal());
            engine.execute(&env, Side::B, &BattleAction::Pass).unwrap();
        }
        let out = engine.timeout(&env).unwrap();
        assert!(out.is_terminal());
        assert_eq!(
            state.phase,
            DuelPhase::Terminal {
                winner: Side::B,
                reason: EndReason::Forfeit
            }
        );
    }

    #[test]
    fn explicit_action_resets_the_idle_counter() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let (mut state, _) = duel(&fixture);

        let mut engine = DuelEngine::new(&mut state);
        engine.timeout(&env).unwrap();
        engine.execute(&env, Side::B, &BattleAction::Pass).unwrap();
        engine.execute(&env, Side::A, &BattleAction::Pass).unwrap();
        assert_eq!(state.idle_timeouts, [0, 0]);
    }

    #[test]
    fn two_turn_item_buff_boosts_one_later_attack() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let a = fixture.owned(
            Owner::Account(AccountId(1)),
            fixture.build(50.0, ["jab", "mend"]),
            [(ItemId::from("rage"), 1u32)].into_iter().collect(),
        );
        let (mut state, _) =
            DuelEngine::begin(&env, SessionId(3), 1, a, fixture.hero(), Side::A);

        let jab_damage = |out: &TurnResolution| {
            out.events.iter().find_map(|e| match e {
                BattleEvent::ActionResolved(report) if report.actor == CombatantRef::Side(Side::A) => {
                    Some(report.damage)
                }
                _ => None,
            })
        };

        let mut engine = DuelEngine::new(&mut state);
        engine
            .execute(&env, Side::A, &BattleAction::UseItem("rage".into()))
            .unwrap();
        engine.execute(&env, Side::B, &BattleAction::Pass).unwrap();
        let boosted = engine.execute(&env, Side::A, &BattleAction::Move(1)).unwrap();
        assert_eq!(jab_damage(&boosted), Some(48));
        assert!(boosted.events.contains(&BattleEvent::BuffExpired {
            target: CombatantRef::Side(Side::A),
            stat: BuffStat::Attack,
        }));

        engine.execute(&env, Side::B, &BattleAction::Pass).unwrap();
        let plain = engine.execute(&env, Side::A, &BattleAction::Move(1)).unwrap();
        assert_eq!(jab_damage(&plain), Some(24));
    }

    #[test]
    fn burn_can_end_the_duel_at_turn_start() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let (mut state, _) = duel(&fixture);
        let b = state.combatant_mut(Side::B);
        b.set_hp(5);
        b.status.apply(StatusKind::Burn, 3, CombatantRef::Side(Side::A));

        let out = DuelEngine::new(&mut state)
            .execute(&env, Side::A, &BattleAction::Pass)
            .unwrap();
        assert!(out.is_terminal());
        assert_eq!(state.winner(), Some(Side::A));
        assert_eq!(state.combatant(Side::A).tally.damage_dealt, 5);
        let outcome = state.pending_outcome().unwrap();
        assert_eq!(outcome.ranking[0].participant, CombatantRef::Side(Side::A));
        assert_eq!(outcome.ranking[0].damage, 5);
    }
}
