//! Raid coordinator: many account-owned raiders against one shared boss.
//!
//! Raiders act one at a time in [`TurnQueue`] order. The boss answers every
//! resolved raider action with one AI-chosen move against a random survivor.
//! When the queue drains it is refilled from the survivors in join order.
//!
//! The engine never reads a clock. Callers pass `now` into every operation
//! and call [`RaidEngine::sweep`] periodically to apply expiry and
//! inactivity.
mod errors;
mod queue;
mod rewards;
mod state;

pub use errors::RaidError;
pub use queue::TurnQueue;
pub use rewards::raid_outcome;
pub use state::{RaidPhase, RaidState, Raider};

use crate::action::BattleAction;
use crate::ai;
use crate::engine::{ActionError, SetupError, TurnResolution, items, upkeep};
use crate::env::{BattleEnv, CharacterBuild, Dice};
use crate::events::{ActionReport, BattleEvent, CombatantRef, EliminationReason, ResolvedAction};
use crate::outcome::{EndReason, SessionOutcome, Winner};
use crate::pipeline::{self, Participants};
use crate::state::{AccountId, Combatant, Owner, SessionId, Timestamp};

pub struct RaidEngine<'a> {
    state: &'a mut RaidState,
}

impl<'a> RaidEngine<'a> {
    pub fn new(state: &'a mut RaidState) -> Self {
        Self { state }
    }

    /// Creates a raid around a boss built from `boss_build`.
    pub fn open(
        env: &BattleEnv<'_>,
        id: SessionId,
        seed: u64,
        boss_build: &CharacterBuild,
        now: Timestamp,
    ) -> Result<RaidState, SetupError> {
        let config = &env.config().raid;
        let boss = Combatant::boss(env, boss_build, config.boss_hp_multiplier)?;
        tracing::info!(session = %id, boss = %boss.character, hp = boss.max_hp(), "raid opened");
        Ok(RaidState::new(id, seed, boss, now, config.duration_ms))
    }

    /// Adds a raider to the back of the queue. The first raider to join
    /// starts the first turn.
    pub fn join(
        &mut self,
        env: &BattleEnv<'_>,
        account: AccountId,
        mut combatant: Combatant,
        now: Timestamp,
    ) -> Result<Vec<BattleEvent>, RaidError> {
        if self.state.is_terminal() || self.state.is_expired(now) {
            return Err(RaidError::Ended);
        }
        if self.state.is_eliminated(account) {
            return Err(RaidError::Eliminated(account));
        }
        if self.state.has_joined(account) {
            return Err(RaidError::AlreadyJoined(account));
        }

        combatant.owner = Owner::Account(account);
        self.state.raiders.push(Raider {
            account,
            combatant,
            joined_at: now,
            last_active: now,
        });
        self.state.queue.push_back(account);
        tracing::info!(session = %self.state.id, %account, "raider joined");

        let mut events = vec![BattleEvent::Joined { raider: account }];
        if self.state.active.is_none() {
            self.advance(env, now, &mut events);
        }
        Ok(events)
    }

    /// Resolves `action` by `account`, then the boss's answer.
    pub fn execute(
        &mut self,
        env: &BattleEnv<'_>,
        account: AccountId,
        action: &BattleAction,
        now: Timestamp,
    ) -> Result<TurnResolution, RaidError> {
        if self.state.is_terminal() || self.state.is_expired(now) {
            return Err(RaidError::Ended);
        }
        if !self.state.has_joined(account) {
            return Err(RaidError::NotJoined(account));
        }
        if self.state.is_eliminated(account) {
            return Err(RaidError::Eliminated(account));
        }
        let Some(expected) = self.state.active else {
            return Err(RaidError::Ended);
        };
        if expected != account {
            return Err(RaidError::NotYourTurn {
                expected,
                actual: account,
            });
        }

        let actor_ref = CombatantRef::Raider(account);
        let mut dice = env.dice(self.state.seed, self.state.rolls);
        let mut events = Vec::new();
        let state = &mut *self.state;
        let Some(raider) = state.raiders.iter_mut().find(|r| r.account == account) else {
            return Err(RaidError::NotJoined(account));
        };

        match action {
            BattleAction::Flee => return Err(ActionError::FleeNotAllowed.into()),
            BattleAction::ActivateEquipment(slot) => {
                let descriptor = raider.combatant.loadout.arm(*slot)?;
                events.push(BattleEvent::EquipmentArmed {
                    actor: actor_ref,
                    slot: *slot,
                    equipment: descriptor.id.clone(),
                });
                raider.last_active = now;
                return Ok(TurnResolution {
                    events,
                    turn_consumed: false,
                });
            }
            BattleAction::Move(index) => {
                let resolution = pipeline::resolve_move(
                    env,
                    &mut dice,
                    Participants {
                        attacker: &mut raider.combatant,
                        attacker_ref: actor_ref,
                        defender: &mut state.boss,
                        defender_ref: CombatantRef::Boss,
                    },
                    *index,
                )?;
                events.push(BattleEvent::ActionResolved(resolution.report));
                events.extend(resolution.events);
            }
            BattleAction::Pass => {
                events.push(BattleEvent::ActionResolved(ActionReport::new(
                    actor_ref,
                    CombatantRef::Boss,
                    ResolvedAction::Pass,
                )));
            }
            BattleAction::UseItem(id) => {
                items::use_item(env, &mut raider.combatant, actor_ref, id, &mut events)?;
            }
        }
        raider.last_active = now;

        self.after_action(env, &mut dice, account, now, &mut events);
        self.state.rolls = dice.nonce();
        Ok(TurnResolution {
            events,
            turn_consumed: true,
        })
    }

    /// Applies raid expiry and eliminates the raider about to act if they
    /// have been idle past the inactivity threshold.
    pub fn sweep(&mut self, env: &BattleEnv<'_>, now: Timestamp) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        if self.state.is_terminal() {
            return events;
        }
        if self.state.is_expired(now) {
            self.finish(env, None, EndReason::Expired, &mut events);
            return events;
        }

        let Some(account) = self.state.active else {
            return events;
        };
        let threshold = env.config().raid.inactivity_threshold_ms;
        let idle = self
            .state
            .raider(account)
            .map_or(0, |raider| now.since(raider.last_active));
        if idle >= threshold {
            tracing::warn!(session = %self.state.id, %account, idle, "raider inactive");
            self.eliminate(account, EliminationReason::Inactive, &mut events);
            self.advance(env, now, &mut events);
        }
        events
    }

    /// Hands out the outcome of a finished raid exactly once.
    pub fn take_outcome(&mut self) -> Option<SessionOutcome> {
        self.state.outcome.take()
    }

    fn after_action(
        &mut self,
        env: &BattleEnv<'_>,
        dice: &mut Dice<'_>,
        account: AccountId,
        now: Timestamp,
        events: &mut Vec<BattleEvent>,
    ) {
        if self.state.boss.is_down() {
            self.defeat_boss(env, events);
            return;
        }

        let actor_ref = CombatantRef::Raider(account);
        if let Some(raider) = self.state.raider_mut(account) {
            if raider.combatant.is_down() {
                self.eliminate(account, EliminationReason::Knockout, events);
            } else {
                upkeep::end_turn(&mut raider.combatant, actor_ref, events);
                self.state.queue.pop_front();
                self.state.active = None;
            }
        }

        self.boss_turn(env, dice, events);
        self.advance(env, now, events);
    }

    /// One boss action against a random survivor.
    fn boss_turn(&mut self, env: &BattleEnv<'_>, dice: &mut Dice<'_>, events: &mut Vec<BattleEvent>) {
        if self.state.is_terminal() {
            return;
        }
        let survivors: Vec<AccountId> = self.state.survivors().collect();
        if survivors.is_empty() {
            return;
        }

        self.state.turn += 1;
        let turn = self.state.turn;
        let start = upkeep::begin_turn(env.config(), &mut self.state.boss, CombatantRef::Boss, turn, events);
        for (source, amount) in start.credits {
            self.state.credit_damage(source, amount);
        }
        if self.state.boss.is_down() {
            self.defeat_boss(env, events);
            return;
        }

        if start.skip.is_none() {
            let target = survivors[dice.index(survivors.len())];
            self.boss_strike(env, dice, target, events);
            if self.state.is_terminal() {
                return;
            }
        }
        upkeep::end_turn(&mut self.state.boss, CombatantRef::Boss, events);
    }

    fn boss_strike(
        &mut self,
        env: &BattleEnv<'_>,
        dice: &mut Dice<'_>,
        target: AccountId,
        events: &mut Vec<BattleEvent>,
    ) {
        let target_ref = CombatantRef::Raider(target);
        let state = &mut *self.state;
        let Some(raider) = state.raiders.iter_mut().find(|r| r.account == target) else {
            return;
        };

        let action = ai::choose_action(env, dice, &state.boss, &raider.combatant);
        let report = match action {
            BattleAction::Move(index) => {
                let resolved = pipeline::resolve_move(
                    env,
                    dice,
                    Participants {
                        attacker: &mut state.boss,
                        attacker_ref: CombatantRef::Boss,
                        defender: &mut raider.combatant,
                        defender_ref: target_ref,
                    },
                    index,
                );
                match resolved {
                    Ok(resolution) => {
                        events.push(BattleEvent::ActionResolved(resolution.report));
                        events.extend(resolution.events);
                        None
                    }
                    Err(error) => {
                        tracing::warn!(session = %state.id, %error, "boss move rejected, passing");
                        Some(ActionReport::new(CombatantRef::Boss, target_ref, ResolvedAction::Pass))
                    }
                }
            }
            _ => Some(ActionReport::new(CombatantRef::Boss, target_ref, ResolvedAction::Pass)),
        };
        if let Some(report) = report {
            events.push(BattleEvent::ActionResolved(report));
        }

        let target_down = raider.combatant.is_down();
        if state.boss.is_down() {
            self.defeat_boss(env, events);
        } else if target_down {
            self.eliminate(target, EliminationReason::Knockout, events);
        }
    }

    /// Starts turns from the queue head until a raider can act, or ends the
    /// raid when nobody is left.
    fn advance(&mut self, env: &BattleEnv<'_>, now: Timestamp, events: &mut Vec<BattleEvent>) {
        loop {
            if self.state.is_terminal() {
                return;
            }
            if self.state.survivors().next().is_none() {
                self.state.active = None;
                if !self.state.raiders.is_empty() {
                    self.finish(env, Some(Winner::Boss), EndReason::AllEliminated, events);
                }
                return;
            }
            if self.state.queue.is_empty() {
                let survivors: Vec<AccountId> = self.state.survivors().collect();
                self.state.queue.refill(survivors);
            }
            let Some(account) = self.state.queue.front() else {
                return;
            };

            self.state.turn += 1;
            self.state.active = Some(account);
            let turn = self.state.turn;
            let actor_ref = CombatantRef::Raider(account);
            let Some(raider) = self.state.raider_mut(account) else {
                self.state.queue.pop_front();
                continue;
            };
            raider.last_active = now;
            let start = upkeep::begin_turn(env.config(), &mut raider.combatant, actor_ref, turn, events);
            let down = raider.combatant.is_down();
            for (source, amount) in start.credits {
                self.state.credit_damage(source, amount);
            }

            if down {
                self.eliminate(account, EliminationReason::Knockout, events);
                continue;
            }
            if start.skip.is_none() {
                return;
            }
            if let Some(raider) = self.state.raider_mut(account) {
                upkeep::end_turn(&mut raider.combatant, actor_ref, events);
            }
            self.state.queue.pop_front();
            self.state.active = None;
        }
    }

    fn eliminate(&mut self, account: AccountId, reason: EliminationReason, events: &mut Vec<BattleEvent>) {
        if let Some(raider) = self.state.raider_mut(account) {
            raider.combatant.knock_out();
        }
        self.state.eliminated.insert(account);
        self.state.queue.remove(account);
        if self.state.active == Some(account) {
            self.state.active = None;
        }
        tracing::info!(session = %self.state.id, %account, %reason, "raider eliminated");
        events.push(BattleEvent::Eliminated {
            actor: CombatantRef::Raider(account),
            reason,
        });
    }

    fn defeat_boss(&mut self, env: &BattleEnv<'_>, events: &mut Vec<BattleEvent>) {
        events.push(BattleEvent::Eliminated {
            actor: CombatantRef::Boss,
            reason: EliminationReason::Knockout,
        });
        self.finish(env, Some(Winner::Raiders), EndReason::BossDefeated, events);
    }

    fn finish(
        &mut self,
        env: &BattleEnv<'_>,
        winner: Option<Winner>,
        reason: EndReason,
        events: &mut Vec<BattleEvent>,
    ) {
        self.state.phase = RaidPhase::Terminal { winner, reason };
        self.state.active = None;
        let outcome = raid_outcome(&env.config().rewards, self.state, winner, reason);
        tracing::info!(
            session = %self.state.id,
            %reason,
            turns = self.state.turn,
            raiders = self.state.raiders.len(),
            "raid ended"
        );
        events.push(BattleEvent::SessionEnded(outcome.clone()));
        self.state.outcome = Some(outcome);
    }
}
