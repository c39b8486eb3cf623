//! Character selection before a duel starts.

use super::{DuelEngine, SetupError};
use crate::env::{BattleEnv, CharacterBuild};
use crate::events::BattleEvent;
use crate::state::{AccountId, Combatant, DuelState, Inventory, Owner, SessionId, Side};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LobbyStatus {
    Waiting { missing: Vec<Side> },
    Ready,
}

/// Pending duel whose sides have not both picked a character yet.
#[derive(Clone, Debug)]
pub struct DuelLobby {
    id: SessionId,
    seed: u64,
    owners: [Owner; 2],
    picks: [Option<Combatant>; 2],
}

impl DuelLobby {
    pub fn new(id: SessionId, seed: u64, owners: [Owner; 2]) -> Self {
        Self {
            id,
            seed,
            owners,
            picks: [None, None],
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn owner(&self, side: Side) -> Owner {
        self.owners[side.index()]
    }

    pub fn side_of(&self, account: AccountId) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|side| self.owner(*side).account() == Some(account))
    }

    pub fn status(&self) -> LobbyStatus {
        let missing: Vec<Side> = Side::BOTH
            .into_iter()
            .filter(|side| self.picks[side.index()].is_none())
            .collect();
        if missing.is_empty() {
            LobbyStatus::Ready
        } else {
            LobbyStatus::Waiting { missing }
        }
    }

    /// Locks in `side`'s character. A side selects exactly once.
    pub fn select(
        &mut self,
        env: &BattleEnv<'_>,
        side: Side,
        build: &CharacterBuild,
        inventory: Inventory,
    ) -> Result<LobbyStatus, SetupError> {
        if self.picks[side.index()].is_some() {
            return Err(SetupError::AlreadySelected(side));
        }
        let combatant = Combatant::from_build(env, self.owner(side), build, inventory)?;
        tracing::debug!(session = %self.id, %side, character = %combatant.character, "character selected");
        self.picks[side.index()] = Some(combatant);
        Ok(self.status())
    }

    /// Builds the duel once both sides have selected. Side A acts first.
    pub fn start(
        &mut self,
        env: &BattleEnv<'_>,
    ) -> Result<(DuelState, Vec<BattleEvent>), SetupError> {
        if self.status() != LobbyStatus::Ready {
            return Err(SetupError::LobbyIncomplete);
        }
        let [Some(a), Some(b)] = [self.picks[0].take(), self.picks[1].take()] else {
            return Err(SetupError::LobbyIncomplete);
        };
        Ok(DuelEngine::begin(env, self.id, self.seed, a, b, Side::A))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, NO_LUCK};

    #[test]
    fn duel_starts_once_both_sides_pick() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let mut lobby = DuelLobby::new(
            SessionId(1),
            7,
            [Owner::Account(AccountId(10)), Owner::Account(AccountId(20))],
        );
        let build = fixture.build(50.0, ["jab", "mend"]);

        assert_eq!(lobby.side_of(AccountId(20)), Some(Side::B));
        assert_eq!(lobby.start(&env).unwrap_err(), SetupError::LobbyIncomplete);

        let status = lobby
            .select(&env, Side::B, &build, Inventory::default())
            .unwrap();
        assert_eq!(
            status,
            LobbyStatus::Waiting {
                missing: vec![Side::A]
            }
        );
        assert_eq!(
            lobby
                .select(&env, Side::B, &build, Inventory::default())
                .unwrap_err(),
            SetupError::AlreadySelected(Side::B)
        );

        lobby
            .select(&env, Side::A, &build, Inventory::default())
            .unwrap();
        let (duel, events) = lobby.start(&env).unwrap();
        assert_eq!(duel.current(), Some(Side::A));
        assert_eq!(duel.combatant(Side::B).owner, Owner::Account(AccountId(20)));
        assert!(matches!(events[0], BattleEvent::TurnStarted { turn: 1, .. }));
    }

    #[test]
    fn unknown_character_is_rejected() {
        let fixture = Fixture::new(NO_LUCK);
        let env = fixture.env();
        let mut lobby = DuelLobby::new(SessionId(1), 7, [Owner::Ai, Owner::Ai]);
        let mut build = fixture.build(50.0, ["jab", "mend"]);
        build.template = "ghost".into();

        assert_eq!(
            lobby
                .select(&env, Side::A, &build, Inventory::default())
                .unwrap_err(),
            SetupError::UnknownCharacter("ghost".into())
        );
        assert!(matches!(lobby.status(), LobbyStatus::Waiting { .. }));
    }
}
