//! Session outcomes and the reward manifest handed to the account layer.

use crate::env::ItemId;
use crate::events::CombatantRef;
use crate::state::{AccountId, SessionId, Side};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SessionMode {
    Duel,
    Raid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Winner {
    Side(Side),
    Raiders,
    Boss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EndReason {
    Knockout,
    Fled,
    /// A side ran out of consecutive action timeouts.
    Forfeit,
    BossDefeated,
    AllEliminated,
    /// The raid clock ran out with the boss still standing.
    Expired,
}

/// One row of the damage ranking; `rank` starts at 1.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRank {
    pub rank: u32,
    pub participant: CombatantRef,
    pub account: Option<AccountId>,
    pub damage: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardGrant {
    pub account: AccountId,
    pub currency: u64,
    pub items: Vec<(ItemId, u32)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemConsumption {
    pub account: AccountId,
    pub item: ItemId,
    pub count: u32,
}

/// Everything the account layer needs to settle a finished session, applied
/// in one call.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionOutcome {
    pub session: SessionId,
    pub mode: SessionMode,
    /// `None` when a raid expires.
    pub winner: Option<Winner>,
    pub reason: EndReason,
    pub turns: u32,
    pub ranking: Vec<DamageRank>,
    pub rewards: Vec<RewardGrant>,
    pub consumed: Vec<ItemConsumption>,
}

impl SessionOutcome {
    pub fn reward_for(&self, account: AccountId) -> Option<&RewardGrant> {
        self.rewards.iter().find(|grant| grant.account == account)
    }
}

/// Ranks entries by damage, highest first. Ties keep input order.
pub fn rank_by_damage(
    entries: impl IntoIterator<Item = (CombatantRef, Option<AccountId>, u64)>,
) -> Vec<DamageRank> {
    let mut rows: Vec<_> = entries.into_iter().collect();
    // Stable sort keeps insertion order among equal damage.
    rows.sort_by(|a, b| b.2.cmp(&a.2));
    rows.into_iter()
        .enumerate()
        .map(|(index, (participant, account, damage))| DamageRank {
            rank: index as u32 + 1,
            participant,
            account,
            damage,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranking_is_stable_on_ties() {
        let ranking = rank_by_damage([
            (CombatantRef::Raider(AccountId(1)), Some(AccountId(1)), 50),
            (CombatantRef::Raider(AccountId(2)), Some(AccountId(2)), 80),
            (CombatantRef::Raider(AccountId(3)), Some(AccountId(3)), 50),
        ]);
        let order: Vec<_> = ranking.iter().map(|r| (r.rank, r.account)).collect();
        assert_eq!(
            order,
            vec![
                (1, Some(AccountId(2))),
                (2, Some(AccountId(1))),
                (3, Some(AccountId(3))),
            ]
        );
    }
}
