//! Raid settlement.
//!
//! ```text
//! currency = max(1, damage / raid_damage_per_currency)        for damage > 0
//!          = max(1, floor(currency * partial_credit_fraction)) unless the boss fell
//! items    = rank_item_counts[rank - 1] x rare_item           ranks 1..=3, victory only
//! ```
//!
//! Raiders who dealt no damage get nothing.

use crate::config::RewardConfig;
use crate::engine::consumption;
use crate::env::ItemId;
use crate::events::CombatantRef;
use crate::outcome::{
    DamageRank, EndReason, RewardGrant, SessionMode, SessionOutcome, Winner, rank_by_damage,
};

use super::RaidState;

pub fn raid_outcome(
    config: &RewardConfig,
    state: &RaidState,
    winner: Option<Winner>,
    reason: EndReason,
) -> SessionOutcome {
    let ranking = rank_by_damage(state.raiders.iter().map(|raider| {
        (
            CombatantRef::Raider(raider.account),
            Some(raider.account),
            raider.combatant.tally.damage_dealt,
        )
    }));
    let victory = winner == Some(Winner::Raiders);
    let rewards = ranking
        .iter()
        .filter_map(|entry| grant(config, entry, victory))
        .collect();
    let consumed = state
        .raiders
        .iter()
        .flat_map(|raider| consumption(&raider.combatant))
        .collect();

    SessionOutcome {
        session: state.id,
        mode: SessionMode::Raid,
        winner,
        reason,
        turns: state.turn,
        ranking,
        rewards,
        consumed,
    }
}

fn grant(config: &RewardConfig, entry: &DamageRank, victory: bool) -> Option<RewardGrant> {
    let account = entry.account?;
    if entry.damage == 0 {
        return None;
    }

    let mut currency = (entry.damage / config.raid_damage_per_currency.max(1)).max(1);
    if !victory {
        currency = ((currency as f64 * config.partial_credit_fraction).floor() as u64).max(1);
    }

    let mut items = Vec::new();
    if victory {
        let count = config
            .rank_item_counts
            .get(entry.rank as usize - 1)
            .copied()
            .unwrap_or(0);
        if count > 0 {
            items.push((ItemId::from(config.rare_item.as_str()), count));
        }
    }

    Some(RewardGrant {
        account,
        currency,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AccountId, SessionId, Timestamp};
    use crate::testing::{Fixture, NO_LUCK};

    use super::super::Raider;

    fn raid_with_damage(fixture: &Fixture, damage: &[u64]) -> RaidState {
        let mut state = RaidState::new(SessionId(3), 1, fixture.hero(), Timestamp::ZERO, 1_000);
        for (n, dealt) in damage.iter().enumerate() {
            let mut combatant = fixture.hero();
            combatant.tally.damage_dealt = *dealt;
            state.raiders.push(Raider {
                account: AccountId(n as u64 + 1),
                combatant,
                joined_at: Timestamp::ZERO,
                last_active: Timestamp::ZERO,
            });
        }
        state
    }

    #[test]
    fn victory_pays_currency_and_top_three_items() {
        let fixture = Fixture::new(NO_LUCK);
        let state = raid_with_damage(&fixture, &[40, 300, 5, 0, 120]);
        let outcome = raid_outcome(
            &fixture.config.rewards,
            &state,
            Some(Winner::Raiders),
            EndReason::BossDefeated,
        );

        let elixir = ItemId::from("elixir");
        let top = outcome.reward_for(AccountId(2)).unwrap();
        assert_eq!(top.currency, 30);
        assert_eq!(top.items, vec![(elixir.clone(), 3)]);
        assert_eq!(outcome.reward_for(AccountId(5)).unwrap().items, vec![(elixir.clone(), 2)]);
        assert_eq!(outcome.reward_for(AccountId(1)).unwrap().items, vec![(elixir, 1)]);

        let fourth = outcome.reward_for(AccountId(3)).unwrap();
        assert_eq!(fourth.currency, 1);
        assert!(fourth.items.is_empty());

        assert!(outcome.reward_for(AccountId(4)).is_none());
        assert_eq!(outcome.ranking.len(), 5);
    }

    #[test]
    fn defeat_pays_partial_currency_without_items() {
        let fixture = Fixture::new(NO_LUCK);
        let state = raid_with_damage(&fixture, &[300, 15]);
        let outcome = raid_outcome(
            &fixture.config.rewards,
            &state,
            Some(Winner::Boss),
            EndReason::AllEliminated,
        );

        let first = outcome.reward_for(AccountId(1)).unwrap();
        assert_eq!(first.currency, 15);
        assert!(first.items.is_empty());
        assert_eq!(outcome.reward_for(AccountId(2)).unwrap().currency, 1);
    }
}
