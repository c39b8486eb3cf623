use std::collections::VecDeque;

use crate::state::AccountId;

/// FIFO order in which raiders take their turns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TurnQueue {
    order: VecDeque<AccountId>,
}

impl TurnQueue {
    pub fn front(&self) -> Option<AccountId> {
        self.order.front().copied()
    }

    pub fn pop_front(&mut self) -> Option<AccountId> {
        self.order.pop_front()
    }

    pub fn push_back(&mut self, account: AccountId) {
        self.order.push_back(account);
    }

    pub fn remove(&mut self, account: AccountId) {
        self.order.retain(|queued| *queued != account);
    }

    /// Starts a new round. Only an empty queue is refilled.
    pub fn refill(&mut self, survivors: impl IntoIterator<Item = AccountId>) {
        if self.order.is_empty() {
            self.order.extend(survivors);
        }
    }

    pub fn contains(&self, account: AccountId) -> bool {
        self.order.contains(&account)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = AccountId> + '_ {
        self.order.iter().copied()
    }
}
