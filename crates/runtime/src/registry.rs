//! Live-session registry.
//!
//! Tracks every live session's handle and which session each account is
//! engaged in. An account is engaged in at most one live session at a time;
//! claims are released when the session settles.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use battle_core::{AccountId, SessionId};

use crate::api::{DuelHandle, RaidHandle, Result, RuntimeError};

#[derive(Clone)]
pub enum SessionHandle {
    Duel(DuelHandle),
    Raid(RaidHandle),
}

#[derive(Default)]
struct Sessions {
    live: HashMap<SessionId, SessionHandle>,
    engaged: HashMap<AccountId, SessionId>,
}

#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<Sessions>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn register(&self, session: SessionId, handle: SessionHandle) {
        self.inner.write().await.live.insert(session, handle);
    }

    /// Engages every account in `session`, or none of them.
    pub(crate) async fn claim_all(&self, accounts: &[AccountId], session: SessionId) -> Result<()> {
        let mut inner = self.inner.write().await;
        for (index, account) in accounts.iter().enumerate() {
            if let Some(existing) = inner.engaged.get(account).copied() {
                return Err(RuntimeError::AlreadyEngaged {
                    account: *account,
                    session: existing,
                });
            }
            if accounts[..index].contains(account) {
                return Err(RuntimeError::AlreadyEngaged {
                    account: *account,
                    session,
                });
            }
        }
        for account in accounts {
            inner.engaged.insert(*account, session);
        }
        Ok(())
    }

    /// Engages `account` in `session`.
    ///
    /// Returns `false` when the account was already engaged in this very
    /// session, so callers know not to release it on failure.
    pub(crate) async fn claim(&self, account: AccountId, session: SessionId) -> Result<bool> {
        let mut inner = self.inner.write().await;
        match inner.engaged.get(&account).copied() {
            Some(existing) if existing == session => Ok(false),
            Some(existing) => Err(RuntimeError::AlreadyEngaged {
                account,
                session: existing,
            }),
            None => {
                inner.engaged.insert(account, session);
                Ok(true)
            }
        }
    }

    pub(crate) async fn release(&self, account: AccountId, session: SessionId) {
        let mut inner = self.inner.write().await;
        if inner.engaged.get(&account) == Some(&session) {
            inner.engaged.remove(&account);
        }
    }

    /// Drops a finished session and every claim pointing at it.
    pub(crate) async fn close(&self, session: SessionId) {
        let mut inner = self.inner.write().await;
        inner.live.remove(&session);
        inner.engaged.retain(|_, engaged_in| *engaged_in != session);
    }

    pub async fn session_of(&self, account: AccountId) -> Option<SessionId> {
        self.inner.read().await.engaged.get(&account).copied()
    }

    pub async fn get(&self, session: SessionId) -> Option<SessionHandle> {
        self.inner.read().await.live.get(&session).cloned()
    }

    pub async fn duel(&self, session: SessionId) -> Option<DuelHandle> {
        match self.get(session).await? {
            SessionHandle::Duel(handle) => Some(handle),
            SessionHandle::Raid(_) => None,
        }
    }

    pub async fn raid(&self, session: SessionId) -> Option<RaidHandle> {
        match self.get(session).await? {
            SessionHandle::Raid(handle) => Some(handle),
            SessionHandle::Duel(_) => None,
        }
    }

    /// Ids of every live session, ascending.
    pub async fn live_sessions(&self) -> Vec<SessionId> {
        let mut sessions: Vec<_> = self.inner.read().await.live.keys().copied().collect();
        sessions.sort();
        sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn an_account_is_engaged_once() {
        let registry = SessionRegistry::new();
        registry
            .claim_all(&[AccountId(1), AccountId(2)], SessionId(10))
            .await
            .unwrap();

        let err = registry.claim(AccountId(2), SessionId(11)).await.unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::AlreadyEngaged {
                account: AccountId(2),
                session: SessionId(10)
            }
        ));
        assert!(!registry.claim(AccountId(1), SessionId(10)).await.unwrap());
        assert!(registry.claim(AccountId(3), SessionId(11)).await.unwrap());

        registry.close(SessionId(10)).await;
        assert_eq!(registry.session_of(AccountId(1)).await, None);
        assert_eq!(registry.session_of(AccountId(3)).await, Some(SessionId(11)));
    }

    #[tokio::test]
    async fn claim_all_is_all_or_nothing() {
        let registry = SessionRegistry::new();
        registry.claim(AccountId(2), SessionId(1)).await.unwrap();

        assert!(
            registry
                .claim_all(&[AccountId(1), AccountId(2)], SessionId(5))
                .await
                .is_err()
        );
        assert_eq!(registry.session_of(AccountId(1)).await, None);

        assert!(
            registry
                .claim_all(&[AccountId(7), AccountId(7)], SessionId(5))
                .await
                .is_err()
        );
        assert_eq!(registry.session_of(AccountId(7)).await, None);
    }

    #[tokio::test]
    async fn release_only_touches_the_named_session() {
        let registry = SessionRegistry::new();
        registry.claim(AccountId(4), SessionId(2)).await.unwrap();
        registry.release(AccountId(4), SessionId(3)).await;
        assert_eq!(registry.session_of(AccountId(4)).await, Some(SessionId(2)));
        registry.release(AccountId(4), SessionId(2)).await;
        assert_eq!(registry.session_of(AccountId(4)).await, None);
    }
}
