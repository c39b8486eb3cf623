//! Collaborator seams toward the host application's account layer.
//!
//! The runtime only ever reads account records while setting a session up
//! and writes back exactly once, through [`OutcomeSink::apply_outcome`],
//! when the session ends.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use battle_core::{AccountId, CharacterBuild, CharacterId, Inventory, SessionOutcome};

use super::errors::{Result, RuntimeError};

/// Read access to account-owned characters and consumables.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// The build of a character `account` owns.
    async fn character(&self, account: AccountId, character: &CharacterId)
    -> Result<CharacterBuild>;

    /// Snapshot of the consumables `account` brings into a battle.
    async fn inventory(&self, account: AccountId) -> Result<Inventory>;
}

/// Receives the settled outcome of every finished session.
#[async_trait]
pub trait OutcomeSink: Send + Sync {
    async fn apply_outcome(&self, outcome: &SessionOutcome) -> Result<()>;
}

/// Everything the in-memory directory knows about one account.
#[derive(Clone, Debug, Default)]
pub struct AccountRecord {
    pub characters: HashMap<CharacterId, CharacterBuild>,
    pub inventory: Inventory,
}

impl AccountRecord {
    pub fn with_character(mut self, build: CharacterBuild) -> Self {
        self.characters.insert(build.template.clone(), build);
        self
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }
}

/// Account directory backed by a map, for tests and the simulation binary.
///
/// Records are added while the directory is still owned; the arena shares it
/// read-only afterwards.
#[derive(Default)]
pub struct InMemoryDirectory {
    accounts: RwLock<HashMap<AccountId, AccountRecord>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the record for `account`.
    pub fn with_account(mut self, account: AccountId, record: AccountRecord) -> Self {
        self.accounts.get_mut().insert(account, record);
        self
    }
}

#[async_trait]
impl AccountDirectory for InMemoryDirectory {
    async fn character(
        &self,
        account: AccountId,
        character: &CharacterId,
    ) -> Result<CharacterBuild> {
        let accounts = self.accounts.read().await;
        let record = accounts
            .get(&account)
            .ok_or(RuntimeError::UnknownAccount(account))?;
        record
            .characters
            .get(character)
            .cloned()
            .ok_or_else(|| RuntimeError::CharacterNotOwned {
                account,
                character: character.clone(),
            })
    }

    async fn inventory(&self, account: AccountId) -> Result<Inventory> {
        let accounts = self.accounts.read().await;
        accounts
            .get(&account)
            .map(|record| record.inventory.clone())
            .ok_or(RuntimeError::UnknownAccount(account))
    }
}

/// Sink that only logs outcomes. Used when no account layer is attached.
pub struct LoggingSink;

#[async_trait]
impl OutcomeSink for LoggingSink {
    async fn apply_outcome(&self, outcome: &SessionOutcome) -> Result<()> {
        tracing::info!(
            session = %outcome.session,
            mode = %outcome.mode,
            reason = %outcome.reason,
            rewards = outcome.rewards.len(),
            "outcome settled"
        );
        Ok(())
    }
}

/// Sink that keeps every outcome it receives.
#[derive(Clone, Default)]
pub struct RecordingSink {
    outcomes: Arc<Mutex<Vec<SessionOutcome>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn outcomes(&self) -> Vec<SessionOutcome> {
        self.outcomes.lock().await.clone()
    }
}

#[async_trait]
impl OutcomeSink for RecordingSink {
    async fn apply_outcome(&self, outcome: &SessionOutcome) -> Result<()> {
        self.outcomes.lock().await.push(outcome.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn directory_reports_missing_records() {
        let build = CharacterBuild::new("pyra", 2, 50.0, ["jab".into(), "ember".into()]);
        let directory = InMemoryDirectory::new()
            .with_account(AccountId(1), AccountRecord::default().with_character(build.clone()));

        let found = directory
            .character(AccountId(1), &"pyra".into())
            .await
            .unwrap();
        assert_eq!(found, build);

        assert!(matches!(
            directory.character(AccountId(1), &"volt".into()).await,
            Err(RuntimeError::CharacterNotOwned { .. })
        ));
        assert!(matches!(
            directory.inventory(AccountId(9)).await,
            Err(RuntimeError::UnknownAccount(AccountId(9)))
        ));
    }

    #[tokio::test]
    async fn every_builder_record_is_kept() {
        let pyra = CharacterBuild::new("pyra", 2, 50.0, ["jab".into(), "ember".into()]);
        let volt = CharacterBuild::new("volt", 3, 40.0, ["jab".into(), "slash".into()]);
        let directory = (1..=32).fold(InMemoryDirectory::new(), |directory, n| {
            directory.with_account(
                AccountId(n),
                AccountRecord::default().with_character(pyra.clone()),
            )
        });
        let directory = directory.with_account(
            AccountId(7),
            AccountRecord::default().with_character(volt.clone()),
        );

        for n in (1..=32).filter(|n| *n != 7) {
            assert_eq!(
                directory.character(AccountId(n), &"pyra".into()).await.unwrap(),
                pyra
            );
        }
        assert_eq!(
            directory.character(AccountId(7), &"volt".into()).await.unwrap(),
            volt
        );
        assert!(matches!(
            directory.character(AccountId(7), &"pyra".into()).await,
            Err(RuntimeError::CharacterNotOwned { .. })
        ));
    }
}
