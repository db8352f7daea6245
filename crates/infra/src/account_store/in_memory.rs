use std::collections::BTreeMap;
use std::sync::RwLock;

use ledger_core::{Account, AccountId, NewAccount};

use super::{AccountStore, StoreError};

#[derive(Debug)]
struct State {
    next_id: i64,
    accounts: BTreeMap<AccountId, Account>,
}

/// In-memory account store for tests/dev.
///
/// Ids come from a counter that never goes backwards, so a deleted id is
/// never handed out again.
#[derive(Debug)]
pub struct InMemoryAccountStore {
    inner: RwLock<State>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(State {
                next_id: 1,
                accounts: BTreeMap::new(),
            }),
        }
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::persistence("in-memory account store lock poisoned")
}

#[async_trait::async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut state = self.inner.write().map_err(|_| poisoned())?;

        if state.accounts.values().any(|a| a.number() == account.number()) {
            return Err(StoreError::Conflict(format!(
                "account number {} already in use",
                account.number()
            )));
        }

        let id = AccountId::new(state.next_id);
        state.next_id += 1;

        let account = account.into_account(id);
        state.accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn get_account_by_id(&self, id: AccountId) -> Result<Account, StoreError> {
        let state = self.inner.read().map_err(|_| poisoned())?;
        state.accounts.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let state = self.inner.read().map_err(|_| poisoned())?;
        Ok(state.accounts.values().cloned().collect())
    }

    async fn delete_account(&self, id: AccountId) -> Result<(), StoreError> {
        let mut state = self.inner.write().map_err(|_| poisoned())?;
        state.accounts.remove(&id);
        Ok(())
    }

    async fn update_account(&self, _account: &Account) -> Result<(), StoreError> {
        Err(StoreError::Unsupported("update_account"))
    }
}
