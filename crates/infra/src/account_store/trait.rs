use std::sync::Arc;

use thiserror::Error;

use ledger_core::{Account, AccountId, NewAccount};

/// Account store operation error.
///
/// These are **infrastructure errors**. Domain validation has already happened
/// by the time a [`NewAccount`] reaches the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("account {0} not found")]
    NotFound(AccountId),

    /// A uniqueness constraint rejected the write (e.g. account number taken).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Connectivity, constraint or decoding failure in the backend.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// The operation is part of the contract but no backend implements it yet.
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
}

impl StoreError {
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}

/// Persistence contract for accounts.
///
/// ## Semantics
///
/// - Every call is a single round trip to the backend: no caching, no retry.
/// - `id` is assigned by the store on create and is unique for the store's
///   lifetime. `number` must be unique too; a duplicate is a
///   [`StoreError::Conflict`].
/// - `get_accounts` returns accounts in ascending id (insertion) order and an
///   empty vec when there are none.
/// - `delete_account` is a hard delete and is idempotent: deleting a missing
///   id succeeds.
/// - `update_account` is reserved for future mutation. Backends return
///   [`StoreError::Unsupported`] rather than silently succeeding.
#[async_trait::async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account and return it with its assigned id.
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError>;

    async fn get_account_by_id(&self, id: AccountId) -> Result<Account, StoreError>;

    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError>;

    async fn delete_account(&self, id: AccountId) -> Result<(), StoreError>;

    async fn update_account(&self, account: &Account) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S> AccountStore for Arc<S>
where
    S: AccountStore + ?Sized,
{
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        (**self).create_account(account).await
    }

    async fn get_account_by_id(&self, id: AccountId) -> Result<Account, StoreError> {
        (**self).get_account_by_id(id).await
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError> {
        (**self).get_accounts().await
    }

    async fn delete_account(&self, id: AccountId) -> Result<(), StoreError> {
        (**self).delete_account(id).await
    }

    async fn update_account(&self, account: &Account) -> Result<(), StoreError> {
        (**self).update_account(account).await
    }
}
