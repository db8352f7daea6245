use ledger_core::{Account, AccountId};

/// The account a request has been authorized against.
///
/// Inserted into request extensions by the authorization gate; handlers
/// behind the gate can rely on it being present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountContext {
    account: Account,
}

impl AccountContext {
    pub fn new(account: Account) -> Self {
        Self { account }
    }

    pub fn account_id(&self) -> AccountId {
        self.account.id()
    }

    pub fn into_account(self) -> Account {
        self.account
    }
}
