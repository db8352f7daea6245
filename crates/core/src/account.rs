//! Account entity.
//!
//! # Invariants
//! - `first_name` / `last_name` are non-empty (after trimming) and at most
//!   [`MAX_NAME_LEN`] characters.
//! - `balance` is never negative ([`Balance`] cannot hold a negative value).
//! - `created_at` is set once, when the [`NewAccount`] is opened, truncated to
//!   microseconds (the precision of the storage column).
//! - `id` is assigned by the store; uniqueness of `id` and `number` is the
//!   store's responsibility.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, AccountNumber, DomainError, DomainResult};

/// Column width of the name fields in the relational schema.
pub const MAX_NAME_LEN: usize = 50;

/// Monetary balance in minor units. Never negative.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Balance(i64);

impl Balance {
    pub const ZERO: Balance = Balance(0);

    pub fn new(minor_units: i64) -> DomainResult<Self> {
        if minor_units < 0 {
            return Err(DomainError::validation(format!(
                "balance must not be negative (got {minor_units})"
            )));
        }
        Ok(Self(minor_units))
    }

    pub fn minor_units(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Balance {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Balance> for i64 {
    fn from(value: Balance) -> Self {
        value.0
    }
}

/// An account that has been validated but not yet persisted (no id yet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    first_name: String,
    last_name: String,
    number: AccountNumber,
    balance: Balance,
    created_at: DateTime<Utc>,
}

impl NewAccount {
    /// Open a fresh account with a zero balance.
    pub fn open(
        first_name: &str,
        last_name: &str,
        number: AccountNumber,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            first_name: validate_name("firstName", first_name)?,
            last_name: validate_name("lastName", last_name)?,
            number,
            balance: Balance::ZERO,
            created_at: now.trunc_subsecs(6),
        })
    }

    /// Same holder and timestamp, different account number.
    ///
    /// Used when the store rejects a number as already taken.
    pub fn with_number(mut self, number: AccountNumber) -> Self {
        self.number = number;
        self
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    pub fn balance(&self) -> Balance {
        self.balance
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Attach the store-assigned id.
    pub fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            number: self.number,
            balance: self.balance,
            created_at: self.created_at,
        }
    }
}

/// A persisted account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    id: AccountId,
    first_name: String,
    last_name: String,
    number: AccountNumber,
    balance: Balance,
    created_at: DateTime<Utc>,
}

impl Account {
    /// Rehydrate an account from storage. Storage backends only.
    pub fn from_parts(
        id: AccountId,
        first_name: String,
        last_name: String,
        number: AccountNumber,
        balance: Balance,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            number,
            balance,
            created_at,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    pub fn balance(&self) -> Balance {
        self.balance
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True when every client-supplied field matches `new` (ignores `id`).
    pub fn matches(&self, new: &NewAccount) -> bool {
        self.first_name == new.first_name
            && self.last_name == new.last_name
            && self.number == new.number
            && self.balance == new.balance
            && self.created_at == new.created_at
    }
}

fn validate_name(field: &str, raw: &str) -> DomainResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}
