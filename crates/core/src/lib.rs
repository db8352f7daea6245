//! `ledger-core`: account identity model.
//!
//! This crate contains **pure domain** primitives (no storage, no transport).

pub mod account;
pub mod error;
pub mod id;

pub use account::{Account, Balance, NewAccount, MAX_NAME_LEN};
pub use error::{DomainError, DomainResult};
pub use id::{AccountId, AccountNumber};
