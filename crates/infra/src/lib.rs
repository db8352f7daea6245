//! Infrastructure layer: account persistence and number allocation.

pub mod account_store;
pub mod db;
pub mod numbers;

pub use account_store::{AccountStore, InMemoryAccountStore, PostgresAccountStore, StoreError};
pub use numbers::{AccountNumberGenerator, RandomAccountNumbers, SequentialAccountNumbers};
