//! Account persistence boundary.
//!
//! One contract ([`AccountStore`]), two backends: in-memory for tests/dev and
//! Postgres for everything else.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryAccountStore;
pub use postgres::PostgresAccountStore;
pub use r#trait::{AccountStore, StoreError};
